//! Domain layer with core entities, errors and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// User-visible notifications.
pub mod notification;
/// Port definitions.
pub mod ports;
/// Request descriptors and raw responses.
pub mod request;

pub use entities::{AuthToken, CollectionSpec, Entity, FetchState, Identity, StoreSlice};
pub use errors::{ClientError, CredentialError, SessionFailure, SessionFailureKind};
pub use notification::{Notification, NotificationLevel};
pub use ports::{ApiPort, CredentialStoragePort, NotificationPort, SharedStorePort};
pub use request::{ApiResponse, HttpMethod, RequestDescriptor};
