//! Domain entity definitions.

mod collection;
mod entity;
mod envelope;
mod fetch_state;
mod identity;
mod token;

pub use collection::{CollectionSpec, FailurePolicy, StoreSlice};
pub use entity::Entity;
pub use envelope::CollectionEnvelope;
pub use fetch_state::{FetchState, LastOutcome, SyncPhase};
pub use identity::{Identity, IdentityTransition, UserId};
pub use token::AuthToken;
