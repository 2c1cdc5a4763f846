//! Application layer with services, use cases and DTOs.

/// Data transfer objects.
pub mod dto;
/// Scheduling, synchronization and notification services.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::TokenSource;
pub use services::{CollectionSynchronizer, FetchScheduler, NotificationManager};
pub use use_cases::{ResolveTokenUseCase, ResolvedToken, SyncSession};
