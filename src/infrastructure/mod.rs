//! Infrastructure layer with external service adapters.

/// Authenticated HTTP client.
pub mod api;
/// Application configuration.
pub mod config;
/// System notifications.
pub mod notifications;
/// In-process shared store.
pub mod state_store;
/// Token storage adapters.
pub mod storage;

pub use api::AuthenticatedClient;
pub use config::{AppConfig, CliArgs, ConfigFile, LogLevel};
pub use notifications::DesktopNotificationService;
pub use state_store::InMemoryStore;
pub use storage::{KeyringTokenStorage, SeededTokenStorage};
