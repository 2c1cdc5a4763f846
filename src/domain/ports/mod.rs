mod api_port;
mod credential_storage_port;
mod notification_port;
mod store_port;

pub use api_port::ApiPort;
pub use credential_storage_port::CredentialStoragePort;
pub use notification_port::NotificationPort;
pub use store_port::SharedStorePort;

#[cfg(test)]
pub mod mocks {
    pub use super::api_port::mock::ScriptedApi;
    pub use super::credential_storage_port::MockCredentialStoragePort;
    pub use super::credential_storage_port::mock::InMemoryCredentials;
    pub use super::notification_port::mock::RecordingNotifications;
}
