//! Stub credential storage for builds without keyring support.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::entities::AuthToken;
use crate::domain::errors::CredentialError;
use crate::domain::ports::CredentialStoragePort;

/// Stub storage that never holds a credential.
pub struct KeyringTokenStorage;

impl KeyringTokenStorage {
    /// Creates new stub storage.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Creates storage with custom names (no-op in stub).
    #[must_use]
    pub fn with_names(_service: impl Into<String>, _user: impl Into<String>) -> Self {
        Self
    }
}

impl Default for KeyringTokenStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStoragePort for KeyringTokenStorage {
    async fn get_token(&self) -> Result<Option<AuthToken>, CredentialError> {
        debug!("Keyring feature disabled - no credential available");
        Ok(None)
    }

    async fn store_token(&self, _token: &AuthToken) -> Result<(), CredentialError> {
        debug!("Keyring feature disabled - credential not stored");
        Ok(())
    }

    async fn delete_token(&self) -> Result<(), CredentialError> {
        debug!("Keyring feature disabled - nothing to delete");
        Ok(())
    }
}
