//! Local credential storage port definition.

use async_trait::async_trait;

use crate::domain::entities::AuthToken;
use crate::domain::errors::CredentialError;

/// Port for the locally persisted bearer credential.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStoragePort: Send + Sync {
    /// Retrieves stored token.
    async fn get_token(&self) -> Result<Option<AuthToken>, CredentialError>;

    /// Stores token securely.
    async fn store_token(&self, token: &AuthToken) -> Result<(), CredentialError>;

    /// Deletes stored token.
    async fn delete_token(&self) -> Result<(), CredentialError>;

    /// Checks if token exists.
    async fn has_token(&self) -> Result<bool, CredentialError> {
        Ok(self.get_token().await?.is_some())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory credential storage for testing.
    pub struct InMemoryCredentials {
        token: Arc<RwLock<Option<AuthToken>>>,
    }

    impl InMemoryCredentials {
        /// Creates empty storage.
        pub fn new() -> Self {
            Self {
                token: Arc::new(RwLock::new(None)),
            }
        }

        /// Creates storage holding `token`.
        pub fn with_token(token: AuthToken) -> Self {
            Self {
                token: Arc::new(RwLock::new(Some(token))),
            }
        }
    }

    impl Default for InMemoryCredentials {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl CredentialStoragePort for InMemoryCredentials {
        async fn get_token(&self) -> Result<Option<AuthToken>, CredentialError> {
            Ok(self.token.read().await.clone())
        }

        async fn store_token(&self, token: &AuthToken) -> Result<(), CredentialError> {
            *self.token.write().await = Some(token.clone());
            Ok(())
        }

        async fn delete_token(&self) -> Result<(), CredentialError> {
            *self.token.write().await = None;
            Ok(())
        }
    }
}
