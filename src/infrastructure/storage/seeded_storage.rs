//! Credential storage holding a token resolved for this run.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::domain::entities::AuthToken;
use crate::domain::errors::CredentialError;
use crate::domain::ports::CredentialStoragePort;

/// Wraps a persistent store with an in-memory token for the current process.
///
/// A seeded token shadows the persistent one. Deleting clears both, so a
/// token the server rejects is never sent again.
pub struct SeededTokenStorage {
    persistent: Arc<dyn CredentialStoragePort>,
    seeded: RwLock<Option<AuthToken>>,
}

impl SeededTokenStorage {
    #[must_use]
    pub fn new(persistent: Arc<dyn CredentialStoragePort>) -> Self {
        Self {
            persistent,
            seeded: RwLock::new(None),
        }
    }

    /// Makes `token` the credential for this run without persisting it.
    pub fn seed(&self, token: AuthToken) {
        debug!(token = %token, "Seeding session credential");
        *self.seeded.write() = Some(token);
    }

    #[must_use]
    pub fn is_seeded(&self) -> bool {
        self.seeded.read().is_some()
    }
}

#[async_trait]
impl CredentialStoragePort for SeededTokenStorage {
    async fn get_token(&self) -> Result<Option<AuthToken>, CredentialError> {
        let seeded = self.seeded.read().clone();
        match seeded {
            Some(token) => Ok(Some(token)),
            None => self.persistent.get_token().await,
        }
    }

    async fn store_token(&self, token: &AuthToken) -> Result<(), CredentialError> {
        self.persistent.store_token(token).await?;
        self.seed(token.clone());
        Ok(())
    }

    async fn delete_token(&self) -> Result<(), CredentialError> {
        self.seeded.write().take();
        self.persistent.delete_token().await
    }
}
