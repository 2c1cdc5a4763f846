//! Keyring-based credential storage.

use async_trait::async_trait;
use keyring::Entry;
use tracing::{debug, warn};

use crate::domain::entities::AuthToken;
use crate::domain::errors::{CredentialError, SecretError};
use crate::domain::ports::CredentialStoragePort;

const KEYRING_SERVICE: &str = "jobsync";
const KEYRING_USER: &str = "token";

/// System keyring credential storage adapter.
pub struct KeyringTokenStorage {
    service: String,
    user: String,
}

impl KeyringTokenStorage {
    /// Creates new storage with default names.
    #[must_use]
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE.to_string(),
            user: KEYRING_USER.to_string(),
        }
    }

    /// Creates storage with custom names.
    #[must_use]
    pub fn with_names(service: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            user: user.into(),
        }
    }

    fn entry(&self) -> Result<Entry, CredentialError> {
        Entry::new(&self.service, &self.user).map_err(|e| match e {
            keyring::Error::NoStorageAccess(inner) | keyring::Error::PlatformFailure(inner) => {
                SecretError::NotAvailable(inner.to_string()).into()
            }
            other => SecretError::AccessFailed(other.to_string()).into(),
        })
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
        debug!(service = %self.service, "Retrieving credential from keyring");

        let entry = self.entry()?;

        match entry.get_password() {
            Ok(password) => {
                let token = AuthToken::new(password);
                if token.is_none() {
                    warn!("Stored credential is blank, ignoring it");
                }
                Ok(token)
            }
            Err(keyring::Error::NoEntry) => {
                debug!("No credential stored in keyring");
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "Failed to retrieve credential from keyring");
                Err(CredentialError::retrieval_failed(e.to_string()))
            }
        }
    }

    async fn store_token(&self, token: &AuthToken) -> Result<(), CredentialError> {
        debug!(service = %self.service, token = %token, "Storing credential in keyring");

        let entry = self.entry()?;

        entry.set_password(token.as_str()).map_err(|e| {
            warn!(error = %e, "Failed to store credential in keyring");
            CredentialError::storage_failed(e.to_string())
        })
    }

    async fn delete_token(&self) -> Result<(), CredentialError> {
        debug!(service = %self.service, "Deleting credential from keyring");

        let entry = self.entry()?;

        match entry.delete_credential() {
            Ok(()) => {
                debug!("Credential deleted from keyring");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => {
                debug!("No credential to delete");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to delete credential from keyring");
                Err(SecretError::DeletionFailed(e.to_string()).into())
            }
        }
    }
}
