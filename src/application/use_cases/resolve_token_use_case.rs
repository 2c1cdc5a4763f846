//! Token resolution use case.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::TokenSource;
use crate::domain::entities::AuthToken;
use crate::domain::errors::CredentialError;
use crate::domain::ports::CredentialStoragePort;

/// Resolved token with its source.
#[derive(Debug, Clone)]
pub struct ResolvedToken {
    /// The bearer token.
    pub token: AuthToken,
    /// Source of the token.
    pub source: TokenSource,
}

impl ResolvedToken {
    /// Creates new resolved token.
    #[must_use]
    pub const fn new(token: AuthToken, source: TokenSource) -> Self {
        Self { token, source }
    }
}

/// Resolves the bearer token from available sources.
pub struct ResolveTokenUseCase {
    storage_port: Arc<dyn CredentialStoragePort>,
}

impl ResolveTokenUseCase {
    /// Creates new use case.
    #[must_use]
    pub const fn new(storage_port: Arc<dyn CredentialStoragePort>) -> Self {
        Self { storage_port }
    }

    /// Resolves token from keyring or CLI/Env.
    ///
    /// Priority:
    /// 1. Keyring
    /// 2. CLI/Env (passed as argument)
    ///
    /// A keyring that cannot be read is treated as empty.
    ///
    /// # Errors
    /// Returns error if the command-line token is malformed.
    pub async fn execute(
        &self,
        cli_token: Option<String>,
    ) -> Result<Option<ResolvedToken>, CredentialError> {
        debug!("Checking keyring for stored token");
        match self.storage_port.get_token().await {
            Ok(Some(token)) => {
                info!(token = %token, "Using token from system keyring");
                return Ok(Some(ResolvedToken::new(token, TokenSource::Keyring)));
            }
            Ok(None) => debug!("No token found in keyring"),
            Err(e) if e.is_storage_unavailable() => debug!(error = %e, "Keyring unavailable"),
            Err(e) => warn!(error = %e, "Failed to check keyring"),
        }

        let Some(token_str) = cli_token.filter(|s| !s.trim().is_empty()) else {
            debug!("No token found in any source");
            return Ok(None);
        };

        let token = AuthToken::new(token_str).ok_or_else(|| {
            warn!("Command-line token has invalid format");
            CredentialError::invalid_format("token must be a single non-empty word")
        })?;

        info!(token = %token, "Using token from command line / environment");
        Ok(Some(ResolvedToken::new(token, TokenSource::CommandLine)))
    }

    /// Persists a token so later runs find it in the keyring.
    ///
    /// # Errors
    /// Returns error if the keyring rejects the write.
    pub async fn persist(&self, token: &AuthToken) -> Result<(), CredentialError> {
        self.storage_port.store_token(token).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to persist token to secure storage");
            e
        })?;
        info!("Token persisted to secure storage");
        Ok(())
    }
}
