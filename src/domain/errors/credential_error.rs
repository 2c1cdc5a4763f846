//! Local credential error types.

use thiserror::Error;

/// Credential resolution and storage failures.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum CredentialError {
    #[error("invalid credential format: {reason}")]
    InvalidFormat { reason: String },

    #[error("failed to retrieve stored credential: {message}")]
    RetrievalFailed { message: String },

    #[error("failed to store credential: {message}")]
    StorageFailed { message: String },

    #[error("secure storage error: {0}")]
    Secret(#[from] super::SecretError),
}

impl CredentialError {
    /// Creates invalid format error.
    #[must_use]
    pub fn invalid_format(reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            reason: reason.into(),
        }
    }

    /// Creates retrieval failed error.
    #[must_use]
    pub fn retrieval_failed(message: impl Into<String>) -> Self {
        Self::RetrievalFailed {
            message: message.into(),
        }
    }

    /// Creates storage failed error.
    #[must_use]
    pub fn storage_failed(message: impl Into<String>) -> Self {
        Self::StorageFailed {
            message: message.into(),
        }
    }

    /// Returns whether the error comes from the platform keyring.
    #[must_use]
    pub const fn is_storage_unavailable(&self) -> bool {
        matches!(self, Self::Secret(super::SecretError::NotAvailable(_)))
    }
}
