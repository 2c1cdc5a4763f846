//! Secure credential storage error types.

use thiserror::Error;

/// Keyring access failures.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum SecretError {
    #[error("failed to access secure storage: {0}")]
    AccessFailed(String),

    #[error("failed to delete secret: {0}")]
    DeletionFailed(String),

    #[error("secure storage not available: {0}")]
    NotAvailable(String),
}
