//! Domain error types.

mod client_error;
mod credential_error;
mod secret_error;

pub use client_error::{ClientError, SessionFailure, SessionFailureKind};
pub use credential_error::CredentialError;
pub use secret_error::SecretError;
