//! Authenticated client error types.

use std::fmt;

use thiserror::Error;

/// Why the backend considers the session unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionFailureKind {
    /// Token past its expiry.
    TokenExpired,
    /// Token malformed or revoked.
    InvalidToken,
    /// Anything else, including no response at all.
    Other,
}

impl SessionFailureKind {
    /// Parses the backend `code` field of a 401 body.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "TOKEN_EXPIRED" => Some(Self::TokenExpired),
            "INVALID_TOKEN" => Some(Self::InvalidToken),
            _ => None,
        }
    }

    /// Returns the wire code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for SessionFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Classified failure derived from a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFailure {
    /// Failure class.
    pub kind: SessionFailureKind,
    /// Human readable message.
    pub message: String,
}

impl SessionFailure {
    /// Creates a session failure.
    #[must_use]
    pub fn new(kind: SessionFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns whether the stored credential is no longer valid.
    #[must_use]
    pub const fn invalidates_session(&self) -> bool {
        matches!(
            self.kind,
            SessionFailureKind::TokenExpired | SessionFailureKind::InvalidToken
        )
    }
}

/// Errors returned by the authenticated client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ClientError {
    #[error("{message}")]
    Connectivity { message: String },

    #[error("session rejected ({}): {}", .0.kind, .0.message)]
    Session(SessionFailure),

    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("failed to decode response: {message}")]
    Decode { message: String },

    #[error("invalid client configuration: {message}")]
    Configuration { message: String },
}

impl ClientError {
    /// Message shown when no response was received.
    pub const CONNECTIVITY_MESSAGE: &'static str =
        "Unable to reach the server. Please check your connection.";

    /// Creates connectivity error with the default message.
    #[must_use]
    pub fn connectivity() -> Self {
        Self::Connectivity {
            message: Self::CONNECTIVITY_MESSAGE.to_string(),
        }
    }

    /// Creates server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns the session classification of this error.
    #[must_use]
    pub fn session_failure(&self) -> SessionFailure {
        match self {
            Self::Session(failure) => failure.clone(),
            other => SessionFailure::new(SessionFailureKind::Other, other.user_message()),
        }
    }

    /// Returns whether the session was invalidated by the backend.
    #[must_use]
    pub const fn is_session_error(&self) -> bool {
        matches!(self, Self::Session(_))
    }

    /// Returns the backend-provided message, if the backend sent one.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Session(failure) => Some(&failure.message),
            Self::Server { message, .. } => Some(message),
            Self::Connectivity { .. } | Self::Decode { .. } | Self::Configuration { .. } => None,
        }
    }

    /// Returns text suitable for a user-facing notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Connectivity { message } => message.clone(),
            Self::Session(failure) => failure.message.clone(),
            Self::Server { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
