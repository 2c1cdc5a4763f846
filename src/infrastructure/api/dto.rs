use serde::Deserialize;

/// Error body sent by the backend alongside non-2xx statuses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    /// Human readable error message.
    #[serde(default)]
    pub message: Option<String>,
    /// Machine readable error code, e.g. `TOKEN_EXPIRED`.
    #[serde(default)]
    pub code: Option<String>,
}
