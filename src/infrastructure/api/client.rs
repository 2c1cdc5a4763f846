//! Authenticated backend HTTP client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, header};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::dto::ErrorResponse;
use crate::domain::errors::{ClientError, SessionFailure, SessionFailureKind};
use crate::domain::ports::{ApiPort, CredentialStoragePort};
use crate::domain::request::{ApiResponse, HttpMethod, RequestDescriptor};
use crate::infrastructure::config::ApiConfig;

const USER_AGENT: &str = concat!("jobsync/", env!("CARGO_PKG_VERSION"));

/// Single point of outbound request construction for the backend API.
///
/// Cookies are kept in a per-client jar and sent on every request, and the
/// stored bearer credential is attached when present.
pub struct AuthenticatedClient {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialStoragePort>,
}

impl AuthenticatedClient {
    /// Creates client for the configured API origin.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(
        config: &ApiConfig,
        credentials: Arc<dyn CredentialStoragePort>,
    ) -> Result<Self, ClientError> {
        Self::with_base_url(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
            credentials,
        )
    }

    /// Creates client with custom base URL and timeout.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_base_url(
        base_url: impl Into<String>,
        timeout: Duration,
        credentials: Arc<dyn CredentialStoragePort>,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::configuration(format!("failed to create HTTP client: {e}")))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    /// Returns the API origin requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    fn method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    async fn build(&self, descriptor: &RequestDescriptor) -> RequestBuilder {
        let mut builder = self
            .client
            .request(
                Self::method(descriptor.method()),
                self.url(descriptor.path()),
            )
            .header(header::ACCEPT, "application/json");

        match self.credentials.get_token().await {
            Ok(Some(token)) => {
                builder = builder.header(header::AUTHORIZATION, token.bearer_header());
            }
            Ok(None) => debug!("No stored credential, sending request without bearer"),
            Err(e) => warn!(error = %e, "Failed to read stored credential"),
        }

        if !descriptor.query().is_empty() {
            builder = builder.query(descriptor.query());
        }

        if descriptor.cache_bypass() {
            builder = builder
                .header(header::CACHE_CONTROL, "no-cache")
                .header(header::PRAGMA, "no-cache")
                .header(header::EXPIRES, "0");
        }

        for (name, value) in descriptor.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder
    }

    async fn handle_error_response(&self, status: StatusCode, response: Response) -> ClientError {
        let body = response.json::<ErrorResponse>().await.unwrap_or_default();

        if status == StatusCode::UNAUTHORIZED {
            if let Some(kind) = body.code.as_deref().and_then(SessionFailureKind::from_code) {
                let message = body
                    .message
                    .unwrap_or_else(|| "Your session has expired. Please log in again.".to_string());
                self.invalidate_session(kind).await;
                return ClientError::Session(SessionFailure::new(kind, message));
            }
        }

        let message = body
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));

        ClientError::server(status.as_u16(), message)
    }

    async fn invalidate_session(&self, kind: SessionFailureKind) {
        info!(code = %kind, "Session invalidated by server, removing stored credential");
        if let Err(e) = self.credentials.delete_token().await {
            warn!(error = %e, "Failed to remove stored credential");
        }
    }

    fn map_send_error(e: &reqwest::Error) -> ClientError {
        if e.is_builder() {
            warn!(error = %e, "Failed to build request");
            return ClientError::configuration(e.to_string());
        }

        if e.is_timeout() {
            warn!("Request timed out");
        } else if e.is_connect() {
            warn!(error = %e, "Failed to connect to API");
        } else {
            warn!(error = %e, "Request failed without response");
        }
        ClientError::connectivity()
    }
}

#[async_trait]
impl ApiPort for AuthenticatedClient {
    #[instrument(skip(self, descriptor), fields(method = descriptor.method().as_str(), path = %descriptor.path()))]
    async fn request(&self, descriptor: &RequestDescriptor) -> Result<ApiResponse, ClientError> {
        let request = self.build(descriptor).await;

        let response = request.send().await.map_err(|e| Self::map_send_error(&e))?;
        let status = response.status();

        if !status.is_success() {
            debug!(status = status.as_u16(), "API returned error status");
            return Err(self.handle_error_response(status, response).await);
        }

        let bytes = response.bytes().await.map_err(|e| {
            warn!(error = %e, "Failed to read response body");
            ClientError::connectivity()
        })?;

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(|e| {
                warn!(error = %e, "Failed to parse response body");
                ClientError::decode(e.to_string())
            })?
        };

        debug!(status = status.as_u16(), "Request successful");

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }
}
