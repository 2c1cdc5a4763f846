//! Outbound request description and raw responses.

use serde_json::Value;

/// Query parameter used to defeat URL-keyed intermediary caches.
pub const CACHE_BUST_PARAM: &str = "_";

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Returns the method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// Immutable description of one API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    path: String,
    method: HttpMethod,
    query: Vec<(String, String)>,
    cache_bypass: bool,
    headers: Vec<(String, String)>,
}

impl RequestDescriptor {
    /// Creates a GET request for `path`.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: HttpMethod::Get,
            query: Vec::new(),
            cache_bypass: false,
            headers: Vec::new(),
        }
    }

    /// Sets the method.
    #[must_use]
    pub const fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Appends an extra header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Marks the request as cache-bypassing and adds the `_={timestamp}` parameter.
    #[must_use]
    pub fn bypassing_cache(mut self, timestamp_ms: i64) -> Self {
        self.cache_bypass = true;
        self.with_query(CACHE_BUST_PARAM, timestamp_ms.to_string())
    }

    /// Returns the path relative to the API origin.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    #[must_use]
    pub const fn cache_bypass(&self) -> bool {
        self.cache_bypass
    }

    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

/// Successful response, body passed through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Decoded JSON body; `Null` for empty bodies.
    pub body: Value,
}

impl ApiResponse {
    /// Creates a 200 response with `body`.
    #[must_use]
    pub const fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }
}
