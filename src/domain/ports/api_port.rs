//! Backend API port definition.

use async_trait::async_trait;

use crate::domain::errors::ClientError;
use crate::domain::request::{ApiResponse, RequestDescriptor};

/// Port for issuing authenticated requests against the backend.
#[async_trait]
pub trait ApiPort: Send + Sync {
    /// Sends a request and returns the decoded body of a successful response.
    async fn request(&self, descriptor: &RequestDescriptor) -> Result<ApiResponse, ClientError>;
}
