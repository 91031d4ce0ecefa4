//! Transport seam between domain fetchers and the network.

use async_trait::async_trait;

use crate::error::AppResult;

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues GET requests against the geoportal API.
///
/// Non-2xx responses are returned as responses, not errors; only transport
/// level failures are errors. Implementations must be cancel safe: the
/// fetcher drops the future on timeout or cancellation.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> AppResult<RawResponse>;
}
