//! HTTP transport used by upstream sources.

use async_trait::async_trait;
use fxdash_core::error::SourceError;
use reqwest::Client;
use std::time::Duration;

/// Raw HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Minimal GET-only transport so sources can be exercised offline.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<HttpResponse, SourceError>;
}

/// Production transport backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with a per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(concat!("fxdash/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Connection(e.to_string()))?;

        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<HttpResponse, SourceError> {
        let resp = self.client.get(url).query(query).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(e.to_string())
            } else {
                SourceError::Connection(e.to_string())
            }
        })?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| SourceError::Connection(format!("failed to read response body: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert!(HttpResponse::ok("{}").is_success());
        assert!(!HttpResponse { status: 404, body: String::new() }.is_success());
        assert!(!HttpResponse { status: 302, body: String::new() }.is_success());
    }

    #[test]
    fn test_reqwest_transport_builds() {
        assert!(ReqwestTransport::new(Duration::from_secs(3)).is_ok());
    }
}
