//! HTTP transport capability.
//!
//! The annotation client talks to the provider through the [`HttpTransport`]
//! trait so tests can substitute an in-process double for the network.
//! [`ReqwestTransport`] is the production implementation.
//!
//! Single-attempt semantics throughout: no retry, no backoff, and no timeout
//! beyond the transport default.

use async_trait::async_trait;

use crate::error::{AppError, Result};

/// Status and body of one HTTP exchange.
///
/// The status is surfaced even for non-2xx responses; interpreting it is the
/// caller's job.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Capability to POST a JSON body and read back the response.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends `body` to `url` as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Network`] when the exchange itself fails
    /// (connection refused, DNS failure, broken stream). A response with a
    /// non-success status is NOT an error at this layer.
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpResponse>;
}

/// [`HttpTransport`] backed by [`reqwest::Client`].
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpResponse> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::network(format!("request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::network(format!("failed to read response body: {}", e)))?;

        log::debug!("POST {} -> {} ({} bytes)", redact_key(url), status, body.len());

        Ok(HttpResponse { status, body })
    }
}

/// Strips the `key` query parameter value before logging a URL.
fn redact_key(url: &str) -> String {
    match url.split_once("key=") {
        Some((head, _)) => format!("{}key=***", head),
        None => url.to_string(),
    }
}
