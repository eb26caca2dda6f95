//! Single-attempt webhook delivery.
//!
//! [`WebhookDelivery`] POSTs a JSON body to an external URL. Every request
//! is bounded by the client timeout. There is no retry: notifications are
//! fire-and-forget and the caller only logs the result.

use std::time::Duration;

use serde_json::Value;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for webhook delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// WebhookDelivery
// ---------------------------------------------------------------------------

/// Delivers JSON payloads to external webhook endpoints.
#[derive(Clone)]
pub struct WebhookDelivery {
    client: reqwest::Client,
}

impl WebhookDelivery {
    /// Create a delivery service whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, WebhookError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// POST `payload` to `url` once.
    ///
    /// Returns the HTTP status code on a 2xx response.
    pub async fn post_json(&self, url: &str, payload: &Value) -> Result<u16, WebhookError> {
        let response = self.client.post(url).json(payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::HttpStatus(status.as_u16()));
        }
        Ok(status.as_u16())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
