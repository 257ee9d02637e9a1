//! Downstream Fear & Greed API client
//!
//! Fetches the current index value from the configured vendor endpoint. The
//! endpoint answers with a JSON array whose first element is the current
//! reading; any other shape is rejected as malformed rather than defaulted.
//! The secret credential travels in a request header and never reaches
//! clients of the proxy.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::ProxyConfig;
use crate::error::ProxyError;

/// Header carrying the downstream API credential
pub const CREDENTIAL_HEADER: &str = "x-api-key";

/// Timeout applied to downstream requests
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for fetching the current index value
#[derive(Debug, Clone)]
pub struct FngClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl FngClient {
    /// Creates a client for the endpoint and credential in `config`
    pub fn new(config: &ProxyConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            endpoint: config.api_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Fetches the current index value with a single downstream call
    ///
    /// # Returns
    /// * `Ok(f64)` - The first element of the downstream response array
    /// * `Err(ProxyError)` - Missing credential, transport failure, non-2xx
    ///   status, or a payload that is not a non-empty numeric array
    pub async fn fetch_sample(&self) -> Result<f64, ProxyError> {
        let api_key = self.api_key.as_deref().ok_or(ProxyError::MissingCredential)?;

        debug!("fetching current index value from {}", self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .header(CREDENTIAL_HEADER, api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProxyError::DownstreamStatus(status.as_u16()));
        }

        let text = response.text().await?;
        let payload: Value = serde_json::from_str(&text)
            .map_err(|e| ProxyError::MalformedPayload(format!("invalid JSON: {e}")))?;

        parse_sample(&payload)
    }
}

/// Extracts the sample value from a downstream payload
///
/// The payload must be a non-empty JSON array whose first element is a
/// number. Anything else is an error, never a default value.
pub fn parse_sample(payload: &Value) -> Result<f64, ProxyError> {
    let items = payload
        .as_array()
        .ok_or_else(|| ProxyError::MalformedPayload("expected a JSON array".to_string()))?;

    let first = items
        .first()
        .ok_or_else(|| ProxyError::MalformedPayload("empty response array".to_string()))?;

    first.as_f64().ok_or_else(|| {
        ProxyError::MalformedPayload(format!("first element is not a number: {first}"))
    })
}
