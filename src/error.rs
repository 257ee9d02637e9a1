//! Error types for the proxy
//!
//! A single error enum covers the whole request path. The `Display` text of
//! each variant is the stable, client-visible message: the HTTP layer returns
//! it verbatim in the error response body.

use thiserror::Error;

/// Errors that can occur while serving a proxy request
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Secret credential for the downstream API is not configured
    #[error("downstream API credential is not configured")]
    MissingCredential,

    /// Downstream API answered with a non-success status
    #[error("downstream API returned status {0}")]
    DownstreamStatus(u16),

    /// Downstream response did not have the expected shape
    #[error("malformed downstream payload: {0}")]
    MalformedPayload(String),

    /// Record store read or write failed
    #[error("cache store error: {0}")]
    Store(String),

    /// HTTP transport failure while calling the downstream API
    #[error("downstream request failed: {0}")]
    Request(#[from] reqwest::Error),
}
