//! Error types for WebReader
//!
//! Only the transport and request validation can fail. Classification,
//! extraction and conversion are total and never produce a `FetchError`.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while reading a website
#[derive(Debug, Error)]
pub enum FetchError {
    /// URL is missing
    #[error("Missing required parameter: url")]
    MissingUrl,

    /// URL has invalid scheme
    #[error("Invalid URL: must start with http:// or https://")]
    InvalidUrlScheme,

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// The fetch did not complete within the timeout budget
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// Server answered outside the 2xx range
    #[error("HTTP {0}")]
    HttpStatus(u16),

    /// No response was received (DNS, refused connection, TLS handshake)
    #[error("Network error - no response received")]
    Network(#[source] reqwest::Error),

    /// Response body exceeded the size cap
    #[error("Response body exceeds {0} bytes")]
    BodyTooLarge(usize),

    /// The caller cancelled the operation before the fetch completed
    #[error("Request cancelled")]
    Cancelled,

    /// Other request error
    #[error("Request failed: {0}")]
    Request(String),
}

impl FetchError {
    /// Classify a reqwest error
    ///
    /// `timeout` is the budget that was configured on the client, reported
    /// back verbatim when reqwest gave up waiting.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(timeout)
        } else if let Some(status) = err.status() {
            FetchError::HttpStatus(status.as_u16())
        } else if err.is_connect() {
            FetchError::Network(err)
        } else {
            FetchError::Request(err.to_string())
        }
    }

    /// True for failures produced by the transport rather than by input validation
    pub fn is_transport(&self) -> bool {
        !matches!(
            self,
            FetchError::MissingUrl | FetchError::InvalidUrlScheme | FetchError::Cancelled
        )
    }
}
