//! HTTP transport
//!
//! Issues a single GET with a browser-like User-Agent and an HTML-preferring
//! Accept header, following redirects. Certificate validation is disabled so
//! that self-signed and internal hosts can be read; this trades security for
//! reach and must not be relied on for confidentiality.

use crate::error::FetchError;
use crate::transport::Transport;
use crate::types::FetchResult;
use crate::{DEFAULT_ACCEPT, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::redirect::Policy;
use std::time::Duration;
use tracing::{debug, warn};

/// Redirects followed before giving up
const MAX_REDIRECTS: usize = 10;

/// Default cap on the response body size
pub const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    user_agent: String,
    timeout: Duration,
    max_body_size: usize,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport {
    /// Create a transport with the default User-Agent, timeout and body cap
    pub fn new() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_body_size: MAX_BODY_SIZE,
        }
    }

    /// Set custom User-Agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the budget for connect + headers + body
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the largest accepted body, in bytes
    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn client(&self) -> Result<reqwest::Client, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );
        headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));

        reqwest::Client::builder()
            .default_headers(headers)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .danger_accept_invalid_certs(true)
            .connect_timeout(self.timeout)
            .timeout(self.timeout)
            .build()
            .map_err(FetchError::ClientBuildError)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
        let client = self.client()?;

        debug!(url, timeout = ?self.timeout, "Sending GET request");
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|err| FetchError::from_reqwest(err, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "Server returned non-success status");
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let source_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let body = read_body(response, self.max_body_size, self.timeout).await?;
        debug!(
            url,
            source_url = %source_url,
            content_type = %content_type,
            bytes = body.len(),
            "Fetched body"
        );

        Ok(FetchResult {
            body: String::from_utf8_lossy(&body).into_owned(),
            content_type,
            source_url,
        })
    }
}

/// Read the whole body, failing once it grows past `limit`
async fn read_body(
    response: reqwest::Response,
    limit: usize,
    timeout: Duration,
) -> Result<Bytes, FetchError> {
    if response
        .content_length()
        .is_some_and(|len| len > limit as u64)
    {
        return Err(FetchError::BodyTooLarge(limit));
    }

    let mut body = BytesMut::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|err| FetchError::from_reqwest(err, timeout))?;
        if body.len() + chunk.len() > limit {
            warn!(limit, "Response body exceeds size cap");
            return Err(FetchError::BodyTooLarge(limit));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body.freeze())
}
