//! Entry points for reading a website
//!
//! Validates the URL, runs a [`Transport`] under the timeout budget (and an
//! optional cancellation signal), then hands the payload to the pipeline.

use crate::error::FetchError;
use crate::pipeline;
use crate::transport::{HttpTransport, Transport};
use crate::types::MarkdownResult;
use crate::DEFAULT_TIMEOUT;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Read options that can be configured via tool builder
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Custom User-Agent
    pub user_agent: Option<String>,
    /// Budget for the whole fetch
    pub timeout: Duration,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ReadOptions {
    /// HTTP transport configured from these options
    pub fn transport(&self) -> HttpTransport {
        let transport = HttpTransport::new().with_timeout(self.timeout);
        match &self.user_agent {
            Some(user_agent) => transport.with_user_agent(user_agent.clone()),
            None => transport,
        }
    }
}

/// Fetch a URL and return its main content as Markdown
///
/// Uses the default options. For custom options, use
/// [`read_website_with_options`].
pub async fn read_website(url: &str) -> Result<MarkdownResult, FetchError> {
    read_website_with_options(url, ReadOptions::default()).await
}

/// Fetch a URL with custom options
pub async fn read_website_with_options(
    url: &str,
    options: ReadOptions,
) -> Result<MarkdownResult, FetchError> {
    let transport = options.transport();
    read_with_transport(&transport, url, options.timeout).await
}

/// Fetch a URL, giving up with [`FetchError::Cancelled`] when `cancel`
/// completes first
///
/// Dropping the in-flight fetch aborts the HTTP request; nothing is
/// classified or converted after cancellation.
pub async fn read_website_until<F>(
    url: &str,
    options: ReadOptions,
    cancel: F,
) -> Result<MarkdownResult, FetchError>
where
    F: Future<Output = ()>,
{
    let transport = options.transport();
    tokio::select! {
        biased;
        _ = cancel => {
            debug!(url, "Read cancelled by caller");
            Err(FetchError::Cancelled)
        }
        result = read_with_transport(&transport, url, options.timeout) => result,
    }
}

/// Fetch through any transport and convert the payload
///
/// `timeout` bounds the transport call even when the transport has no
/// timeout of its own.
pub async fn read_with_transport(
    transport: &dyn Transport,
    url: &str,
    timeout: Duration,
) -> Result<MarkdownResult, FetchError> {
    validate_url(url)?;

    debug!(transport = transport.name(), url, "Using transport");
    let fetched = match tokio::time::timeout(timeout, transport.fetch(url)).await {
        Ok(fetched) => fetched?,
        Err(_) => {
            warn!(url, ?timeout, "Fetch timed out");
            return Err(FetchError::Timeout(timeout));
        }
    };

    let mut result = pipeline::process(&fetched);
    result.url = url.to_string();
    Ok(result)
}

/// Reject empty URLs and anything that is not an absolute http(s) URL
pub(crate) fn validate_url(url: &str) -> Result<(), FetchError> {
    if url.trim().is_empty() {
        return Err(FetchError::MissingUrl);
    }

    let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrlScheme)?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(FetchError::InvalidUrlScheme);
    }
    Ok(())
}
