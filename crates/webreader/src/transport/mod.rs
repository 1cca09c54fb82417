//! Transport seam
//!
//! Design: the pipeline only needs `{ body, content_type, source_url }`.
//! A [`Transport`] produces exactly that; [`HttpTransport`] is the reqwest
//! implementation and tests plug in their own.

mod http;

pub use http::{HttpTransport, MAX_BODY_SIZE};

use crate::error::FetchError;
use crate::types::FetchResult;
use async_trait::async_trait;

/// Source of fetched payloads
#[async_trait]
pub trait Transport: Send + Sync {
    /// Identifier for logging
    fn name(&self) -> &'static str;

    /// Fetch `url`, following redirects
    ///
    /// Implementations report the final URL in [`FetchResult::source_url`]
    /// and fail on non-2xx statuses.
    async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticTransport;

    #[async_trait]
    impl Transport for StaticTransport {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
            Ok(FetchResult::new("body", "text/plain", url))
        }
    }

    #[tokio::test]
    async fn test_transport_is_object_safe() {
        let transport: Box<dyn Transport> = Box::new(StaticTransport);
        assert_eq!(transport.name(), "static");
        let fetched = transport.fetch("https://example.com/").await.unwrap();
        assert_eq!(fetched.source_url, "https://example.com/");
        assert_eq!(fetched.body, "body");
    }
}
