//! Core types for WebReader

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request to read a website
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ReadRequest {
    /// The URL of the website to fetch and convert to Markdown
    pub url: String,
}

impl ReadRequest {
    /// Create a new request with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Raw payload handed over by a transport
///
/// `source_url` is the final URL after redirects and is the base for
/// absolutizing links. A missing `Content-Type` header is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchResult {
    pub body: String,
    pub content_type: String,
    pub source_url: String,
}

impl FetchResult {
    pub fn new(
        body: impl Into<String>,
        content_type: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            body: body.into(),
            content_type: content_type.into(),
            source_url: source_url.into(),
        }
    }
}

/// How the returned Markdown was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DetectionMethod {
    /// Declared as text/plain or text/markdown, returned unchanged
    Raw,
    /// Body looked like Markdown, returned unchanged
    MarkdownHeuristic,
    /// Main content extracted from HTML and converted
    HtmlExtracted,
}

impl DetectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMethod::Raw => "raw",
            DetectionMethod::MarkdownHeuristic => "markdown-heuristic",
            DetectionMethod::HtmlExtracted => "html-extracted",
        }
    }
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of reading a website
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MarkdownResult {
    /// The requested URL
    pub url: String,

    /// Final URL after redirects, used to absolutize links
    pub source_url: String,

    /// Content-Type header value (empty when the server sent none)
    pub content_type: String,

    /// "raw", "markdown-heuristic" or "html-extracted"
    pub detection: DetectionMethod,

    /// Selector that located the main content (HTML only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,

    /// Document title (HTML only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// The Markdown content
    pub markdown: String,
}
