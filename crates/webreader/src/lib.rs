//! WebReader - fetch a web page and return its main content as Markdown
//!
//! This crate provides a library API and an agent tool contract for reading
//! websites. A fetched body is routed one of two ways:
//!
//! - Plain text and Markdown (by `Content-Type` or by a heading heuristic)
//!   is returned unchanged.
//! - Anything else is parsed as HTML. The main content region is located
//!   with a fixed selector priority list and converted to Markdown with
//!   relative links and images resolved against the final URL.
//!
//! ## Transport security
//!
//! The HTTP transport does **not** validate TLS certificates. Any host,
//! including one presenting a self-signed or forged certificate, is read.
//! Do not use this crate where response authenticity matters.

pub mod absolutize;
pub mod classify;
pub mod client;
pub mod convert;
mod error;
pub mod extract;
pub mod pipeline;
mod tool;
pub mod transport;
mod types;

pub use client::{
    read_website, read_website_until, read_website_with_options, read_with_transport, ReadOptions,
};
pub use error::FetchError;
pub use pipeline::process;
pub use tool::{Tool, ToolBuilder, ToolStatus};
pub use transport::{HttpTransport, Transport, MAX_BODY_SIZE};
pub use types::{DetectionMethod, FetchResult, MarkdownResult, ReadRequest};

use std::time::Duration;

/// Default User-Agent string, a desktop Chrome signature
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default Accept header, preferring HTML
pub const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Default budget for a single fetch
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Tool name used for registration
pub const TOOL_NAME: &str = "read_website";

/// Human-readable tool label
pub const TOOL_LABEL: &str = "Read Website";

/// Tool description for LLM consumption
pub const TOOL_DESCRIPTION: &str = r#"Fetch a website URL and return raw Markdown representing the main readable content.

- Plain text and Markdown responses are returned unchanged
- HTML is reduced to its main content region and converted to Markdown
- Relative links and images are resolved against the final URL
- Requests time out after 10 seconds; TLS certificates are not validated"#;

/// Extended documentation for LLM consumption (llmtxt)
pub const TOOL_LLMTXT: &str = r#"# Read Website Tool

Fetch a website URL and return raw Markdown representing the main readable content.

## Capabilities
- HTTP GET with a browser-like User-Agent, following redirects
- Plain text / Markdown passthrough
- Main content extraction (article, main, .post, .content, ... falling back to body)
- HTML to Markdown conversion (ATX headings, fenced code blocks, pipe tables)
- Relative link and image URLs resolved against the final URL

## Input Parameters
- `url` (required): The URL to read (must be http:// or https://)

## Output Fields
- `url`: The requested URL
- `source_url`: Final URL after redirects
- `content_type`: Content-Type header value
- `detection`: "raw", "markdown-heuristic" or "html-extracted"
- `selector`: Selector that matched the main content (HTML only)
- `title`: Document title (HTML only)
- `markdown`: The Markdown content

## Examples

### Read an article
```json
{"url": "https://example.com/blog/post"}
```

## Error Handling
- Missing or non-http(s) URLs are rejected before any request
- Requests time out after 10 seconds
- Non-2xx responses fail with "HTTP <status>"
- Connection failures fail with "Network error - no response received"

## Security
TLS certificate validation is disabled. Content from hosts with invalid
certificates is returned without warning.
"#;
