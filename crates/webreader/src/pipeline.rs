//! Fetched payload to Markdown
//!
//! Total once a body is available: every stage has a fallback, so the only
//! failures a caller can see come from the transport.

use crate::classify::{classify, ContentClassification};
use crate::convert::{to_markdown, ConversionContext};
use crate::extract::{extract_main, Document};
use crate::types::{DetectionMethod, FetchResult, MarkdownResult};
use tracing::debug;

/// Classify, extract and convert a fetched payload
///
/// `url` on the result is set to the source URL; callers that know the
/// originally requested URL overwrite it.
pub fn process(fetch: &FetchResult) -> MarkdownResult {
    match classify(&fetch.body, &fetch.content_type) {
        ContentClassification::PlainOrMarkdown { body, method } => {
            debug!(
                url = %fetch.source_url,
                detection = %method,
                "Returning body unchanged"
            );
            MarkdownResult {
                url: fetch.source_url.clone(),
                source_url: fetch.source_url.clone(),
                content_type: fetch.content_type.clone(),
                detection: method,
                selector: None,
                title: None,
                markdown: body.to_string(),
            }
        }
        ContentClassification::RequiresExtraction { html } => {
            let document = Document::parse(html);
            let main = extract_main(&document);
            let ctx = ConversionContext::new(&fetch.source_url);
            let markdown = to_markdown(main.node, &ctx);
            debug!(
                url = %fetch.source_url,
                selector = main.selector,
                bytes = markdown.len(),
                "Converted HTML to markdown"
            );
            MarkdownResult {
                url: fetch.source_url.clone(),
                source_url: fetch.source_url.clone(),
                content_type: fetch.content_type.clone(),
                detection: DetectionMethod::HtmlExtracted,
                selector: Some(main.selector.to_string()),
                title: document.title(),
                markdown,
            }
        }
    }
}
