//! Format detection: plain text, Markdown, or HTML

use crate::types::DetectionMethod;
use regex::Regex;
use std::sync::LazyLock;

/// Content types returned unchanged (prefix match, parameters ignored)
pub const PLAIN_CONTENT_TYPES: &[&str] = &["text/plain", "text/markdown", "text/x-markdown"];

/// Line starting with 1-6 `#` followed by whitespace
pub static ATX_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*#{1,6}\s").expect("ATX_HEADING should compile"));

/// Non-empty line followed by a line of only `=` or only `-` (3 or more)
pub static SETEXT_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^.*\S.*\r?\n(?:={3,}|-{3,})\r?$").expect("SETEXT_HEADING should compile")
});

/// Outcome of format detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentClassification<'a> {
    /// Body is already usable as Markdown
    PlainOrMarkdown {
        body: &'a str,
        method: DetectionMethod,
    },
    /// Body is HTML and needs extraction
    RequiresExtraction { html: &'a str },
}

/// Classify a fetched body
pub fn classify<'a>(body: &'a str, content_type: &str) -> ContentClassification<'a> {
    if is_plain_content_type(content_type) {
        return ContentClassification::PlainOrMarkdown {
            body,
            method: DetectionMethod::Raw,
        };
    }

    if looks_like_markdown(body) {
        return ContentClassification::PlainOrMarkdown {
            body,
            method: DetectionMethod::MarkdownHeuristic,
        };
    }

    ContentClassification::RequiresExtraction { html: body }
}

/// Check the media type, ignoring case, surrounding whitespace and parameters
pub fn is_plain_content_type(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    PLAIN_CONTENT_TYPES
        .iter()
        .any(|prefix| media_type.starts_with(prefix))
}

/// Heading-based Markdown detection
///
/// Headings are searched anywhere in the body, not only on the first line.
/// An HTML page with a line such as `# note` inside a `<pre>` will therefore
/// be returned as-is.
pub fn looks_like_markdown(body: &str) -> bool {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return false;
    }

    ATX_HEADING.is_match(trimmed) || SETEXT_HEADING.is_match(trimmed)
}
