//! Relative URL resolution for links and images

use url::Url;

/// Resolve `reference` against `source_url`
///
/// Empty references, references that already carry a scheme, and anything
/// that cannot be resolved are returned unchanged.
pub fn absolutize(reference: &str, source_url: &str) -> String {
    match Url::parse(source_url) {
        Ok(base) => absolutize_with(reference, &base),
        Err(_) => reference.to_string(),
    }
}

/// Resolve `reference` against an already parsed base URL
pub fn absolutize_with(reference: &str, base: &Url) -> String {
    let trimmed = reference.trim();
    if trimmed.is_empty() || has_scheme(trimmed) {
        return reference.to_string();
    }

    // Fragments, protocol-relative and path references all go through the
    // same RFC 3986 resolution.
    match base.join(trimmed) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => reference.to_string(),
    }
}

fn has_scheme(reference: &str) -> bool {
    Url::parse(reference).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "https://example.com/blog/post";

    #[test]
    fn test_site_root_path() {
        assert_eq!(
            absolutize("/docs/page", SOURCE),
            "https://example.com/docs/page"
        );
    }

    #[test]
    fn test_relative_paths() {
        assert_eq!(absolutize("../x", SOURCE), "https://example.com/x");
        assert_eq!(absolutize("other", SOURCE), "https://example.com/blog/other");
        assert_eq!(
            absolutize("./img/a.png", SOURCE),
            "https://example.com/blog/img/a.png"
        );
        assert_eq!(
            absolutize("?page=2", SOURCE),
            "https://example.com/blog/post?page=2"
        );
    }

    #[test]
    fn test_fragment_and_protocol_relative() {
        assert_eq!(
            absolutize("#section", SOURCE),
            "https://example.com/blog/post#section"
        );
        assert_eq!(
            absolutize("//cdn.example.net/lib.js", SOURCE),
            "https://cdn.example.net/lib.js"
        );
        assert_eq!(
            absolutize("//cdn.example.net/a", "http://example.com/"),
            "http://cdn.example.net/a"
        );
    }

    #[test]
    fn test_absolute_references_unchanged() {
        assert_eq!(absolutize("https://other.com/y", SOURCE), "https://other.com/y");
        assert_eq!(absolutize("HTTP://Other.com/Y", SOURCE), "HTTP://Other.com/Y");
        assert_eq!(
            absolutize("mailto:someone@example.com", SOURCE),
            "mailto:someone@example.com"
        );
        assert_eq!(
            absolutize("javascript:void(0)", SOURCE),
            "javascript:void(0)"
        );
        assert_eq!(
            absolutize("data:image/png;base64,AAAA", SOURCE),
            "data:image/png;base64,AAAA"
        );
    }

    #[test]
    fn test_empty_reference_unchanged() {
        assert_eq!(absolutize("", SOURCE), "");
        assert_eq!(absolutize("   ", SOURCE), "   ");
    }

    #[test]
    fn test_unparseable_source_passes_through() {
        assert_eq!(absolutize("/docs", "not a url"), "/docs");
        assert_eq!(absolutize("../x", ""), "../x");
    }

    #[test]
    fn test_malformed_reference_passes_through() {
        assert_eq!(absolutize("http://[::1", SOURCE), "http://[::1");
    }

    #[test]
    fn test_whitespace_around_reference_is_ignored() {
        assert_eq!(
            absolutize("  /docs/page\n", SOURCE),
            "https://example.com/docs/page"
        );
    }
}
