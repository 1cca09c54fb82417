//! Main-content selection
//!
//! The parsed document owns every node in an arena. [`ContentNode`] is a
//! copyable handle into that arena: children and parent are reached through
//! node ids, so the extracted subtree is never cloned.

use ego_tree::NodeRef;
use scraper::{Html, Node, Selector};
use tracing::debug;

/// Candidate containers for the main content, highest priority first
///
/// Ids before tag names before generic class names, with `body` as the last
/// resort. The order is load-bearing.
pub const MAIN_CONTENT_SELECTORS: &[&str] = &[
    "#main-col-body",
    "#main-content",
    "article",
    "main",
    ".article",
    ".post",
    ".content",
    "body",
];

/// Reported when no selector matched and the whole document is used
pub const DOCUMENT_ROOT: &str = ":root";

/// A parsed HTML document
///
/// Parsing follows the HTML5 algorithm, so malformed markup is repaired
/// rather than rejected.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse a full HTML document
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Root of the tree (the document node itself)
    pub fn root(&self) -> ContentNode<'_> {
        ContentNode::from(self.html.tree.root())
    }

    /// First element matching a CSS selector, in document order
    pub fn select_first(&self, selector: &str) -> Option<ContentNode<'_>> {
        let selector = Selector::parse(selector).ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|element| ContentNode::from(*element))
    }

    /// Text of the `<title>` element, if any
    pub fn title(&self) -> Option<String> {
        let title = self.select_first("title")?.text_content();
        let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
        if title.is_empty() {
            None
        } else {
            Some(title)
        }
    }
}

/// Borrowed handle to a node of a [`Document`]
#[derive(Debug, Clone, Copy)]
pub struct ContentNode<'a> {
    node: NodeRef<'a, Node>,
}

impl<'a> From<NodeRef<'a, Node>> for ContentNode<'a> {
    fn from(node: NodeRef<'a, Node>) -> Self {
        Self { node }
    }
}

impl<'a> ContentNode<'a> {
    pub fn value(&self) -> &'a Node {
        self.node.value()
    }

    /// Lowercase tag name, `None` for text and other non-element nodes
    pub fn tag_name(&self) -> Option<&'a str> {
        self.node.value().as_element().map(|element| element.name())
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.node
            .value()
            .as_element()
            .and_then(|element| element.attr(name))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.node
            .value()
            .as_element()
            .is_some_and(|element| element.classes().any(|c| c == class))
    }

    /// Text of a text node
    pub fn text(&self) -> Option<&'a str> {
        self.node.value().as_text().map(|text| &**text)
    }

    pub fn children(&self) -> impl Iterator<Item = ContentNode<'a>> {
        self.node.children().map(ContentNode::from)
    }

    /// This node followed by all of its descendants, in document order
    pub fn descendants(&self) -> impl Iterator<Item = ContentNode<'a>> {
        self.node.descendants().map(ContentNode::from)
    }

    pub fn parent(&self) -> Option<ContentNode<'a>> {
        self.node.parent().map(ContentNode::from)
    }

    pub fn is_document_root(&self) -> bool {
        self.node.value().is_document()
    }

    /// Concatenated text of every descendant text node, unmodified
    pub fn text_content(&self) -> String {
        self.node
            .descendants()
            .filter_map(|node| node.value().as_text())
            .map(|text| &**text)
            .collect()
    }
}

/// The subtree chosen as main content and the selector that found it
#[derive(Debug, Clone, Copy)]
pub struct MainContent<'a> {
    pub node: ContentNode<'a>,
    pub selector: &'static str,
}

/// Pick the main content of a document
///
/// Never fails: when even `body` is missing the document root is returned.
pub fn extract_main(document: &Document) -> MainContent<'_> {
    for selector in MAIN_CONTENT_SELECTORS {
        if let Some(node) = document.select_first(selector) {
            debug!(selector, "Main content located");
            return MainContent { node, selector };
        }
    }

    debug!("No content container found, using document root");
    MainContent {
        node: document.root(),
        selector: DOCUMENT_ROOT,
    }
}
