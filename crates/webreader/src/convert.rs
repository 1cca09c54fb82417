//! HTML to Markdown conversion
//!
//! Walks a [`ContentNode`] subtree and writes Markdown. Every rule degrades
//! to plain text, so conversion cannot fail.

use crate::absolutize::absolutize_with;
use crate::extract::ContentNode;
use scraper::Node;
use url::Url;

/// Elements whose content is never emitted
const SKIP_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "template", "iframe", "svg", "canvas", "head", "title", "meta",
    "link", "object", "embed", "button", "input", "select", "textarea",
];

/// Elements rendered as blank-line separated blocks
const BLOCK_ELEMENTS: &[&str] = &[
    "html", "body", "p", "div", "section", "article", "main", "header", "footer", "aside", "nav",
    "figure", "figcaption", "address", "details", "summary", "dialog", "dl", "dt", "dd", "form",
    "fieldset", "legend", "center", "hgroup", "search", "caption", "thead", "tbody", "tfoot", "tr",
    "td", "th",
];

/// Marks the opening line of a fenced code block until output cleanup
const FENCE_MARK: char = '\u{E000}';

/// Descendants that turn a `<table>` into a layout table
const LAYOUT_TABLE_MARKERS: &[&str] = &[
    "table", "p", "div", "ul", "ol", "pre", "blockquote", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// Base URL for rewriting relative links and images
#[derive(Debug, Clone, Default)]
pub struct ConversionContext {
    base: Option<Url>,
}

impl ConversionContext {
    /// Build a context for the given source URL
    ///
    /// An unparseable source URL leaves every reference untouched.
    pub fn new(source_url: &str) -> Self {
        Self {
            base: Url::parse(source_url).ok(),
        }
    }

    pub fn base(&self) -> Option<&Url> {
        self.base.as_ref()
    }

    /// Make `reference` absolute against the source URL
    pub fn absolutize(&self, reference: &str) -> String {
        match &self.base {
            Some(base) => absolutize_with(reference, base),
            None => reference.to_string(),
        }
    }
}

/// Convert a subtree to Markdown
pub fn to_markdown(node: ContentNode<'_>, ctx: &ConversionContext) -> String {
    let mut writer = MarkdownWriter::default();
    Converter { ctx }.render(node, &mut writer);
    normalize_whitespace(&writer.out)
}

/// Inline content rendered on its own, with its edge whitespace recorded
struct Inline {
    body: String,
    leading: bool,
    trailing: bool,
}

/// Output buffer with HTML whitespace collapsing
///
/// Whitespace is held back as `pending_space` and only written between two
/// pieces of inline content on the same line.
#[derive(Default)]
struct MarkdownWriter {
    out: String,
    pending_space: bool,
    leading_space: bool,
}

impl MarkdownWriter {
    fn text(&mut self, text: &str) {
        for c in text.chars() {
            if c == FENCE_MARK {
                continue;
            } else if c.is_ascii_whitespace() {
                self.pending_space = true;
            } else {
                self.flush_space();
                self.out.push(c);
            }
        }
    }

    fn inline(&mut self, markup: &str) {
        if markup.is_empty() {
            return;
        }
        self.flush_space();
        self.out.push_str(markup);
    }

    fn space(&mut self) {
        self.pending_space = true;
    }

    fn flush_space(&mut self) {
        if !self.pending_space {
            return;
        }
        self.pending_space = false;
        if self.out.is_empty() {
            self.leading_space = true;
        } else if !self.out.ends_with([' ', '\n']) {
            self.out.push(' ');
        }
    }

    /// Write pre-formatted text at the start of a line
    fn raw(&mut self, text: &str) {
        self.pending_space = false;
        self.out.push_str(text);
    }

    fn trim_trailing_spaces(&mut self) {
        self.pending_space = false;
        let len = self.out.trim_end_matches(' ').len();
        self.out.truncate(len);
    }

    /// Ensure the output ends with a blank line
    fn block_break(&mut self) {
        self.trim_trailing_spaces();
        if self.out.is_empty() {
            return;
        }
        while !self.out.ends_with("\n\n") {
            self.out.push('\n');
        }
    }

    /// Ensure the output ends with a newline
    fn line_break(&mut self) {
        self.trim_trailing_spaces();
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }

    /// `<br>`: always starts a new line, repeated breaks open a paragraph
    fn hard_break(&mut self) {
        self.trim_trailing_spaces();
        if !self.out.is_empty() {
            self.out.push('\n');
        }
    }

    fn into_inline(self) -> Inline {
        Inline {
            leading: self.leading_space || (self.out.is_empty() && self.pending_space),
            trailing: self.pending_space,
            body: self.out.trim().to_string(),
        }
    }

    fn into_block(self) -> String {
        self.out.trim_matches(|c: char| c == '\n' || c == ' ').to_string()
    }
}

struct Converter<'c> {
    ctx: &'c ConversionContext,
}

impl Converter<'_> {
    fn render(&self, node: ContentNode<'_>, w: &mut MarkdownWriter) {
        match node.value() {
            Node::Text(text) => w.text(text),
            Node::Element(element) => self.render_element(node, element.name(), w),
            Node::Document | Node::Fragment => self.render_children(node, w),
            _ => {}
        }
    }

    fn render_children(&self, node: ContentNode<'_>, w: &mut MarkdownWriter) {
        for child in node.children() {
            self.render(child, w);
        }
    }

    fn render_element(&self, node: ContentNode<'_>, name: &str, w: &mut MarkdownWriter) {
        if SKIP_ELEMENTS.contains(&name) {
            return;
        }

        match name {
            "h1" => self.heading(node, 1, w),
            "h2" => self.heading(node, 2, w),
            "h3" => self.heading(node, 3, w),
            "h4" => self.heading(node, 4, w),
            "h5" => self.heading(node, 5, w),
            "h6" => self.heading(node, 6, w),
            "br" => w.hard_break(),
            "hr" => {
                w.block_break();
                w.raw("---");
                w.block_break();
            }
            "strong" | "b" => self.delimited(node, "**", w),
            "em" | "i" => self.delimited(node, "*", w),
            "code" | "kbd" | "samp" | "tt" => inline_code(node, w),
            "pre" => code_block(node, w),
            "a" => self.link(node, w),
            "img" => self.image(node, w),
            "ul" | "ol" => self.list(node, name == "ol", w),
            "li" => self.list_item(node, "- ", w),
            "blockquote" => self.blockquote(node, w),
            "table" => self.table(node, w),
            _ if BLOCK_ELEMENTS.contains(&name) => {
                w.block_break();
                self.render_children(node, w);
                w.block_break();
            }
            _ => self.render_children(node, w),
        }
    }

    fn inline_fragment(&self, node: ContentNode<'_>) -> Inline {
        let mut inner = MarkdownWriter::default();
        self.render_children(node, &mut inner);
        inner.into_inline()
    }

    fn block_fragment(&self, node: ContentNode<'_>) -> String {
        let mut inner = MarkdownWriter::default();
        self.render_children(node, &mut inner);
        inner.into_block()
    }

    /// Write inline markup, keeping the fragment's edge whitespace outside it
    fn emit_inline(&self, fragment: &Inline, markup: &str, w: &mut MarkdownWriter) {
        if fragment.leading {
            w.space();
        }
        w.inline(markup);
        if fragment.trailing {
            w.space();
        }
    }

    fn heading(&self, node: ContentNode<'_>, level: usize, w: &mut MarkdownWriter) {
        let text = one_line(&self.inline_fragment(node).body);
        if text.is_empty() {
            return;
        }
        w.block_break();
        w.raw(&format!("{} {}", "#".repeat(level), text));
        w.block_break();
    }

    fn delimited(&self, node: ContentNode<'_>, marker: &str, w: &mut MarkdownWriter) {
        let fragment = self.inline_fragment(node);
        let body = one_line(&fragment.body);
        if body.is_empty() {
            if fragment.leading || fragment.trailing {
                w.space();
            }
            return;
        }
        self.emit_inline(&fragment, &format!("{marker}{body}{marker}"), w);
    }

    fn link(&self, node: ContentNode<'_>, w: &mut MarkdownWriter) {
        let href = match node.attr("href").map(str::trim) {
            Some(href) if !href.is_empty() => href,
            _ => {
                self.render_children(node, w);
                return;
            }
        };

        let fragment = self.inline_fragment(node);
        let text = one_line(&fragment.body);
        if text.is_empty() {
            if fragment.leading || fragment.trailing {
                w.space();
            }
            return;
        }

        let url = self.ctx.absolutize(href);
        let markup = match title_of(node) {
            Some(title) => format!("[{text}]({url} \"{title}\")"),
            None => format!("[{text}]({url})"),
        };
        self.emit_inline(&fragment, &markup, w);
    }

    fn image(&self, node: ContentNode<'_>, w: &mut MarkdownWriter) {
        let src = ["src", "data-src"]
            .iter()
            .filter_map(|attr| node.attr(attr))
            .map(str::trim)
            .find(|src| !src.is_empty());
        let Some(src) = src else {
            return;
        };

        let alt = collapse(node.attr("alt").unwrap_or_default());
        let url = self.ctx.absolutize(src);
        let markup = match title_of(node) {
            Some(title) => format!("![{alt}]({url} \"{title}\")"),
            None => format!("![{alt}]({url})"),
        };
        w.inline(&markup);
    }

    fn list(&self, node: ContentNode<'_>, ordered: bool, w: &mut MarkdownWriter) {
        let nested = node
            .parent()
            .is_some_and(|parent| parent.tag_name() == Some("li"));
        if nested {
            w.line_break();
        } else {
            w.block_break();
        }

        let mut index: i64 = if ordered {
            node.attr("start")
                .and_then(|start| start.trim().parse().ok())
                .unwrap_or(1)
        } else {
            1
        };

        for child in node.children() {
            match child.tag_name() {
                Some("li") => {
                    let marker = if ordered {
                        format!("{index}. ")
                    } else {
                        "- ".to_string()
                    };
                    index = index.saturating_add(1);
                    self.list_item(child, &marker, w);
                }
                Some(_) => self.render(child, w),
                None => {
                    if let Some(text) = child.text() {
                        if !text.trim().is_empty() {
                            w.text(text);
                        }
                    }
                }
            }
        }

        if nested {
            w.line_break();
        } else {
            w.block_break();
        }
    }

    /// Item content goes on the marker line; following lines are indented
    /// by the marker width so nested lists line up under their parent.
    fn list_item(&self, node: ContentNode<'_>, marker: &str, w: &mut MarkdownWriter) {
        let content = self.block_fragment(node);
        let indent = " ".repeat(marker.len());

        w.line_break();
        let mut lines = content.lines();
        w.raw(marker);
        w.raw(lines.next().unwrap_or_default());
        for line in lines {
            w.raw("\n");
            if !line.trim().is_empty() {
                w.raw(&indent);
                w.raw(line);
            }
        }
        w.line_break();
    }

    fn blockquote(&self, node: ContentNode<'_>, w: &mut MarkdownWriter) {
        let content = self.block_fragment(node);
        if content.is_empty() {
            return;
        }

        let quoted = content
            .lines()
            .map(|line| {
                if line.trim().is_empty() {
                    ">".to_string()
                } else {
                    format!("> {line}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        w.block_break();
        w.raw(&quoted);
        w.block_break();
    }

    fn table(&self, node: ContentNode<'_>, w: &mut MarkdownWriter) {
        let is_layout = node.descendants().skip(1).any(|descendant| {
            descendant
                .tag_name()
                .is_some_and(|name| LAYOUT_TABLE_MARKERS.contains(&name))
        });
        if is_layout {
            w.block_break();
            self.render_children(node, w);
            w.block_break();
            return;
        }

        let mut caption = None;
        let mut rows = Vec::new();
        for child in node.children() {
            match child.tag_name() {
                Some("caption") => caption = Some(one_line(&self.inline_fragment(child).body)),
                Some("tr") => rows.push(self.table_row(child)),
                Some("thead" | "tbody" | "tfoot") => rows.extend(
                    child
                        .children()
                        .filter(|row| row.tag_name() == Some("tr"))
                        .map(|row| self.table_row(row)),
                ),
                _ => {}
            }
        }
        rows.retain(|row| !row.is_empty());

        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        if columns == 0 {
            return;
        }

        let mut lines = Vec::with_capacity(rows.len() + 1);
        for (i, row) in rows.iter_mut().enumerate() {
            row.resize(columns, String::new());
            lines.push(format!("| {} |", row.join(" | ")));
            if i == 0 {
                lines.push(format!("| {} |", vec!["---"; columns].join(" | ")));
            }
        }

        w.block_break();
        if let Some(caption) = caption.filter(|caption| !caption.is_empty()) {
            w.raw(&caption);
            w.block_break();
        }
        w.raw(&lines.join("\n"));
        w.block_break();
    }

    fn table_row(&self, row: ContentNode<'_>) -> Vec<String> {
        row.children()
            .filter(|cell| matches!(cell.tag_name(), Some("td" | "th")))
            .map(|cell| one_line(&self.inline_fragment(cell).body).replace('|', "\\|"))
            .collect()
    }
}

fn inline_code(node: ContentNode<'_>, w: &mut MarkdownWriter) {
    let raw = node.text_content();
    let code = collapse(&raw);
    if code.is_empty() {
        if !raw.is_empty() {
            w.space();
        }
        return;
    }

    if raw.starts_with(|c: char| c.is_ascii_whitespace()) {
        w.space();
    }
    if code.contains('`') {
        w.inline(&format!("`` {code} ``"));
    } else {
        w.inline(&format!("`{code}`"));
    }
    if raw.ends_with(|c: char| c.is_ascii_whitespace()) {
        w.space();
    }
}

fn code_block(node: ContentNode<'_>, w: &mut MarkdownWriter) {
    let code_child = node
        .children()
        .find(|child| child.tag_name() == Some("code"));
    let language = language_hint(node)
        .or_else(|| code_child.and_then(language_hint))
        .unwrap_or_default();

    let text = preformatted_text(node);
    let code = text.trim_start_matches('\n').trim_end();
    if code.is_empty() {
        return;
    }

    let fence = "`".repeat(longest_backtick_run(code).max(2) + 1);
    w.block_break();
    w.raw(&format!("{FENCE_MARK}{fence}{language}\n{code}\n{fence}"));
    w.block_break();
}

/// Text of a `<pre>` subtree with `<br>` kept as line breaks
fn preformatted_text(node: ContentNode<'_>) -> String {
    let mut text = String::new();
    for descendant in node.descendants() {
        if let Some(chunk) = descendant.text() {
            text.extend(chunk.chars().filter(|&c| c != FENCE_MARK));
        } else if descendant.tag_name() == Some("br") {
            text.push('\n');
        }
    }
    text
}

/// `language-xxx` or `lang-xxx` class of a code element
fn language_hint<'a>(node: ContentNode<'a>) -> Option<&'a str> {
    node.attr("class")?.split_ascii_whitespace().find_map(|class| {
        class
            .strip_prefix("language-")
            .or_else(|| class.strip_prefix("lang-"))
            .filter(|language| !language.is_empty())
    })
}

fn longest_backtick_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

fn title_of(node: ContentNode<'_>) -> Option<String> {
    let title = collapse(node.attr("title")?);
    if title.is_empty() {
        None
    } else {
        Some(title.replace('"', "\\\""))
    }
}

/// Collapse whitespace runs to single spaces and trim
fn collapse(text: &str) -> String {
    text.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}

/// Join the non-empty lines of rendered inline content with spaces
fn one_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Final cleanup: strip trailing whitespace, keep at most one blank line in a
/// row, trim the document. Fenced code blocks, recognised by [`FENCE_MARK`]
/// on their opening line, are copied verbatim.
fn normalize_whitespace(markdown: &str) -> String {
    let mut result = String::with_capacity(markdown.len());
    let mut fence: Option<usize> = None;
    let mut blank_run = 0;

    for line in markdown.lines() {
        if let Some(open) = fence {
            result.push_str(line);
            result.push('\n');
            if fence_width(line).is_some_and(|width| width >= open)
                && line.trim().chars().all(|c| c == '`')
            {
                fence = None;
            }
            continue;
        }

        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }

        match line.split_once(FENCE_MARK) {
            Some((indent, opening)) => {
                if indent.trim().is_empty() {
                    fence = fence_width(opening);
                }
                result.push_str(indent);
                result.extend(opening.chars().filter(|&c| c != FENCE_MARK));
            }
            None => result.push_str(line),
        }
        result.push('\n');
    }

    result.trim().to_string()
}

/// Width of a code fence opening the line, if any
fn fence_width(line: &str) -> Option<usize> {
    let width = line.trim_start().chars().take_while(|&c| c == '`').count();
    (width >= 3).then_some(width)
}
