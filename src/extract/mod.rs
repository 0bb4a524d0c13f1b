//! Document extraction from fetched HTML
//!
//! This module turns raw page bytes into a [`Document`]:
//! - one parse per page
//! - `script`, `style` and `noscript` subtrees are never walked
//! - title, full body text and per-level heading text are collected
//! - every field goes through [`normalize`]

mod document;
mod normalize;

pub use document::Document;
pub use normalize::normalize;

use scraper::{ElementRef, Html, Node};
use thiserror::Error;

/// Elements whose subtrees never contribute text
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript"];

/// Errors raised while building or (de)serializing a document record
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Sidecar serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Parses raw page bytes into an HTML tree
///
/// Bytes are decoded as UTF-8 with replacement characters; html5ever
/// recovers from any malformed markup, so a tree is always produced.
pub fn parse_page(html: &[u8]) -> Html {
    Html::parse_document(&String::from_utf8_lossy(html))
}

/// Extracts and normalizes the document record for `url` from raw bytes
///
/// # Example
///
/// ```
/// use kavosh::extract_document;
///
/// let html = r#"<html><head><title> پيانو </title></head>
///     <body><h1>Digital</h1><script>var x = 1;</script><p>text</p></body></html>"#;
/// let doc = extract_document(html.as_bytes(), "https://barbadpiano.com/");
/// assert_eq!(doc.title, "پیانو");
/// assert_eq!(doc.h1, "Digital");
/// assert!(!doc.body.contains("var x"));
/// ```
pub fn extract_document(html: &[u8], url: &str) -> Document {
    document_from_html(&parse_page(html), url)
}

/// Builds the document record from an already parsed page
pub fn document_from_html(page: &Html, url: &str) -> Document {
    let mut title: Option<String> = None;
    let mut body = String::new();
    let mut headings: [Vec<String>; 6] = Default::default();

    // Pre-order walk; children are pushed reversed to keep document order.
    let mut stack = vec![page.tree.root()];
    while let Some(node) = stack.pop() {
        match node.value() {
            Node::Element(element) => {
                let name = element.name();
                if SKIPPED_ELEMENTS.contains(&name) {
                    continue;
                }

                if name == "title" && title.is_none() {
                    title = Some(
                        node.first_child()
                            .and_then(|child| child.value().as_text())
                            .map(|text| text.trim().to_string())
                            .unwrap_or_default(),
                    );
                }

                if let Some(level) = heading_level(name) {
                    if let Some(heading) = ElementRef::wrap(node) {
                        headings[level - 1].push(heading_text(heading));
                    }
                }
            }
            Node::Text(text) => {
                body.push_str(text);
                body.push(' ');
            }
            _ => {}
        }

        stack.extend(node.children().rev());
    }

    let [h1, h2, h3, h4, h5, h6] = headings.map(|texts| normalize(&texts.join(" ")));

    Document {
        url: url.to_string(),
        title: normalize(&title.unwrap_or_default()),
        body: normalize(&body),
        h1,
        h2,
        h3,
        h4,
        h5,
        h6,
    }
}

/// Maps `h1`..`h6` to `1..=6`
fn heading_level(name: &str) -> Option<usize> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Descendant text of a heading, space separated
///
/// Walks the subtree the same way the body walk does, so skipped elements
/// nested in a heading contribute nothing.
fn heading_text(heading: ElementRef<'_>) -> String {
    let mut parts: Vec<&str> = Vec::new();

    let mut stack = vec![*heading];
    while let Some(node) = stack.pop() {
        match node.value() {
            Node::Element(element) if SKIPPED_ELEMENTS.contains(&element.name()) => continue,
            Node::Text(text) => parts.push(text),
            _ => {}
        }

        stack.extend(node.children().rev());
    }

    parts.join(" ").trim().to_string()
}
