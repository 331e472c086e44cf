//! Document adapter over the `scraper` HTML tree
//!
//! The extraction engine only relies on four capabilities of a parsed
//! page: selecting by pattern, iterating matches in document order,
//! reading text and reading attributes. [`Document`] and [`Node`] expose
//! exactly that and nothing else.

use crate::error::ExtractError;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// Number of leading bytes inspected for binary payloads
const SNIFF_LEN: usize = 1024;

/// A parsed HTML page, immutable once built
///
/// Owned by a single extraction request. Node-sets returned by
/// [`Document::select`] borrow from it and cannot outlive it.
#[derive(Debug)]
pub struct Document {
    html: Html,
}

impl Document {
    /// Build a document from raw bytes
    ///
    /// Parsing is permissive: empty or malformed markup yields an
    /// empty-but-valid document. Only payloads that are not markup at all
    /// (a NUL byte near the start) are rejected.
    pub fn parse(bytes: &[u8]) -> Result<Self, ExtractError> {
        if bytes.iter().take(SNIFF_LEN).any(|&b| b == 0) {
            return Err(ExtractError::ParseError(
                "input looks like binary data, not HTML".to_string(),
            ));
        }

        Ok(Self::from_html(&String::from_utf8_lossy(bytes)))
    }

    /// Build a document from an HTML string
    pub fn from_html(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Select all elements matching `pattern`, in document order
    pub fn select(&self, pattern: &str) -> Vec<Node<'_>> {
        match compile(pattern) {
            Some(selector) => self.html.select(&selector).map(Node::new).collect(),
            None => Vec::new(),
        }
    }
}

/// One element of a node-set
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
}

impl<'a> Node<'a> {
    fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    /// Concatenated text of all descendant text nodes
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Attribute value, if present
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Select descendants of this node matching `pattern`
    pub fn select(&self, pattern: &str) -> Vec<Node<'a>> {
        match compile(pattern) {
            Some(selector) => self.element.select(&selector).map(Node::new).collect(),
            None => Vec::new(),
        }
    }

    /// Text of each direct child node, including bare text nodes
    ///
    /// Element children contribute their full descendant text. Comments
    /// and other non-text nodes are skipped.
    pub fn child_texts(&self) -> Vec<String> {
        self.element
            .children()
            .filter_map(|child| {
                if let Some(text) = child.value().as_text() {
                    Some(String::from(&**text))
                } else {
                    ElementRef::wrap(child).map(|el| el.text().collect())
                }
            })
            .collect()
    }
}

fn compile(pattern: &str) -> Option<Selector> {
    match Selector::parse(pattern) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!(pattern, error = ?e, "Invalid selector pattern");
            None
        }
    }
}
