//! Content resolver
//!
//! Known publishers wrap their article bodies in recognizable containers.
//! Those are tried first, in a fixed order, through [`SiteAdapter`]s. Pages
//! that match none of them (or whose containers hold no text) fall back to
//! aggregating paragraphs and lists from `<body>`.

use crate::document::{Document, Node};
use tracing::debug;

/// Returned when every tier yields empty text
pub const NO_CONTENT: &str =
    "Input is either empty webpage or its HTML is not parsable with current state of this code!";

/// Concatenated follow/unfollow button labels found in Medium article bodies
const MEDIUM_FOLLOW_BUTTON: &str = "BlockedUnblockFollowFollowing";

/// Site adapters in priority order
const SITE_ADAPTERS: &[SiteAdapter] = &[
    SiteAdapter {
        name: "medium",
        container: ".section-inner.sectionLayout--insetColumn",
        walk: Walk::ChildNodes {
            boilerplate: MEDIUM_FOLLOW_BUTTON,
        },
    },
    SiteAdapter {
        name: "bbc",
        container: ".story-body__inner",
        walk: Walk::Paragraphs,
    },
    SiteAdapter {
        name: "foxnews",
        container: ".article-body",
        walk: Walk::Paragraphs,
    },
];

/// How an adapter collects text from its containers
#[derive(Debug, Clone, Copy)]
enum Walk {
    /// Text of every direct child node, dropping fragments that contain
    /// the boilerplate marker
    ChildNodes { boilerplate: &'static str },
    /// Text of `<p>` descendants that hold no line break
    Paragraphs,
}

/// Content strategy keyed by a container class signature
#[derive(Debug, Clone, Copy)]
struct SiteAdapter {
    name: &'static str,
    container: &'static str,
    walk: Walk,
}

impl SiteAdapter {
    /// Whether the page carries this adapter's container
    fn matches(&self, doc: &Document) -> bool {
        !doc.select(self.container).is_empty()
    }

    fn extract(&self, doc: &Document) -> String {
        let mut acc = Fragments::default();
        for container in doc.select(self.container) {
            match self.walk {
                Walk::ChildNodes { boilerplate } => {
                    for text in container.child_texts() {
                        if !text.contains(boilerplate) {
                            acc.push(&text);
                        }
                    }
                }
                Walk::Paragraphs => {
                    for p in container.select("p") {
                        push_single_line(&mut acc, &p);
                    }
                }
            }
        }
        acc.finish()
    }
}

/// Space-separated accumulator of text fragments
#[derive(Debug, Default)]
struct Fragments(String);

impl Fragments {
    /// Append a fragment followed by a space; blank fragments are dropped
    fn push(&mut self, fragment: &str) {
        if fragment.trim().is_empty() {
            return;
        }
        self.0.push_str(fragment);
        self.0.push(' ');
    }

    fn finish(self) -> String {
        self.0.trim().to_string()
    }
}

fn push_single_line(acc: &mut Fragments, node: &Node<'_>) {
    let text = node.text();
    if !text.contains('\n') {
        acc.push(&text);
    }
}

/// Structural fallback: body paragraphs, then ordered lists, then
/// unordered lists
fn extract_generic(doc: &Document) -> String {
    let mut acc = Fragments::default();
    for p in doc.select("body p") {
        push_single_line(&mut acc, &p);
    }
    for list in doc
        .select("body ol")
        .into_iter()
        .chain(doc.select("body ul"))
    {
        acc.push(&list.text());
    }
    acc.finish()
}

/// Resolve the main textual content of a page
///
/// Never fails; falls back to [`NO_CONTENT`].
pub fn resolve_content(doc: &Document) -> String {
    for adapter in SITE_ADAPTERS {
        if !adapter.matches(doc) {
            continue;
        }
        let text = adapter.extract(doc);
        if !text.is_empty() {
            debug!(adapter = adapter.name, "Resolved content");
            return text;
        }
    }

    let text = extract_generic(doc);
    if text.is_empty() {
        NO_CONTENT.to_string()
    } else {
        debug!(adapter = "generic", "Resolved content");
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_of(html: &str) -> String {
        resolve_content(&Document::from_html(html))
    }

    #[test]
    fn test_generic_paragraphs_space_joined() {
        let html = "<body><p>Stuff to p1</p><p>Stuff to p2</p></body>";
        assert_eq!(content_of(html), "Stuff to p1 Stuff to p2");
    }

    #[test]
    fn test_generic_skips_multiline_paragraphs() {
        let html = "<body><p>kept</p><p>dropped\nacross lines</p><p>also kept</p></body>";
        assert_eq!(content_of(html), "kept also kept");
    }

    #[test]
    fn test_generic_lists_after_paragraphs() {
        let html = "<body><ul><li>u1</li></ul><ol><li>o1</li><li>o2</li></ol><p>para</p></body>";
        assert_eq!(content_of(html), "para o1o2 u1");
    }

    #[test]
    fn test_generic_lists_keep_line_breaks() {
        let html = "<body><ul>\n<li>one</li>\n<li>two</li>\n</ul></body>";
        assert_eq!(content_of(html), "one\ntwo");
    }

    #[test]
    fn test_medium_child_nodes() {
        let html = r#"<body>
            <div class="section-inner sectionLayout--insetColumn">Intro text<h3>Heading</h3><p>Body <em>copy</em></p><span>BlockedUnblockFollowFollowing</span></div>
            <p>outside paragraph</p>
        </body>"#;
        assert_eq!(content_of(html), "Intro text Heading Body copy");
    }

    #[test]
    fn test_medium_requires_both_classes() {
        let html = r#"<body><div class="section-inner">not medium</div><p>generic</p></body>"#;
        assert_eq!(content_of(html), "generic");
    }

    #[test]
    fn test_bbc_paragraphs() {
        let html = r#"<body>
            <div class="story-body__inner">
                <p>First line.</p>
                <div><p>Nested paragraph.</p></div>
                <p>Broken
                   paragraph.</p>
            </div>
            <p>Sidebar</p>
        </body>"#;
        assert_eq!(content_of(html), "First line. Nested paragraph.");
    }

    #[test]
    fn test_foxnews_paragraphs() {
        let html = r#"<body><div class="article-body"><p>Fox one.</p><p>Fox two.</p></div><p>footer</p></body>"#;
        assert_eq!(content_of(html), "Fox one. Fox two.");
    }

    #[test]
    fn test_adapter_priority() {
        let html = r#"<body>
            <div class="article-body"><p>fox</p></div>
            <div class="story-body__inner"><p>bbc</p></div>
        </body>"#;
        assert_eq!(content_of(html), "bbc");
    }

    #[test]
    fn test_empty_adapter_falls_through() {
        let html = r#"<body><div class="story-body__inner"><p>only
            multi-line</p></div><p>fallback text</p></body>"#;
        assert_eq!(content_of(html), "fallback text");
    }

    #[test]
    fn test_multiple_containers_accumulate() {
        let html = r#"<body><div class="article-body"><p>a</p></div><div class="article-body"><p>b</p></div></body>"#;
        assert_eq!(content_of(html), "a b");
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        assert_eq!(content_of("<body><p>   </p><ul> </ul></body>"), NO_CONTENT);
    }

    #[test]
    fn test_fallback() {
        assert_eq!(content_of(""), NO_CONTENT);
        assert_eq!(
            content_of("<html><head><title>Test Page1!</title></head><body></body></html>"),
            NO_CONTENT
        );
    }

    #[test]
    fn test_adapter_matches() {
        let doc = Document::from_html(r#"<div class="article-body"></div>"#);
        assert!(!SITE_ADAPTERS[0].matches(&doc));
        assert!(!SITE_ADAPTERS[1].matches(&doc));
        assert!(SITE_ADAPTERS[2].matches(&doc));
        assert_eq!(SITE_ADAPTERS[2].extract(&doc), "");
    }

    #[test]
    fn test_fragments() {
        let mut acc = Fragments::default();
        acc.push("a");
        acc.push("");
        acc.push("  ");
        acc.push("b");
        assert_eq!(acc.finish(), "a b");
    }
}
