//! Title resolver

use crate::document::Document;
use tracing::debug;

/// Returned when no title-bearing tag has text
pub const NO_TITLE: &str = "There is no title-related tags found in the given URL!";

/// Tags tried in order; the first with non-blank text wins
const TITLE_TIERS: &[&str] = &["title", "h1", "h2", "h3"];

/// Resolve the page title
///
/// Takes the first element of each tier in turn and stops at the first
/// one whose text is non-blank. The winning text is returned as found,
/// surrounding whitespace included. Never fails.
pub fn resolve_title(doc: &Document) -> String {
    TITLE_TIERS
        .iter()
        .find_map(|&tag| {
            let text = doc.select(tag).first()?.text();
            if text.trim().is_empty() {
                return None;
            }
            debug!(tier = tag, "Resolved title");
            Some(text)
        })
        .unwrap_or_else(|| NO_TITLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_of(html: &str) -> String {
        resolve_title(&Document::from_html(html))
    }

    #[test]
    fn test_title_tag_wins_over_headings() {
        let html = "<html><head><title>Page Title</title></head>\
                    <body><h1>Heading</h1></body></html>";
        assert_eq!(title_of(html), "Page Title");
    }

    #[test]
    fn test_first_h1_when_title_missing() {
        let html = "<body><h2>Sub</h2><h1>First</h1><h1>Second</h1></body>";
        assert_eq!(title_of(html), "First");
    }

    #[test]
    fn test_blank_title_falls_through() {
        let html = "<head><title>   </title></head><body><h1>Heading</h1></body>";
        assert_eq!(title_of(html), "Heading");
    }

    #[test]
    fn test_h2_then_h3() {
        assert_eq!(title_of("<body><h3>Three</h3><h2>Two</h2></body>"), "Two");
        assert_eq!(title_of("<body><h3>Three</h3></body>"), "Three");
    }

    #[test]
    fn test_only_first_heading_of_tier_considered() {
        // An empty first <h1> does not promote the second one
        let html = "<body><h1></h1><h1>Later</h1><h2>Fallback</h2></body>";
        assert_eq!(title_of(html), "Fallback");
    }

    #[test]
    fn test_nested_markup_text() {
        let html = "<body><h1>Hello <em>nested</em> world</h1></body>";
        assert_eq!(title_of(html), "Hello nested world");
    }

    #[test]
    fn test_surrounding_whitespace_kept() {
        let html = "<head><title>\n  Spaced Out\n</title></head>";
        assert_eq!(title_of(html), "\n  Spaced Out\n");
        assert_eq!(title_of("<title> Padded </title>"), " Padded ");
        assert_eq!(title_of("<body><h2>\tTabbed</h2></body>"), "\tTabbed");
    }

    #[test]
    fn test_fallback() {
        assert_eq!(title_of(""), NO_TITLE);
        assert_eq!(title_of("<body><p>text only</p></body>"), NO_TITLE);
    }
}
