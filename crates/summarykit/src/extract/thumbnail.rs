//! Thumbnail resolver

use crate::document::{Document, Node};
use tracing::debug;

/// Returned when no tier produces an image URL
pub const NO_IMAGE: &str = "There is no image-related tags found in the given URL!";

/// Images inside a `<figure>`: the last match wins
const FIGURE_IMAGES: &str = "figure img";

/// Scopes searched for the image with the longest `alt` text, in order
const ALT_SCOPES: &[&str] = &["body article section img", "body div img", "img"];

/// Resolve the representative image URL of a page
///
/// Never fails; falls back to [`NO_IMAGE`].
pub fn resolve_thumbnail(doc: &Document) -> String {
    let figure = last_src(&doc.select(FIGURE_IMAGES));
    if !figure.is_empty() {
        debug!(tier = FIGURE_IMAGES, "Resolved thumbnail");
        return figure.to_string();
    }

    ALT_SCOPES
        .iter()
        .find_map(|&scope| {
            let src = longest_alt_src(&doc.select(scope));
            if src.is_empty() {
                return None;
            }
            debug!(tier = scope, "Resolved thumbnail");
            Some(src.to_string())
        })
        .unwrap_or_else(|| NO_IMAGE.to_string())
}

/// `src` of the last image, or empty when the last image has none
fn last_src<'a>(images: &[Node<'a>]) -> &'a str {
    images
        .iter()
        .fold("", |_, img| img.attr("src").unwrap_or_default())
}

/// `src` of the image with the strictly longest `alt` text
///
/// The first candidate seeds the accumulator and a later one replaces it
/// only when its `alt` is longer, so ties keep the earliest image. Length
/// is measured in UTF-8 bytes and a missing `alt` counts as empty.
fn longest_alt_src<'a>(images: &[Node<'a>]) -> &'a str {
    images
        .iter()
        .fold(None::<(usize, &'a str)>, |best, img| {
            let alt_len = img.attr("alt").unwrap_or_default().len();
            match best {
                Some((best_len, _)) if alt_len <= best_len => best,
                _ => Some((alt_len, img.attr("src").unwrap_or_default())),
            }
        })
        .map(|(_, src)| src)
        .unwrap_or_default()
}
