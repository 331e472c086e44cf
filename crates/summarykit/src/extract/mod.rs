//! Extraction engine
//!
//! Three independent resolvers each read the same [`Document`] and own one
//! field of the [`ExtractionResult`]. Each runs a fixed, ordered cascade of
//! heuristics and ends in a fallback literal, so extraction itself never
//! fails.

mod content;
mod thumbnail;
mod title;

pub use content::{resolve_content, NO_CONTENT};
pub use thumbnail::{resolve_thumbnail, NO_IMAGE};
pub use title::{resolve_title, NO_TITLE};

use crate::document::Document;
use crate::error::ExtractError;
use crate::types::ExtractionResult;

/// Run all three resolvers against a parsed document
pub fn extract(doc: &Document) -> ExtractionResult {
    ExtractionResult {
        title: resolve_title(doc),
        thumbnail: resolve_thumbnail(doc),
        content: resolve_content(doc),
    }
}

/// Parse raw HTML bytes and extract from them
///
/// Parse failures are propagated as-is; no partial extraction is
/// attempted.
pub fn extract_bytes(bytes: &[u8]) -> Result<ExtractionResult, ExtractError> {
    let doc = Document::parse(bytes)?;
    Ok(extract(&doc))
}
