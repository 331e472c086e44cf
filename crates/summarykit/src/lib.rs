//! SummaryKit - title, thumbnail and content extraction for web pages
//!
//! This crate recovers a human-readable summary of an arbitrary HTML page
//! without relying on page-specific metadata. A page is fetched (or read
//! locally), parsed into a [`Document`], and three resolvers each pick one
//! field of the [`ExtractionResult`] through a fixed cascade of
//! heuristics.
//!
//! ## Resolvers
//!
//! - [`resolve_title`] - `<title>`, then the first `<h1>`, `<h2>`, `<h3>`
//! - [`resolve_thumbnail`] - figure images, then the image with the
//!   longest `alt` text in progressively wider scopes
//! - [`resolve_content`] - known publisher containers, then paragraphs
//!   and lists under `<body>`
//!
//! When a resolver finds nothing it returns a fixed fallback literal
//! ([`NO_TITLE`], [`NO_IMAGE`], [`NO_CONTENT`]) rather than an error.
//!
//! ## Service
//!
//! [`ParserService`] exposes the engine as two operations: `Parse` for a
//! remote URL and `ParseTest` for literal HTML (or a file under a
//! configured fixture directory).

pub mod client;
mod document;
mod error;
pub mod extract;
pub mod fetchers;
mod service;
mod types;

pub use client::{extract_local, extract_url, extract_url_with_options, FetchOptions};
pub use document::{Document, Node};
pub use error::ExtractError;
pub use extract::{
    extract, extract_bytes, resolve_content, resolve_thumbnail, resolve_title, NO_CONTENT,
    NO_IMAGE, NO_TITLE,
};
pub use fetchers::{HttpFetcher, PageFetcher, MAX_BODY_BYTES};
pub use service::{ParserService, ParserServiceBuilder, METHOD_PARSE, METHOD_PARSE_TEST};
pub use types::{ExtractionResult, LocalSource, ParseRequest, ParseTestRequest};

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = concat!("SummaryKit/", env!("CARGO_PKG_VERSION"));

/// Service description for clients
pub const SERVICE_DESCRIPTION: &str =
    "Extracts the title, thumbnail image URL and main content of a web page.";

/// Extended documentation (llmtxt)
pub const SERVICE_LLMTXT: &str = r#"# SummaryKit

Extracts a human-readable summary from a web page: its title, a
representative thumbnail image URL and its main textual content.

## Operations
- `Parse`: fetch an absolute http(s) URL and extract from it
- `ParseTest`: extract from a local HTML file or literal HTML markup

## Input Parameters
- `url` (Parse, required): the page to fetch
- `filePath` (ParseTest, required): literal markup; a path relative to the
  fixture directory only when the server was started with one

## Output Fields
- `title`: page title
- `thumbnailUrl`: image URL as written in the page
- `content`: main text, space-joined

## Fallbacks
Fields never come back empty. When nothing is found they hold:
- title: "There is no title-related tags found in the given URL!"
- thumbnailUrl: "There is no image-related tags found in the given URL!"
- content: "Input is either empty webpage or its HTML is not parsable with current state of this code!"

These are successful responses, not errors.

## Error Handling
- Invalid or non-http(s) URLs fail without fetching (not retryable)
- Network failures and non-success statuses fail (retryable)
- Fetches exceeding the deadline (10 seconds by default) time out (retryable)
- Binary payloads fail to parse (not retryable)
"#;
