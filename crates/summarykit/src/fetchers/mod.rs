//! Page fetchers
//!
//! Design: the extraction engine never talks to the network. A
//! [`PageFetcher`] turns a validated URL into raw HTML bytes, and the
//! service hands those bytes to the document adapter.

mod http;

pub use http::{HttpFetcher, MAX_BODY_BYTES};

use crate::client::FetchOptions;
use crate::error::ExtractError;
use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

/// Source of raw page bytes for a URL
///
/// Implementations own transport concerns only: timeouts, status
/// handling and body limits. They must not interpret the markup.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Unique identifier for this fetcher (for logging/debugging)
    fn name(&self) -> &'static str;

    /// Fetch the body of `url`
    ///
    /// Returns [`ExtractError::Timeout`] when the deadline in `options`
    /// expires, and a fetch-class error for transport failures or
    /// non-success statuses.
    async fn fetch(&self, url: &Url, options: &FetchOptions) -> Result<Bytes, ExtractError>;
}
