//! Entry points for SummaryKit
//!
//! These functions run a single extraction without a configured
//! [`ParserService`](crate::ParserService). Fetching is delegated to a
//! [`PageFetcher`](crate::fetchers::PageFetcher); the engine lives in
//! [`extract`](crate::extract).

use crate::error::ExtractError;
use crate::extract::extract_bytes;
use crate::fetchers::{HttpFetcher, PageFetcher};
use crate::types::{ExtractionResult, LocalSource};
use std::time::Duration;
use url::Url;

/// Deadline applied to a fetch when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetch options that can be configured via service builder
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Custom User-Agent
    pub user_agent: Option<String>,
    /// Overall fetch deadline (defaults to [`DEFAULT_TIMEOUT`])
    pub timeout: Option<Duration>,
    /// Allow list of URL prefixes
    pub allow_prefixes: Vec<String>,
    /// Block list of URL prefixes
    pub block_prefixes: Vec<String>,
}

impl FetchOptions {
    /// Get the effective deadline
    pub fn effective_timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }
}

/// Validate a URL against the fetch rules
///
/// The URL must be an absolute http(s) URI and pass the allow/block
/// prefix lists.
pub fn validate_url(url: &str, options: &FetchOptions) -> Result<Url, ExtractError> {
    if url.is_empty() {
        return Err(ExtractError::MissingUrl);
    }

    let parsed = Url::parse(url).map_err(|e| ExtractError::InvalidUrl(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ExtractError::InvalidUrl(format!(
            "unsupported scheme '{}', must be http or https",
            parsed.scheme()
        )));
    }

    if !options.allow_prefixes.is_empty() {
        let allowed = options
            .allow_prefixes
            .iter()
            .any(|prefix| url.starts_with(prefix));
        if !allowed {
            return Err(ExtractError::BlockedUrl);
        }
    }

    if options
        .block_prefixes
        .iter()
        .any(|prefix| url.starts_with(prefix))
    {
        return Err(ExtractError::BlockedUrl);
    }

    Ok(parsed)
}

/// Fetch a URL over HTTP and extract its summary
///
/// Uses default options. For custom options, use
/// [`extract_url_with_options`].
pub async fn extract_url(url: &str) -> Result<ExtractionResult, ExtractError> {
    extract_url_with_options(url, &HttpFetcher::new(), &FetchOptions::default()).await
}

/// Fetch a URL through `fetcher` and extract its summary
pub async fn extract_url_with_options(
    url: &str,
    fetcher: &dyn PageFetcher,
    options: &FetchOptions,
) -> Result<ExtractionResult, ExtractError> {
    let parsed = validate_url(url, options)?;
    tracing::debug!(fetcher = fetcher.name(), url = %parsed, "Using fetcher");
    let body = fetcher.fetch(&parsed, options).await?;
    extract_bytes(&body)
}

/// Extract the summary of local HTML, given as a file path or literal
/// markup (see [`LocalSource::detect`])
pub async fn extract_local(source: &str) -> Result<ExtractionResult, ExtractError> {
    let bytes = LocalSource::detect(source).read().await?;
    extract_bytes(&bytes)
}
