//! HTTP page fetcher
//!
//! Fetches HTML over HTTP/HTTPS with a single overall deadline covering
//! connect, first byte and body.

use crate::client::FetchOptions;
use crate::error::ExtractError;
use crate::fetchers::PageFetcher;
use crate::DEFAULT_USER_AGENT;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use tracing::{debug, warn};
use url::Url;

/// Binary content type prefixes
const BINARY_PREFIXES: &[&str] = &[
    "image/",
    "audio/",
    "video/",
    "application/octet-stream",
    "application/pdf",
    "application/zip",
    "application/gzip",
    "application/x-tar",
    "application/x-rar",
    "application/x-7z",
    "application/vnd.ms-",
    "application/vnd.openxmlformats",
    "font/",
];

/// Largest body handed to the parser; anything beyond is dropped
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Default HTTP fetcher backed by `reqwest`
pub struct HttpFetcher;

impl HttpFetcher {
    /// Create a new HTTP fetcher
    pub fn new() -> Self {
        Self
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self, url: &Url, options: &FetchOptions) -> Result<Bytes, ExtractError> {
        let timeout = options.effective_timeout();
        let deadline = tokio::time::Instant::now() + timeout;

        // Build headers
        let mut headers = HeaderMap::new();
        let user_agent = options.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html, application/xhtml+xml, */*;q=0.8"),
        );

        // Build client
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(ExtractError::ClientBuildError)?;

        // Send request
        let response = client
            .get(url.as_str())
            .send()
            .await
            .map_err(ExtractError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::HttpStatus(status.as_u16()));
        }

        // Check for binary content
        if let Some(ct) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if is_binary_content_type(ct) {
                return Err(ExtractError::ParseError(format!(
                    "unsupported content type: {}",
                    ct
                )));
            }
        }

        let body = read_body(response, deadline).await?;
        debug!(url = %url, size = body.len(), "Fetched page");
        Ok(body)
    }
}

/// Check if content type indicates binary content
fn is_binary_content_type(content_type: &str) -> bool {
    let ct_lower = content_type.to_lowercase();
    BINARY_PREFIXES
        .iter()
        .any(|prefix| ct_lower.starts_with(prefix))
}

/// Read the response body until completion, the size cap or the deadline
async fn read_body(
    response: reqwest::Response,
    deadline: tokio::time::Instant,
) -> Result<Bytes, ExtractError> {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();

    loop {
        tokio::select! {
            chunk = stream.next() => {
                match chunk {
                    Some(Ok(bytes)) => {
                        body.extend_from_slice(&bytes);
                        if body.len() >= MAX_BODY_BYTES {
                            warn!(limit = MAX_BODY_BYTES, "Body size limit reached, truncating");
                            body.truncate(MAX_BODY_BYTES);
                            return Ok(Bytes::from(body));
                        }
                    }
                    Some(Err(e)) => return Err(ExtractError::from_reqwest(e)),
                    None => return Ok(Bytes::from(body)),
                }
            }
            _ = tokio::time::sleep_until(deadline) => {
                warn!("Deadline reached while reading body");
                return Err(ExtractError::Timeout);
            }
        }
    }
}
