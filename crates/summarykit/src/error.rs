//! Error types for SummaryKit

use thiserror::Error;

/// Errors that can occur while obtaining or parsing a page
///
/// Resolvers never fail: a page without any usable signal still produces
/// an [`ExtractionResult`](crate::ExtractionResult) made of fallback
/// literals. Only the steps in front of the engine (URL validation,
/// fetching, tree construction, local reads) return these.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// URL is missing
    #[error("Missing required parameter: url")]
    MissingUrl,

    /// URL is not an absolute http(s) URI
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// URL is blocked by prefix list
    #[error("Blocked URL: prefix not allowed")]
    BlockedUrl,

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Failed to connect to server
    #[error("Failed to connect to server")]
    ConnectError(#[source] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Request failed with HTTP status {0}")]
    HttpStatus(u16),

    /// Other request error
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Deadline exceeded while fetching
    #[error("Request timed out")]
    Timeout,

    /// Input could not be turned into a document tree
    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    /// Local HTML source could not be read
    #[error("Failed to read local source")]
    LocalSource(#[source] std::io::Error),

    /// Local path resolves outside the fixture directory
    #[error("Path not allowed: {0}")]
    ForbiddenPath(String),
}

impl ExtractError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExtractError::Timeout
        } else if err.is_connect() {
            ExtractError::ConnectError(err)
        } else {
            ExtractError::RequestError(err.to_string())
        }
    }

    /// Stable error code reported to RPC callers
    pub fn code(&self) -> i32 {
        match self {
            ExtractError::MissingUrl | ExtractError::InvalidUrl(_) | ExtractError::BlockedUrl => {
                -32001
            }
            ExtractError::ClientBuildError(_)
            | ExtractError::ConnectError(_)
            | ExtractError::HttpStatus(_)
            | ExtractError::RequestError(_) => -32002,
            ExtractError::Timeout => -32003,
            ExtractError::ParseError(_) => -32004,
            ExtractError::LocalSource(_) | ExtractError::ForbiddenPath(_) => -32005,
        }
    }

    /// Short machine-readable name of the error class
    pub fn kind(&self) -> &'static str {
        match self.code() {
            -32001 => "invalid_url",
            -32002 => "fetch",
            -32003 => "timeout",
            -32004 => "parse",
            _ => "local_source",
        }
    }

    /// Whether a caller may retry the same request later
    ///
    /// The engine itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExtractError::ConnectError(_)
                | ExtractError::HttpStatus(_)
                | ExtractError::RequestError(_)
                | ExtractError::Timeout
        )
    }
}
