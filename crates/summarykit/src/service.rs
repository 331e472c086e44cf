//! Extraction service and its builder

use crate::client::{extract_url_with_options, FetchOptions};
use crate::error::ExtractError;
use crate::extract::extract_bytes;
use crate::fetchers::{HttpFetcher, PageFetcher};
use crate::types::{ExtractionResult, LocalSource, ParseRequest, ParseTestRequest};
use crate::SERVICE_DESCRIPTION;
use schemars::schema_for;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Name of the remote-page operation
pub const METHOD_PARSE: &str = "Parse";

/// Name of the local-source operation
pub const METHOD_PARSE_TEST: &str = "ParseTest";

/// Builder for configuring the extraction service
#[derive(Clone, Default)]
pub struct ParserServiceBuilder {
    /// Custom User-Agent
    user_agent: Option<String>,
    /// Fetch deadline
    timeout: Option<Duration>,
    /// Allow list of URL prefixes
    allow_prefixes: Vec<String>,
    /// Block list of URL prefixes
    block_prefixes: Vec<String>,
    /// Custom fetcher (HTTP when unset)
    fetcher: Option<Arc<dyn PageFetcher>>,
    /// Directory `ParseTest` may read files from
    fixture_dir: Option<PathBuf>,
}

impl ParserServiceBuilder {
    /// Create a new service builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set the fetch deadline
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add URL prefix to allow list
    pub fn allow_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.allow_prefixes.push(prefix.into());
        self
    }

    /// Add URL prefix to block list
    pub fn block_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.block_prefixes.push(prefix.into());
        self
    }

    /// Replace the HTTP fetcher
    pub fn fetcher(mut self, fetcher: impl PageFetcher + 'static) -> Self {
        self.fetcher = Some(Arc::new(fetcher));
        self
    }

    /// Let `ParseTest` read files under `dir`
    ///
    /// Without it, `ParseTest` input is always taken as literal markup.
    pub fn fixture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fixture_dir = Some(dir.into());
        self
    }

    /// Build the service
    pub fn build(self) -> ParserService {
        ParserService {
            options: FetchOptions {
                user_agent: self.user_agent,
                timeout: self.timeout,
                allow_prefixes: self.allow_prefixes,
                block_prefixes: self.block_prefixes,
            },
            fetcher: self.fetcher.unwrap_or_else(|| Arc::new(HttpFetcher::new())),
            fixture_dir: self.fixture_dir,
        }
    }
}

/// Configured extraction service
///
/// Holds only immutable configuration, so one instance can serve any
/// number of concurrent requests.
#[derive(Clone)]
pub struct ParserService {
    options: FetchOptions,
    fetcher: Arc<dyn PageFetcher>,
    fixture_dir: Option<PathBuf>,
}

impl Default for ParserService {
    fn default() -> Self {
        ParserServiceBuilder::new().build()
    }
}

impl std::fmt::Debug for ParserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserService")
            .field("options", &self.options)
            .field("fetcher", &self.fetcher.name())
            .field("fixture_dir", &self.fixture_dir)
            .finish()
    }
}

impl ParserService {
    /// Create a new service builder
    pub fn builder() -> ParserServiceBuilder {
        ParserServiceBuilder::new()
    }

    /// Get service description
    pub fn description(&self) -> &'static str {
        SERVICE_DESCRIPTION
    }

    /// Fetch options in effect
    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Describe the operations and their wire schemas as JSON
    pub fn describe(&self) -> serde_json::Value {
        let schema =
            |s: schemars::schema::RootSchema| serde_json::to_value(s).unwrap_or_default();
        json!({
            "description": SERVICE_DESCRIPTION,
            "methods": [
                {
                    "name": METHOD_PARSE,
                    "params": schema(schema_for!(ParseRequest)),
                    "result": schema(schema_for!(ExtractionResult)),
                },
                {
                    "name": METHOD_PARSE_TEST,
                    "params": schema(schema_for!(ParseTestRequest)),
                    "result": schema(schema_for!(ExtractionResult)),
                },
            ]
        })
    }

    /// Fetch the requested URL and extract its summary
    pub async fn parse(&self, req: ParseRequest) -> Result<ExtractionResult, ExtractError> {
        info!(url = %req.url, "Parse request");
        extract_url_with_options(&req.url, self.fetcher.as_ref(), &self.options).await
    }

    /// Extract the summary of literal HTML, or of a file under the
    /// fixture directory when one is configured
    pub async fn parse_test(
        &self,
        req: ParseTestRequest,
    ) -> Result<ExtractionResult, ExtractError> {
        let source = LocalSource::resolve(&req.file_path, self.fixture_dir.as_deref()).await?;
        match &source {
            LocalSource::Path(path) => info!(path = %path.display(), "ParseTest request"),
            LocalSource::Html(html) => info!(size = html.len(), "ParseTest request"),
        }
        let bytes = source.read().await?;
        extract_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{NO_CONTENT, NO_IMAGE, NO_TITLE};
    use async_trait::async_trait;
    use bytes::Bytes;
    use url::Url;

    struct FixedPage(&'static str);

    #[async_trait]
    impl PageFetcher for FixedPage {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn fetch(&self, _url: &Url, _options: &FetchOptions) -> Result<Bytes, ExtractError> {
            Ok(Bytes::from_static(self.0.as_bytes()))
        }
    }

    struct SlowNetwork;

    #[async_trait]
    impl PageFetcher for SlowNetwork {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn fetch(&self, _url: &Url, _options: &FetchOptions) -> Result<Bytes, ExtractError> {
            Err(ExtractError::Timeout)
        }
    }

    #[test]
    fn test_service_builder() {
        let service = ParserService::builder()
            .user_agent("TestAgent/1.0")
            .timeout(Duration::from_secs(3))
            .allow_prefix("https://allowed.com")
            .block_prefix("https://blocked.com")
            .build();

        let options = service.options();
        assert_eq!(options.user_agent, Some("TestAgent/1.0".to_string()));
        assert_eq!(options.effective_timeout(), Duration::from_secs(3));
        assert_eq!(options.allow_prefixes, vec!["https://allowed.com"]);
        assert_eq!(options.block_prefixes, vec!["https://blocked.com"]);
        assert!(format!("{:?}", service).contains("http"));
    }

    #[test]
    fn test_describe() {
        let service = ParserService::default();
        let described = service.describe();
        assert!(!service.description().is_empty());
        assert_eq!(described["methods"][0]["name"], "Parse");
        assert!(described["methods"][0]["params"]["properties"]["url"].is_object());
        assert_eq!(described["methods"][1]["name"], "ParseTest");
        assert!(described["methods"][1]["params"]["properties"]["filePath"].is_object());
        assert!(described["methods"][1]["result"]["properties"]["thumbnailUrl"].is_object());
    }

    #[tokio::test]
    async fn test_parse_with_custom_fetcher() {
        let service = ParserService::builder()
            .fetcher(FixedPage(
                "<body><h2>Fixed</h2><figure><img src=\"f.png\"></figure><p>Body</p></body>",
            ))
            .build();

        let result = service
            .parse(ParseRequest::new("https://example.com/article"))
            .await
            .unwrap();
        assert_eq!(result.title, "Fixed");
        assert_eq!(result.thumbnail, "f.png");
        assert_eq!(result.content, "Body");
    }

    #[tokio::test]
    async fn test_parse_validates_before_fetching() {
        let service = ParserService::builder().fetcher(FixedPage("")).build();
        let result = service.parse(ParseRequest::new("not a url")).await;
        assert!(matches!(result, Err(ExtractError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_parse_blocked_prefix() {
        let service = ParserService::builder()
            .fetcher(FixedPage("<title>x</title>"))
            .block_prefix("https://blocked.com")
            .build();
        let result = service
            .parse(ParseRequest::new("https://blocked.com/page"))
            .await;
        assert!(matches!(result, Err(ExtractError::BlockedUrl)));
    }

    #[tokio::test]
    async fn test_parse_timeout_propagates() {
        let service = ParserService::builder().fetcher(SlowNetwork).build();
        let err = service
            .parse(ParseRequest::new("https://example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Timeout));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_parse_test_literal_html() {
        let service = ParserService::default();
        let result = service
            .parse_test(ParseTestRequest::new(""))
            .await
            .unwrap();
        assert_eq!(result.title, NO_TITLE);
        assert_eq!(result.thumbnail, NO_IMAGE);
        assert_eq!(result.content, NO_CONTENT);
    }

    #[tokio::test]
    async fn test_parse_test_never_reads_files_by_default() {
        let service = ParserService::default();
        for input in ["/dev/zero", "/etc/hostname"] {
            let result = service
                .parse_test(ParseTestRequest::new(input))
                .await
                .unwrap();
            assert_eq!(result.title, NO_TITLE);
            assert_eq!(result.thumbnail, NO_IMAGE);
            assert_eq!(result.content, NO_CONTENT);
        }
    }

    #[tokio::test]
    async fn test_parse_test_fixture_dir() {
        let dir = std::env::temp_dir().join(format!("summarykit-svc-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("page.html"), "<title>On disk</title>").unwrap();

        let service = ParserService::builder().fixture_dir(dir.clone()).build();
        let result = service
            .parse_test(ParseTestRequest::new("page.html"))
            .await
            .unwrap();
        assert_eq!(result.title, "On disk");

        let err = service
            .parse_test(ParseTestRequest::new("/etc/hostname"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::ForbiddenPath(_)));
        assert_eq!(err.code(), -32005);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_parse_test_is_idempotent() {
        let service = ParserService::default();
        let html = "<body><h1>Same</h1><div><img src=\"a\" alt=\"x\"></div><p>text</p></body>";
        let first = service.parse_test(ParseTestRequest::new(html)).await.unwrap();
        let second = service.parse_test(ParseTestRequest::new(html)).await.unwrap();
        assert_eq!(first, second);
    }
}
