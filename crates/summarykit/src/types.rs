//! Core types for SummaryKit

use crate::error::ExtractError;
use crate::fetchers::MAX_BODY_BYTES;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncReadExt;

/// Request to extract a summary from a remote page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ParseRequest {
    /// The URL to fetch (required, absolute http:// or https:// URI)
    pub url: String,
}

impl ParseRequest {
    /// Create a new request with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Request to extract a summary from local HTML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParseTestRequest {
    /// Literal HTML markup, or the path of an HTML file
    ///
    /// Servers read files only when configured with a fixture directory;
    /// otherwise the value is always taken as markup.
    pub file_path: String,
}

impl ParseTestRequest {
    /// Create a new request from a path or literal HTML
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }
}

/// Summary extracted from one page
///
/// Every field always holds a value: when no candidate is found the
/// resolver's fallback literal is used instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExtractionResult {
    /// Page title
    pub title: String,

    /// Representative image URL
    #[serde(rename = "thumbnailUrl")]
    pub thumbnail: String,

    /// Main textual content
    pub content: String,
}

/// Where local HTML comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalSource {
    /// Literal markup
    Html(String),
    /// File to read
    Path(PathBuf),
}

impl LocalSource {
    /// Classify a path-or-markup string
    ///
    /// Empty input is treated as empty markup.
    pub fn detect(input: &str) -> Self {
        let trimmed = input.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('<') {
            LocalSource::Html(input.to_string())
        } else {
            LocalSource::Path(PathBuf::from(input.trim()))
        }
    }

    /// Classify input received by a server
    ///
    /// Without `fixture_dir` every input is literal markup and nothing is
    /// read from disk. With it, path-like input must be relative, free of
    /// `..`, and resolve (symlinks included) to a file inside the
    /// directory.
    pub async fn resolve(input: &str, fixture_dir: Option<&Path>) -> Result<Self, ExtractError> {
        let Some(root) = fixture_dir else {
            return Ok(LocalSource::Html(input.to_string()));
        };

        let path = match Self::detect(input) {
            LocalSource::Path(path) => path,
            html => return Ok(html),
        };

        let escapes = path.is_absolute()
            || path
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)));
        if escapes {
            return Err(ExtractError::ForbiddenPath(path.display().to_string()));
        }

        let root = tokio::fs::canonicalize(root)
            .await
            .map_err(ExtractError::LocalSource)?;
        let resolved = tokio::fs::canonicalize(root.join(&path))
            .await
            .map_err(ExtractError::LocalSource)?;
        if !resolved.starts_with(&root) {
            return Err(ExtractError::ForbiddenPath(path.display().to_string()));
        }
        Ok(LocalSource::Path(resolved))
    }

    /// Load the raw bytes of this source
    ///
    /// Files are read up to [`MAX_BODY_BYTES`]; the rest is dropped, as
    /// for fetched pages.
    pub async fn read(self) -> Result<Vec<u8>, ExtractError> {
        match self {
            LocalSource::Html(html) => Ok(html.into_bytes()),
            LocalSource::Path(path) => read_capped(&path)
                .await
                .map_err(ExtractError::LocalSource),
        }
    }
}

async fn read_capped(path: &Path) -> std::io::Result<Vec<u8>> {
    let file = tokio::fs::File::open(path).await?;
    let mut bytes = Vec::new();
    file.take(MAX_BODY_BYTES as u64)
        .read_to_end(&mut bytes)
        .await?;
    Ok(bytes)
}
