//! Where a history document comes from.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::HistoryError;

/// A location-history export on disk or behind an HTTP(S) URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistorySource {
    File(PathBuf),
    Url(String),
}

impl HistorySource {
    /// Interpret a configured source string; `http://` and `https://` select a URL.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }
}

impl std::fmt::Display for HistorySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistorySource::File(path) => write!(f, "{}", path.display()),
            HistorySource::Url(url) => f.write_str(url),
        }
    }
}

/// Read and decode a history document from disk.
///
/// # Errors
///
/// - [`HistoryError::Io`] if the file cannot be read.
/// - [`HistoryError::Deserialize`] if the contents are not valid JSON.
pub async fn read_document(path: &Path) -> Result<Value, HistoryError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| HistoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_slice(&bytes).map_err(|source| HistoryError::Deserialize {
        context: path.display().to_string(),
        source,
    })
}
