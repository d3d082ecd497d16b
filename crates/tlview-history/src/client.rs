//! HTTP client for fetching history exports.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tlview_core::{AppConfig, LocationRecord};

use crate::error::HistoryError;
use crate::loader::load_history;
use crate::rate_limit::retry_with_backoff;
use crate::source::{read_document, HistorySource};

/// Fetches history documents from files or URLs and normalizes them.
///
/// Non-2xx responses are typed errors; network failures and 5xx/429
/// responses are retried with exponential backoff up to `max_retries`
/// additional attempts.
pub struct HistoryClient {
    client: Client,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl HistoryClient {
    /// # Errors
    ///
    /// Returns [`HistoryError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, HistoryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// # Errors
    ///
    /// See [`HistoryClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, HistoryError> {
        Self::new(
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_secs,
        )
    }

    /// GET `url` and decode the body as JSON.
    ///
    /// # Errors
    ///
    /// - [`HistoryError::NotFound`] on 404 (not retried).
    /// - [`HistoryError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`HistoryError::Http`] on network failure after retries.
    /// - [`HistoryError::Deserialize`] if the body is not valid JSON.
    pub async fn fetch_document(&self, url: &str) -> Result<Value, HistoryError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async move {
            let response = self
                .client
                .get(url)
                .header(reqwest::header::ACCEPT, "application/json")
                .send()
                .await?;
            let status = response.status();

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(HistoryError::NotFound {
                    url: url.to_owned(),
                });
            }
            if !status.is_success() {
                return Err(HistoryError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_owned(),
                });
            }

            let bytes = response.bytes().await?;
            serde_json::from_slice(&bytes).map_err(|source| HistoryError::Deserialize {
                context: url.to_owned(),
                source,
            })
        })
        .await
    }

    /// Fetch or read `source` and normalize it into records.
    ///
    /// # Errors
    ///
    /// Propagates fetch, read and decode failures; segment-level problems are
    /// never errors.
    pub async fn load(&self, source: &HistorySource) -> Result<Vec<LocationRecord>, HistoryError> {
        tracing::info!(%source, "loading location history");
        let document = match source {
            HistorySource::File(path) => read_document(path).await?,
            HistorySource::Url(url) => self.fetch_document(url).await?,
        };
        let records = load_history(&document);
        tracing::info!(%source, count = records.len(), "location history loaded");
        Ok(records)
    }
}
