//! Retry with exponential backoff for history fetches.
//!
//! Network failures and server-side statuses (5xx, 429) are retried; missing
//! documents, client errors and malformed JSON are returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::HistoryError;

fn is_retriable(err: &HistoryError) -> bool {
    match err {
        HistoryError::Http(_) => true,
        HistoryError::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
        HistoryError::NotFound { .. }
        | HistoryError::Deserialize { .. }
        | HistoryError::Io { .. } => false,
    }
}

/// Executes `operation`, retrying transient errors up to `max_retries` extra
/// times and sleeping `backoff_base_secs * 2^attempt` seconds between tries.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, HistoryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, HistoryError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient history fetch error; retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
