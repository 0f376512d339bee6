//! Retry with exponential back-off and jitter for feed requests.
//!
//! Only transient failures are retried. A source that answers with a client
//! error or a body that does not parse fails over to the next source in the
//! chain instead.

use std::future::Future;
use std::time::Duration;

use crate::error::CollectorError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// Retriable: timeouts, connection failures, HTTP 429 and 5xx responses.
pub(crate) fn is_retriable(err: &CollectorError) -> bool {
    match err {
        CollectorError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        CollectorError::RateLimited { .. } => true,
        CollectorError::UnexpectedStatus { status, .. } => *status >= 500,
        CollectorError::Deserialize { .. }
        | CollectorError::NoSources { .. }
        | CollectorError::SourcesExhausted { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// | Attempt | Sleep before next attempt         |
/// |---------|-----------------------------------|
/// | 1       | base × 2⁰ ± 25 % jitter           |
/// | 2       | base × 2¹ ± 25 % jitter           |
///
/// Delay is capped at 30 s. Non-retriable errors are returned immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, CollectorError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CollectorError>>,
{
    const MAX_DELAY_MS: u64 = 30_000;
    let backoff_base_ms = backoff_base_secs.saturating_mul(1_000);
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "feed source transient error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
