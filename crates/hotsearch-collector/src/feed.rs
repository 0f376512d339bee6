use std::time::Duration;

use chrono::Utc;
use hotsearch_core::{HotSearchItem, Platform};
use reqwest::header::{HeaderValue, CACHE_CONTROL, PRAGMA};
use reqwest::Client;

use crate::error::CollectorError;
use crate::parse::{entries_to_items, FeedPayload};
use crate::retry::retry_with_backoff;

/// HTTP client for JSON hot-search feeds.
///
/// Shared by every source of every platform. Transient errors (timeouts,
/// connection failures, 429, 5xx) are retried with jittered exponential
/// back-off up to `max_retries` additional attempts.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
    max_retries: u32,
    backoff_base_secs: u64,
    max_items: usize,
}

impl FeedClient {
    /// # Errors
    ///
    /// Returns [`CollectorError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
        max_items: usize,
    ) -> Result<Self, CollectorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
            max_items,
        })
    }

    /// Fetches one feed and decodes it into ranked items for `platform`.
    ///
    /// With `force_refresh` the request asks intermediaries not to serve a
    /// cached copy.
    ///
    /// # Errors
    ///
    /// - [`CollectorError::RateLimited`]: HTTP 429 after all retries.
    /// - [`CollectorError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`CollectorError::Http`]: network or TLS failure after all retries.
    /// - [`CollectorError::Deserialize`]: body is not a recognised feed shape.
    pub async fn fetch_feed(
        &self,
        url: &str,
        platform: Platform,
        force_refresh: bool,
    ) -> Result<Vec<HotSearchItem>, CollectorError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async move {
            let mut request = self.client.get(url);
            if force_refresh {
                request = request
                    .header(CACHE_CONTROL, HeaderValue::from_static("no-cache"))
                    .header(PRAGMA, HeaderValue::from_static("no-cache"));
            }
            let response = request.send().await?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);
                return Err(CollectorError::RateLimited {
                    url: url.to_owned(),
                    retry_after_secs,
                });
            }

            if !status.is_success() {
                return Err(CollectorError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_owned(),
                });
            }

            let body = response.text().await?;
            let payload = serde_json::from_str::<FeedPayload>(&body).map_err(|e| {
                CollectorError::Deserialize {
                    context: format!("{platform} feed from {url}"),
                    source: e,
                }
            })?;

            Ok(entries_to_items(
                payload.into_entries(),
                platform,
                self.max_items,
                Utc::now(),
            ))
        })
        .await
    }
}
