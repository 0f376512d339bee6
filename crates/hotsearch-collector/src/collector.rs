use std::time::Instant;

use async_trait::async_trait;
use hotsearch_core::{HotSearchItem, Platform};

use crate::error::CollectorError;
use crate::feed::FeedClient;

/// Fetches one platform's ranked hot-search list.
///
/// An empty `Ok` and an `Err` are equivalent failure signals to callers; the
/// distinction only matters for logging.
#[async_trait]
pub trait PlatformCollector: Send + Sync {
    fn platform(&self) -> Platform;

    async fn fetch(&self, force_refresh: bool) -> Result<Vec<HotSearchItem>, CollectorError>;
}

/// A platform collector backed by an ordered chain of JSON feed sources.
///
/// The first source is the primary; the rest are backups tried in order. The
/// first source returning a non-empty list wins and every item is tagged with
/// the source label (`primary`, `backup-1`, ...).
#[derive(Debug, Clone)]
pub struct FallbackCollector {
    platform: Platform,
    client: FeedClient,
    sources: Vec<String>,
}

impl FallbackCollector {
    #[must_use]
    pub fn new(platform: Platform, client: FeedClient, sources: Vec<String>) -> Self {
        Self {
            platform,
            client,
            sources,
        }
    }

    fn source_label(index: usize) -> String {
        if index == 0 {
            "primary".to_string()
        } else {
            format!("backup-{index}")
        }
    }
}

#[async_trait]
impl PlatformCollector for FallbackCollector {
    fn platform(&self) -> Platform {
        self.platform
    }

    /// Walks the source chain.
    ///
    /// Returns `Ok(vec![])` when every source answered with an empty list and
    /// [`CollectorError::SourcesExhausted`] when none produced data and at
    /// least one failed.
    async fn fetch(&self, force_refresh: bool) -> Result<Vec<HotSearchItem>, CollectorError> {
        if self.sources.is_empty() {
            return Err(CollectorError::NoSources {
                platform: self.platform,
            });
        }

        let mut last_error: Option<CollectorError> = None;
        for (index, url) in self.sources.iter().enumerate() {
            let label = Self::source_label(index);
            let started = Instant::now();
            match self.client.fetch_feed(url, self.platform, force_refresh).await {
                Ok(items) if !items.is_empty() => {
                    tracing::info!(
                        platform = %self.platform,
                        source = %label,
                        count = items.len(),
                        duration_ms = started.elapsed().as_millis(),
                        "collector: source returned items"
                    );
                    return Ok(items
                        .into_iter()
                        .map(|mut item| {
                            item.actual_source = Some(label.clone());
                            item
                        })
                        .collect());
                }
                Ok(_) => {
                    tracing::warn!(
                        platform = %self.platform,
                        source = %label,
                        "collector: source returned no items, trying next"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        platform = %self.platform,
                        source = %label,
                        error = %e,
                        "collector: source failed, trying next"
                    );
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(CollectorError::SourcesExhausted {
                platform: self.platform,
                last_error: e.to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }
}
