use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use hotsearch_core::{AppConfig, HotSearchItem, Platform};

use crate::collector::{FallbackCollector, PlatformCollector};
use crate::error::CollectorError;
use crate::feed::FeedClient;

/// Fans collection out over every registered platform collector.
///
/// One platform failing never fails the others: its error is logged and it
/// contributes nothing to the combined list.
#[derive(Clone, Default)]
pub struct CollectorAggregator {
    collectors: BTreeMap<Platform, Arc<dyn PlatformCollector>>,
}

impl std::fmt::Debug for CollectorAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectorAggregator")
            .field("platforms", &self.collectors.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CollectorAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds one [`FallbackCollector`] per platform with configured feeds.
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, CollectorError> {
        let client = FeedClient::new(
            config.collector_timeout_secs,
            &config.collector_user_agent,
            config.collector_max_retries,
            config.collector_backoff_base_secs,
            config.collector_max_items,
        )?;

        let mut aggregator = Self::new();
        for (platform, sources) in &config.feeds {
            aggregator.register(Arc::new(FallbackCollector::new(
                *platform,
                client.clone(),
                sources.clone(),
            )));
        }
        for platform in Platform::ALL {
            if !aggregator.collectors.contains_key(&platform) {
                tracing::warn!(%platform, "collector: no feed configured, platform will stay empty");
            }
        }
        Ok(aggregator)
    }

    /// Registers `collector`, replacing any existing one for its platform.
    pub fn register(&mut self, collector: Arc<dyn PlatformCollector>) {
        self.collectors.insert(collector.platform(), collector);
    }

    #[must_use]
    pub fn with_collector(mut self, collector: Arc<dyn PlatformCollector>) -> Self {
        self.register(collector);
        self
    }

    #[must_use]
    pub fn platforms(&self) -> Vec<Platform> {
        self.collectors.keys().copied().collect()
    }

    /// Collects every platform concurrently and concatenates the results in
    /// [`Platform::ALL`] order.
    pub async fn collect_all(&self, force_refresh: bool) -> Vec<HotSearchItem> {
        let started = Instant::now();
        let per_platform = futures::future::join_all(
            Platform::ALL
                .into_iter()
                .map(|platform| self.collect_by_platform(platform, force_refresh)),
        )
        .await;

        let items: Vec<HotSearchItem> = per_platform.into_iter().flatten().collect();
        tracing::info!(
            count = items.len(),
            force_refresh,
            duration_ms = started.elapsed().as_millis(),
            "collector: collected all platforms"
        );
        items
    }

    /// Collects a single platform. Errors and unregistered platforms yield an
    /// empty list.
    pub async fn collect_by_platform(
        &self,
        platform: Platform,
        force_refresh: bool,
    ) -> Vec<HotSearchItem> {
        let Some(collector) = self.collectors.get(&platform) else {
            tracing::debug!(%platform, "collector: platform not registered");
            return Vec::new();
        };

        match collector.fetch(force_refresh).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(%platform, error = %e, "collector: platform fetch failed");
                Vec::new()
            }
        }
    }
}
