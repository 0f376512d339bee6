//! Decides which data a read gets: cached, stored, live, or nothing.
//!
//! Reads are freshness-first. The write path used by warmups and explicit
//! refreshes is availability-first: a platform's old state is evicted only
//! after a live fetch has produced something to replace it.
//!
//! The resolver does not serialise two refreshes of the same platform; the
//! scheduler only keeps its own warmups from overlapping. A refresh that
//! snapshots, then fetches nothing, re-caches its snapshot and can overwrite
//! a newer snapshot a concurrent refresh wrote in between.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use hotsearch_cache::CacheTier;
use hotsearch_classifier::Classifier;
use hotsearch_collector::CollectorAggregator;
use hotsearch_core::{HotSearchItem, Platform};

use crate::store::ItemStore;

/// Where a resolved list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Cache,
    Store,
    Live,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub items: Vec<HotSearchItem>,
    pub tier: Tier,
}

impl Resolved {
    fn new(items: Vec<HotSearchItem>, tier: Tier) -> Self {
        Self { items, tier }
    }

    fn empty() -> Self {
        Self::new(Vec::new(), Tier::Empty)
    }
}

/// Result of a write-path refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub items: Vec<HotSearchItem>,
    /// `true` when a live fetch replaced the platform's data; `false` when the
    /// previous snapshot was kept.
    pub fresh: bool,
}

pub struct FreshnessResolver {
    cache: CacheTier,
    store: Arc<dyn ItemStore>,
    collectors: Arc<CollectorAggregator>,
    classifier: Arc<Classifier>,
    freshness_window: Duration,
}

impl std::fmt::Debug for FreshnessResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FreshnessResolver")
            .field("cache", &self.cache)
            .field("collectors", &self.collectors)
            .field("freshness_window", &self.freshness_window)
            .finish_non_exhaustive()
    }
}

impl FreshnessResolver {
    #[must_use]
    pub fn new(
        cache: CacheTier,
        store: Arc<dyn ItemStore>,
        collectors: Arc<CollectorAggregator>,
        classifier: Arc<Classifier>,
        freshness_window: Duration,
    ) -> Self {
        Self {
            cache,
            store,
            collectors,
            classifier,
            freshness_window,
        }
    }

    #[must_use]
    pub fn cache(&self) -> &CacheTier {
        &self.cache
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn ItemStore> {
        &self.store
    }

    #[must_use]
    pub fn classifier(&self) -> &Arc<Classifier> {
        &self.classifier
    }

    /// Aggregate lookup: cache, then rows inside the freshness window (which
    /// are written back to the cache), then a live collection. Live results
    /// are returned without being cached.
    pub async fn resolve_all(&self, now: DateTime<Utc>) -> Resolved {
        match self.cache.get_all().await {
            Ok(Some(items)) if !items.is_empty() => {
                tracing::debug!(count = items.len(), "resolver: aggregate served from cache");
                return Resolved::new(items, Tier::Cache);
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "resolver: aggregate cache read failed"),
        }

        match self.store.list_captured_after(now - self.freshness_window).await {
            Ok(items) if !items.is_empty() => {
                if let Err(e) = self.cache.cache_all(&items).await {
                    tracing::warn!(error = %e, "resolver: failed to cache stored items");
                }
                tracing::info!(count = items.len(), "resolver: aggregate served from store");
                return Resolved::new(items, Tier::Store);
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "resolver: store read failed"),
        }

        let live = self.collectors.collect_all(false).await;
        if live.is_empty() {
            tracing::warn!("resolver: no aggregate data in any tier");
            return Resolved::empty();
        }
        tracing::info!(count = live.len(), "resolver: aggregate served live");
        Resolved::new(live, Tier::Live)
    }

    /// [`resolve_all`](Self::resolve_all), then classify, persist and cache a
    /// live result.
    pub async fn read_all(&self) -> Vec<HotSearchItem> {
        let resolved = self.resolve_all(Utc::now()).await;
        match resolved.tier {
            Tier::Live => self.persist_all(resolved.items).await,
            _ => resolved.items,
        }
    }

    /// Single-platform lookup: cache, then a live collection. The durable
    /// store is not consulted.
    pub async fn resolve_platform(&self, platform: Platform) -> Resolved {
        match self.cache.get_platform(platform).await {
            Ok(Some(items)) if !items.is_empty() => {
                tracing::debug!(%platform, count = items.len(), "resolver: platform served from cache");
                return Resolved::new(items, Tier::Cache);
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(%platform, error = %e, "resolver: platform cache read failed"),
        }

        let live = self.collectors.collect_by_platform(platform, false).await;
        if live.is_empty() {
            tracing::warn!(%platform, "resolver: no platform data available");
            return Resolved::empty();
        }
        tracing::info!(%platform, count = live.len(), "resolver: platform served live");
        Resolved::new(live, Tier::Live)
    }

    /// [`resolve_platform`](Self::resolve_platform), then replace the
    /// platform's stored and cached snapshot with a live result.
    pub async fn read_platform(&self, platform: Platform) -> Vec<HotSearchItem> {
        let resolved = self.resolve_platform(platform).await;
        match resolved.tier {
            Tier::Live => self.replace_platform(platform, resolved.items).await,
            _ => resolved.items,
        }
    }

    /// Write path for one platform.
    ///
    /// The current snapshot is taken before anything is touched. An empty
    /// live fetch re-caches that snapshot and returns it, leaving the store
    /// alone. A non-empty fetch replaces the snapshot everywhere.
    pub async fn refresh_platform(&self, platform: Platform) -> RefreshOutcome {
        let old = self.snapshot_platform(platform).await;

        let live = self.collectors.collect_by_platform(platform, true).await;
        if live.is_empty() {
            if !old.is_empty() {
                if let Err(e) = self.cache.cache_platform(platform, &old).await {
                    tracing::warn!(%platform, error = %e, "resolver: failed to re-cache previous snapshot");
                }
            }
            tracing::warn!(
                %platform,
                count = old.len(),
                "resolver: live refresh returned nothing, keeping previous snapshot"
            );
            return RefreshOutcome {
                items: old,
                fresh: false,
            };
        }

        let items = self.replace_platform(platform, live).await;
        RefreshOutcome { items, fresh: true }
    }

    /// Forced collection of every platform, classified, persisted and cached
    /// under the aggregate key. An empty collection changes nothing.
    pub async fn refresh_all(&self) -> Vec<HotSearchItem> {
        let live = self.collectors.collect_all(true).await;
        if live.is_empty() {
            tracing::warn!("resolver: forced refresh returned nothing");
            return live;
        }
        self.persist_all(live).await
    }

    async fn snapshot_platform(&self, platform: Platform) -> Vec<HotSearchItem> {
        match self.cache.get_platform(platform).await {
            Ok(Some(items)) if !items.is_empty() => return items,
            Ok(_) => {}
            Err(e) => tracing::warn!(%platform, error = %e, "resolver: snapshot cache read failed"),
        }

        match self.store.list_by_platform(platform).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(%platform, error = %e, "resolver: snapshot store read failed");
                Vec::new()
            }
        }
    }

    async fn persist_all(&self, items: Vec<HotSearchItem>) -> Vec<HotSearchItem> {
        let items = self.save(self.classifier.classify_items(items)).await;
        if let Err(e) = self.cache.cache_all(&items).await {
            tracing::warn!(error = %e, "resolver: failed to cache aggregate");
        }
        items
    }

    async fn replace_platform(
        &self,
        platform: Platform,
        fresh: Vec<HotSearchItem>,
    ) -> Vec<HotSearchItem> {
        if let Err(e) = self.cache.clear_platform(platform).await {
            tracing::warn!(%platform, error = %e, "resolver: failed to clear platform cache");
        }
        match self.store.delete_by_platform(platform).await {
            Ok(deleted) => tracing::debug!(%platform, count = deleted, "resolver: removed previous rows"),
            Err(e) => tracing::warn!(%platform, error = %e, "resolver: failed to remove previous rows"),
        }

        let items = self.save(self.classifier.classify_items(fresh)).await;
        if let Err(e) = self.cache.cache_platform(platform, &items).await {
            tracing::warn!(%platform, error = %e, "resolver: failed to cache platform");
        }
        tracing::info!(%platform, count = items.len(), "resolver: platform snapshot replaced");
        items
    }

    /// Persists `items`; on failure the unsaved items are returned as-is.
    async fn save(&self, items: Vec<HotSearchItem>) -> Vec<HotSearchItem> {
        let count = items.len();
        let fallback = items.clone();
        match self.store.save(items).await {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!(count, error = %e, "resolver: failed to persist items");
                fallback
            }
        }
    }
}
