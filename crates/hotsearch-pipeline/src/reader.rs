//! The read surface external callers use: resolution plus list cleanup, with
//! a background classification pass after every read.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use hotsearch_cache::CacheTier;
use hotsearch_classifier::Classifier;
use hotsearch_core::{Category, HotSearchItem, Platform};

use crate::dedup::deduplicate_by_title;
use crate::filter::{filter_by_category, filter_degraded, repair_items, sort_by_rank};
use crate::gate::ClassificationGate;
use crate::pool::{BackgroundPool, Submission};
use crate::resolver::FreshnessResolver;
use crate::search::search_by_keyword;
use crate::stats::{ClassificationStats, LastUpdate};
use crate::store::ItemStore;

/// One classification pass over items still waiting for a topic.
#[derive(Clone)]
pub struct ClassificationJob {
    gate: ClassificationGate,
    classifier: Arc<Classifier>,
    store: Arc<dyn ItemStore>,
    cache: CacheTier,
    debounce: StdDuration,
}

impl std::fmt::Debug for ClassificationJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassificationJob")
            .field("gate", &self.gate)
            .field("debounce", &self.debounce)
            .finish_non_exhaustive()
    }
}

impl ClassificationJob {
    #[must_use]
    pub fn new(
        gate: ClassificationGate,
        classifier: Arc<Classifier>,
        store: Arc<dyn ItemStore>,
        cache: CacheTier,
        debounce: StdDuration,
    ) -> Self {
        Self {
            gate,
            classifier,
            store,
            cache,
            debounce,
        }
    }

    /// Classifies the `pending`, `other` and `evaluating` items in `items`,
    /// writes the results back and clears the cache so the next read sees
    /// them. Rows replaced by a newer snapshot in the meantime stay gone.
    ///
    /// Returns `None` when another pass holds the gate, otherwise the number
    /// of items classified.
    pub async fn run(&self, items: Vec<HotSearchItem>) -> Option<usize> {
        let Some(_guard) = self.gate.try_acquire() else {
            tracing::debug!("classification: pass already running, skipping");
            return None;
        };

        let mut candidates: Vec<HotSearchItem> = items
            .into_iter()
            .filter(|item| {
                matches!(
                    item.category,
                    Some(Category::Pending | Category::Other | Category::Evaluating)
                )
            })
            .collect();
        if candidates.is_empty() {
            return Some(0);
        }

        tokio::time::sleep(self.debounce).await;

        // An `evaluating` item belongs to a pass that never finished.
        for item in &mut candidates {
            if item.category == Some(Category::Evaluating) {
                item.category = Some(Category::Pending);
            }
        }

        let started = std::time::Instant::now();
        let count = candidates.len();
        let classified = self.classifier.classify_items(candidates);

        let written = match self.store.update_classified(classified).await {
            Ok(written) => written.len(),
            Err(e) => {
                tracing::warn!(count, error = %e, "classification: failed to persist results");
                return Some(0);
            }
        };
        if written < count {
            tracing::debug!(
                skipped = count - written,
                "classification: rows superseded by a newer snapshot"
            );
        }
        if let Err(e) = self.cache.clear_all().await {
            tracing::warn!(error = %e, "classification: failed to clear cache");
        }

        tracing::info!(
            count,
            duration_ms = started.elapsed().as_millis(),
            "classification: pass completed"
        );
        Some(count)
    }
}

/// Query entry point shared by the HTTP surface and the CLI.
#[derive(Debug, Clone)]
pub struct HotSearchReader {
    resolver: Arc<FreshnessResolver>,
    job: ClassificationJob,
    pool: BackgroundPool,
    stale_after: Duration,
}

impl HotSearchReader {
    #[must_use]
    pub fn new(
        resolver: Arc<FreshnessResolver>,
        gate: ClassificationGate,
        pool: BackgroundPool,
        stale_after: Duration,
        classify_debounce: StdDuration,
    ) -> Self {
        let job = ClassificationJob::new(
            gate,
            Arc::clone(resolver.classifier()),
            Arc::clone(resolver.store()),
            resolver.cache().clone(),
            classify_debounce,
        );
        Self {
            resolver,
            job,
            pool,
            stale_after,
        }
    }

    #[must_use]
    pub fn resolver(&self) -> &Arc<FreshnessResolver> {
        &self.resolver
    }

    #[must_use]
    pub fn classification_job(&self) -> &ClassificationJob {
        &self.job
    }

    /// Resolves, cleans up and filters a list for a reader, then hands a copy
    /// to a background classification pass.
    pub async fn query(
        &self,
        platform: Option<Platform>,
        category: Option<Category>,
    ) -> Vec<HotSearchItem> {
        let items = match platform {
            Some(platform) => self.resolver.read_platform(platform).await,
            None => self.resolver.read_all().await,
        };

        let items = filter_degraded(items, Utc::now(), self.stale_after);
        let items = deduplicate_by_title(repair_items(items));
        let items = sort_by_rank(filter_by_category(items, category));

        self.classify_in_background(items.clone()).await;
        items
    }

    /// Forced refresh of every platform, returned cleaned up and sorted.
    pub async fn refresh_all(&self) -> Vec<HotSearchItem> {
        let items = self.resolver.refresh_all().await;
        let items = sort_by_rank(repair_items(filter_degraded(
            items,
            Utc::now(),
            self.stale_after,
        )));

        self.classify_in_background(items.clone()).await;
        items
    }

    pub async fn search(&self, keyword: &str) -> Vec<HotSearchItem> {
        let items = self.query(None, None).await;
        search_by_keyword(&items, keyword, Utc::now())
    }

    /// Statistics over every stored row. A store failure reports an empty set.
    pub async fn classification_stats(&self) -> ClassificationStats {
        let items = match self.resolver.store().list_all().await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = %e, "reader: failed to load items for stats");
                Vec::new()
            }
        };
        ClassificationStats::from_items(&items, self.job.gate.is_running())
    }

    pub async fn last_update(&self) -> LastUpdate {
        let store = self.resolver.store();
        let overall = store.latest_captured_at().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "reader: failed to load last update");
            None
        });
        let per_platform = store
            .latest_captured_at_by_platform()
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "reader: failed to load per-platform updates");
                std::collections::BTreeMap::new()
            });
        LastUpdate::new(overall, &per_platform, Utc::now())
    }

    async fn classify_in_background(&self, items: Vec<HotSearchItem>) {
        if items.is_empty() {
            return;
        }
        let job = self.job.clone();
        let submission = self
            .pool
            .submit(async move {
                job.run(items).await;
            })
            .await;
        if submission == Submission::RanInline {
            tracing::debug!("reader: classification ran on the request path");
        }
    }
}
