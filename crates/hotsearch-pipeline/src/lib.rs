//! Freshness pipeline: tiered resolution of hot-search lists, list cleanup,
//! background classification, and platform health.

pub mod dedup;
pub mod filter;
pub mod gate;
pub mod health;
pub mod maintenance;
pub mod pool;
pub mod reader;
pub mod resolver;
pub mod search;
pub mod stats;
pub mod store;

use std::time::Duration as StdDuration;

use chrono::Duration;
use hotsearch_core::AppConfig;

pub use dedup::{deduplicate_by_platform, deduplicate_by_title, deduplicate_by_title_and_url};
pub use filter::{filter_by_category, filter_degraded, repair_items, sort_by_rank};
pub use gate::{ClassificationGate, GateGuard};
pub use health::{HealthMonitor, HealthStatus, PlatformHealth, RefreshLog, RefreshRecord};
pub use maintenance::{cleanup_expired, reset_storage};
pub use pool::{BackgroundPool, Submission};
pub use reader::{ClassificationJob, HotSearchReader};
pub use resolver::{FreshnessResolver, RefreshOutcome, Resolved, Tier};
pub use search::{search_by_keyword, MAX_SEARCH_RESULTS};
pub use stats::{ClassificationStats, LastUpdate};
pub use store::{ItemStore, MemoryItemStore, PgItemStore};

/// Timing knobs shared by the resolver, reader and scheduled jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    /// How far back stored rows still count as current for aggregate reads.
    pub freshness_window: Duration,
    /// Age after which the degraded filter drops an item.
    pub stale_after: Duration,
    pub retention: Duration,
    pub classify_debounce: StdDuration,
    pub cache_ttl: StdDuration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            freshness_window: Duration::minutes(5),
            stale_after: Duration::minutes(10),
            retention: Duration::minutes(10),
            classify_debounce: StdDuration::from_millis(500),
            cache_ttl: StdDuration::from_secs(600),
        }
    }
}

impl PipelineSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            freshness_window: seconds(config.freshness_window_secs),
            stale_after: seconds(config.stale_after_secs),
            retention: seconds(config.retention_secs),
            classify_debounce: StdDuration::from_millis(config.classify_debounce_ms),
            cache_ttl: StdDuration::from_secs(config.cache_ttl_secs),
        }
    }
}

fn seconds(secs: u64) -> Duration {
    Duration::from_std(StdDuration::from_secs(secs)).unwrap_or(Duration::MAX)
}
