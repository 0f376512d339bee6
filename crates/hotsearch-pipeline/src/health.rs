//! Per-platform health read model.
//!
//! Failure counters and the refresh log are written only by the warmup path;
//! the read path never consults them.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use hotsearch_cache::CacheTier;
use hotsearch_core::{HotSearchItem, Platform};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Up,
    Degraded,
    Down,
}

/// Outcome of the most recent warmup for a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RefreshRecord {
    pub at: DateTime<Utc>,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformHealth {
    pub platform: Platform,
    pub status: HealthStatus,
    pub failure_count: u64,
    pub degraded: bool,
    pub message: String,
    /// `captured_at` of the first cached item.
    pub last_updated: Option<DateTime<Utc>>,
    pub dataset_size: usize,
    pub last_refresh: Option<RefreshRecord>,
}

/// Last warmup time and result per platform.
#[derive(Debug, Default)]
pub struct RefreshLog {
    records: DashMap<Platform, RefreshRecord>,
}

impl RefreshLog {
    pub fn record(&self, platform: Platform, success: bool, at: DateTime<Utc>) {
        self.records.insert(platform, RefreshRecord { at, success });
    }

    #[must_use]
    pub fn last(&self, platform: Platform) -> Option<RefreshRecord> {
        self.records.get(&platform).map(|record| *record)
    }
}

#[derive(Debug)]
pub struct HealthMonitor {
    threshold: u64,
    failures: DashMap<Platform, u64>,
    refresh_log: RefreshLog,
}

impl HealthMonitor {
    #[must_use]
    pub fn new(threshold: u64) -> Self {
        Self {
            threshold,
            failures: DashMap::new(),
            refresh_log: RefreshLog::default(),
        }
    }

    #[must_use]
    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Increments the platform's failure counter and returns the new count.
    pub fn record_failure(&self, platform: Platform) -> u64 {
        let count = {
            let mut entry = self.failures.entry(platform).or_insert(0);
            *entry += 1;
            *entry
        };
        if count >= self.threshold {
            tracing::warn!(%platform, count, "health: failure threshold reached");
        }
        count
    }

    pub fn clear_failure(&self, platform: Platform) {
        if self.failures.remove(&platform).is_some() {
            tracing::info!(%platform, "health: failure counter cleared");
        }
    }

    #[must_use]
    pub fn failure_count(&self, platform: Platform) -> u64 {
        self.failures.get(&platform).map_or(0, |count| *count)
    }

    #[must_use]
    pub fn refresh_log(&self) -> &RefreshLog {
        &self.refresh_log
    }

    /// Classifies a platform from its failure count and cached dataset.
    #[must_use]
    pub fn evaluate(&self, platform: Platform, cached: &[HotSearchItem]) -> PlatformHealth {
        let failure_count = self.failure_count(platform);
        let degraded = cached.iter().any(HotSearchItem::has_degraded_marker);

        let (status, message) = if failure_count >= self.threshold {
            (
                HealthStatus::Down,
                format!("{failure_count} consecutive refresh failures"),
            )
        } else if cached.is_empty() {
            (HealthStatus::Down, "no cached data".to_owned())
        } else if degraded {
            (HealthStatus::Degraded, "serving degraded data".to_owned())
        } else {
            (HealthStatus::Up, "ok".to_owned())
        };

        PlatformHealth {
            platform,
            status,
            failure_count,
            degraded,
            message,
            last_updated: cached.first().map(|item| item.captured_at),
            dataset_size: cached.len(),
            last_refresh: self.refresh_log.last(platform),
        }
    }

    /// Reads the platform's cache entry and evaluates it. A cache error counts
    /// as an empty dataset.
    pub async fn check(&self, platform: Platform, cache: &CacheTier) -> PlatformHealth {
        let cached = match cache.get_platform(platform).await {
            Ok(items) => items.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(%platform, error = %e, "health: cache read failed");
                Vec::new()
            }
        };
        self.evaluate(platform, &cached)
    }

    pub async fn check_all(&self, cache: &CacheTier) -> Vec<PlatformHealth> {
        let mut report = Vec::with_capacity(Platform::ALL.len());
        for platform in Platform::ALL {
            report.push(self.check(platform, cache).await);
        }
        report
    }
}
