//! Per-platform warmup jobs.
//!
//! Platform `slot` first warms up after `initial_delay × (slot + 1)`; that
//! one-shot run then registers the repeating job, so the platforms stay
//! staggered by one initial delay. A tick that finds the previous warmup for
//! its platform still running is skipped.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use hotsearch_core::Platform;
use hotsearch_pipeline::{BackgroundPool, ClassificationGate, FreshnessResolver, HealthMonitor};
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use super::SchedulerContext;

/// Runs the write-path refresh for `platform` and records the outcome in the
/// health monitor. Returns whether fresh data replaced the old snapshot.
pub(super) async fn warmup_platform(
    resolver: &FreshnessResolver,
    health: &HealthMonitor,
    platform: Platform,
) -> bool {
    let started = Instant::now();
    let outcome = resolver.refresh_platform(platform).await;
    let duration_ms = started.elapsed().as_millis();

    if outcome.fresh {
        health.clear_failure(platform);
        health.refresh_log().record(platform, true, Utc::now());
        tracing::info!(
            %platform,
            count = outcome.items.len(),
            duration_ms,
            "scheduler: warmup refreshed platform"
        );
    } else {
        let failures = health.record_failure(platform);
        health.refresh_log().record(platform, false, Utc::now());
        tracing::warn!(
            %platform,
            failures,
            count = outcome.items.len(),
            duration_ms,
            "scheduler: warmup produced no fresh data"
        );
    }
    outcome.fresh
}

/// Hands a warmup to the pool unless one for `platform` is still in flight.
/// Returns whether it was submitted.
async fn submit_warmup(
    pool: &BackgroundPool,
    in_flight: &ClassificationGate,
    resolver: Arc<FreshnessResolver>,
    health: Arc<HealthMonitor>,
    platform: Platform,
) -> bool {
    let Some(guard) = in_flight.try_acquire() else {
        tracing::debug!(%platform, "scheduler: previous warmup still running, skipping tick");
        return false;
    };

    pool.submit(async move {
        let _guard = guard;
        warmup_platform(&resolver, &health, platform).await;
    })
    .await;
    true
}

/// Register the staggered first warmup for `platform`.
pub(super) async fn register_warmup_job(
    scheduler: &JobScheduler,
    ctx: &SchedulerContext,
    platform: Platform,
    slot: usize,
) -> Result<(), JobSchedulerError> {
    let first_run = ctx
        .warmup_initial_delay
        .saturating_mul(u32::try_from(slot + 1).unwrap_or(u32::MAX));
    let interval = ctx.warmup_interval;
    let resolver = Arc::clone(&ctx.resolver);
    let health = Arc::clone(&ctx.health);
    let pool = ctx.pool.clone();
    let in_flight = ClassificationGate::new();

    let job = Job::new_one_shot_async(first_run, move |_uuid, lock| {
        let resolver = Arc::clone(&resolver);
        let health = Arc::clone(&health);
        let pool = pool.clone();
        let in_flight = in_flight.clone();

        Box::pin(async move {
            submit_warmup(
                &pool,
                &in_flight,
                Arc::clone(&resolver),
                Arc::clone(&health),
                platform,
            )
            .await;

            let repeating = match repeating_warmup_job(
                interval, resolver, health, pool, in_flight, platform,
            ) {
                Ok(job) => job,
                Err(e) => {
                    tracing::error!(%platform, error = %e, "scheduler: failed to build warmup job");
                    return;
                }
            };
            if let Err(e) = lock.add(repeating).await {
                tracing::error!(%platform, error = %e, "scheduler: failed to register warmup job");
            }
        })
    })?;

    scheduler.add(job).await?;
    tracing::debug!(
        %platform,
        first_run_secs = first_run.as_secs(),
        "scheduler: warmup scheduled"
    );
    Ok(())
}

fn repeating_warmup_job(
    interval: std::time::Duration,
    resolver: Arc<FreshnessResolver>,
    health: Arc<HealthMonitor>,
    pool: BackgroundPool,
    in_flight: ClassificationGate,
    platform: Platform,
) -> Result<Job, JobSchedulerError> {
    Job::new_repeated_async(interval, move |_uuid, _lock| {
        let resolver = Arc::clone(&resolver);
        let health = Arc::clone(&health);
        let pool = pool.clone();
        let in_flight = in_flight.clone();

        Box::pin(async move {
            submit_warmup(&pool, &in_flight, resolver, health, platform).await;
        })
    })
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration as StdDuration;

    use async_trait::async_trait;
    use chrono::Duration;
    use hotsearch_cache::CacheTier;
    use hotsearch_classifier::Classifier;
    use hotsearch_collector::{CollectorAggregator, CollectorError, PlatformCollector};
    use hotsearch_core::HotSearchItem;
    use hotsearch_pipeline::{HealthStatus, ItemStore, MemoryItemStore};

    use super::*;

    struct ScriptedCollector {
        platform: Platform,
        responses: Mutex<VecDeque<Vec<HotSearchItem>>>,
    }

    #[async_trait]
    impl PlatformCollector for ScriptedCollector {
        fn platform(&self) -> Platform {
            self.platform
        }

        async fn fetch(&self, _force_refresh: bool) -> Result<Vec<HotSearchItem>, CollectorError> {
            Ok(self
                .responses
                .lock()
                .expect("responses lock")
                .pop_front()
                .unwrap_or_default())
        }
    }

    fn resolver(responses: Vec<Vec<HotSearchItem>>) -> (FreshnessResolver, CacheTier) {
        let cache = hotsearch_cache::in_memory(StdDuration::from_secs(600));
        let store: Arc<dyn ItemStore> = Arc::new(MemoryItemStore::new());
        let collector = Arc::new(ScriptedCollector {
            platform: Platform::Weibo,
            responses: Mutex::new(responses.into()),
        });
        let aggregator = CollectorAggregator::new().with_collector(collector);
        let resolver = FreshnessResolver::new(
            cache.clone(),
            store,
            Arc::new(aggregator),
            Arc::new(Classifier::new()),
            Duration::minutes(5),
        );
        (resolver, cache)
    }

    fn item(title: &str, rank: i32) -> HotSearchItem {
        HotSearchItem::new(title, Platform::Weibo, 100, rank, Utc::now())
    }

    #[tokio::test]
    async fn failed_warmups_accumulate_until_down() {
        let (resolver, _cache) = resolver(Vec::new());
        let health = HealthMonitor::new(2);

        assert!(!warmup_platform(&resolver, &health, Platform::Weibo).await);
        assert!(!warmup_platform(&resolver, &health, Platform::Weibo).await);

        assert_eq!(health.failure_count(Platform::Weibo), 2);
        let record = health
            .refresh_log()
            .last(Platform::Weibo)
            .expect("refresh recorded");
        assert!(!record.success);
        assert_eq!(health.evaluate(Platform::Weibo, &[item("x", 1)]).status, HealthStatus::Down);
    }

    #[tokio::test]
    async fn successful_warmup_clears_failures_and_caches() {
        let (resolver, cache) = resolver(vec![Vec::new(), vec![item("fresh", 1)]]);
        let health = HealthMonitor::new(3);

        assert!(!warmup_platform(&resolver, &health, Platform::Weibo).await);
        assert_eq!(health.failure_count(Platform::Weibo), 1);

        assert!(warmup_platform(&resolver, &health, Platform::Weibo).await);
        assert_eq!(health.failure_count(Platform::Weibo), 0);
        assert!(health
            .refresh_log()
            .last(Platform::Weibo)
            .is_some_and(|record| record.success));

        let cached = cache
            .get_platform(Platform::Weibo)
            .await
            .expect("cache read")
            .expect("platform cached");
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].title, "fresh");
    }

    #[tokio::test]
    async fn pooled_warmup_runs_to_completion() {
        let (resolver, cache) = resolver(vec![vec![item("pooled", 1)]]);
        let health = Arc::new(HealthMonitor::new(3));
        let pool = BackgroundPool::new(hotsearch_core::PoolSizing::default());

        let in_flight = ClassificationGate::new();
        let submitted =
            submit_warmup(&pool, &in_flight, Arc::new(resolver), Arc::clone(&health), Platform::Weibo)
                .await;
        assert!(submitted);

        for _ in 0..100 {
            if health.refresh_log().last(Platform::Weibo).is_some() {
                break;
            }
            tokio::time::sleep(StdDuration::from_millis(10)).await;
        }
        assert!(health
            .refresh_log()
            .last(Platform::Weibo)
            .is_some_and(|record| record.success));
        assert!(cache
            .get_platform(Platform::Weibo)
            .await
            .expect("cache read")
            .is_some());
        assert!(!in_flight.is_running());
    }

    /// Collector whose fetch takes a while and records how many run at once.
    #[derive(Default)]
    struct SlowCollector {
        running: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PlatformCollector for SlowCollector {
        fn platform(&self) -> Platform {
            Platform::Weibo
        }

        async fn fetch(&self, _force_refresh: bool) -> Result<Vec<HotSearchItem>, CollectorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(StdDuration::from_millis(300)).await;
            self.running.fetch_sub(1, Ordering::SeqCst);
            Ok(vec![item("slow", 1)])
        }
    }

    #[tokio::test]
    async fn ticks_during_a_running_warmup_are_skipped() {
        let collector = Arc::new(SlowCollector::default());
        let aggregator = CollectorAggregator::new()
            .with_collector(Arc::clone(&collector) as Arc<dyn PlatformCollector>);
        let resolver = Arc::new(FreshnessResolver::new(
            hotsearch_cache::in_memory(StdDuration::from_secs(600)),
            Arc::new(MemoryItemStore::new()),
            Arc::new(aggregator),
            Arc::new(Classifier::new()),
            Duration::minutes(5),
        ));
        let health = Arc::new(HealthMonitor::new(3));
        let pool = BackgroundPool::new(hotsearch_core::PoolSizing::default());
        let in_flight = ClassificationGate::new();

        let mut submitted = 0;
        for _ in 0..4 {
            let resolver = Arc::clone(&resolver);
            let health = Arc::clone(&health);
            if submit_warmup(&pool, &in_flight, resolver, health, Platform::Weibo).await {
                submitted += 1;
            }
            tokio::time::sleep(StdDuration::from_millis(50)).await;
        }
        assert_eq!(submitted, 1);

        for _ in 0..100 {
            if !in_flight.is_running() {
                break;
            }
            tokio::time::sleep(StdDuration::from_millis(10)).await;
        }
        assert!(!in_flight.is_running());
        assert_eq!(collector.calls.load(Ordering::SeqCst), 1);
        assert_eq!(collector.peak.load(Ordering::SeqCst), 1);

        assert!(
            submit_warmup(&pool, &in_flight, resolver, health, Platform::Weibo).await,
            "a finished warmup frees the platform for the next tick"
        );
    }
}
