//! Background job scheduler.
//!
//! Registers one staggered warmup job per collected platform and the
//! durable-store cleanup job. Job bodies run on the [`BackgroundPool`].

mod warmup;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use hotsearch_core::{AppConfig, Platform};
use hotsearch_pipeline::{
    cleanup_expired, BackgroundPool, FreshnessResolver, HealthMonitor, PipelineSettings,
};
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Everything the scheduled jobs share.
#[derive(Debug, Clone)]
pub struct SchedulerContext {
    pub resolver: Arc<FreshnessResolver>,
    pub health: Arc<HealthMonitor>,
    pub pool: BackgroundPool,
    /// Platforms with a registered collector, in collection order.
    pub platforms: Vec<Platform>,
    pub warmup_interval: Duration,
    pub warmup_initial_delay: Duration,
    pub cleanup_interval: Duration,
    pub retention: chrono::Duration,
}

impl SchedulerContext {
    #[must_use]
    pub fn new(
        config: &AppConfig,
        settings: &PipelineSettings,
        resolver: Arc<FreshnessResolver>,
        health: Arc<HealthMonitor>,
        pool: BackgroundPool,
        platforms: Vec<Platform>,
    ) -> Self {
        Self {
            resolver,
            health,
            pool,
            platforms,
            warmup_interval: Duration::from_secs(config.warmup_interval_secs.max(1)),
            warmup_initial_delay: Duration::from_secs(config.warmup_initial_delay_secs),
            cleanup_interval: Duration::from_secs(config.cleanup_interval_secs.max(1)),
            retention: settings.retention,
        }
    }
}

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive for
/// the lifetime of the process. Dropping it shuts down all scheduled jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(ctx: SchedulerContext) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    for (slot, platform) in ctx.platforms.iter().copied().enumerate() {
        warmup::register_warmup_job(&scheduler, &ctx, platform, slot).await?;
    }
    register_cleanup_job(&scheduler, &ctx).await?;

    scheduler.start().await?;
    tracing::info!(
        platforms = ctx.platforms.len(),
        warmup_interval_secs = ctx.warmup_interval.as_secs(),
        cleanup_interval_secs = ctx.cleanup_interval.as_secs(),
        "scheduler: started"
    );
    Ok(scheduler)
}

/// Register the repeating cleanup of rows older than the retention.
async fn register_cleanup_job(
    scheduler: &JobScheduler,
    ctx: &SchedulerContext,
) -> Result<(), JobSchedulerError> {
    let store = Arc::clone(ctx.resolver.store());
    let pool = ctx.pool.clone();
    let retention = ctx.retention;

    let job = Job::new_repeated_async(ctx.cleanup_interval, move |_uuid, _lock| {
        let store = Arc::clone(&store);
        let pool = pool.clone();

        Box::pin(async move {
            pool.submit(async move {
                cleanup_expired(store.as_ref(), retention, Utc::now()).await;
            })
            .await;
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}
