//! Connections shared by the commands that touch the store or the cache.

use std::sync::Arc;

use hotsearch_cache::CacheTier;
use hotsearch_classifier::Classifier;
use hotsearch_collector::CollectorAggregator;
use hotsearch_core::AppConfig;
use hotsearch_pipeline::{FreshnessResolver, ItemStore, PgItemStore, PipelineSettings};

/// Opens the cache tier the server would use.
pub(crate) async fn open_cache(config: &AppConfig) -> anyhow::Result<CacheTier> {
    let settings = PipelineSettings::from_app_config(config);
    Ok(hotsearch_cache::connect_cache(config.redis_url.as_deref(), settings.cache_ttl).await?)
}

/// Connects to Postgres and applies pending migrations.
pub(crate) async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn ItemStore>> {
    let pool_config = hotsearch_db::PoolConfig::from_app_config(config);
    let pool = hotsearch_db::connect_pool(&config.database_url, pool_config).await?;
    hotsearch_db::run_migrations(&pool).await?;
    Ok(Arc::new(PgItemStore::new(pool)))
}

/// Wires a resolver over the configured store, cache and collectors.
pub(crate) async fn open_resolver(config: &AppConfig) -> anyhow::Result<FreshnessResolver> {
    let settings = PipelineSettings::from_app_config(config);
    let store = open_store(config).await?;
    let cache = open_cache(config).await?;
    let collectors = CollectorAggregator::from_config(config)?;

    Ok(FreshnessResolver::new(
        cache,
        store,
        Arc::new(collectors),
        Arc::new(Classifier::new()),
        settings.freshness_window,
    ))
}
