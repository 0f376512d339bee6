mod api;
mod middleware;
mod scheduler;

use std::sync::Arc;

use hotsearch_classifier::Classifier;
use hotsearch_collector::CollectorAggregator;
use hotsearch_pipeline::{
    reset_storage, BackgroundPool, ClassificationGate, FreshnessResolver, HealthMonitor,
    HotSearchReader, ItemStore, PgItemStore, PipelineSettings,
};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::RateLimitState,
    scheduler::SchedulerContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = hotsearch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = hotsearch_db::PoolConfig::from_app_config(&config);
    let pool = hotsearch_db::connect_pool(&config.database_url, pool_config).await?;
    hotsearch_db::run_migrations(&pool).await?;
    let store: Arc<dyn ItemStore> = Arc::new(PgItemStore::new(pool));

    let settings = PipelineSettings::from_app_config(&config);
    let cache = hotsearch_cache::connect_cache(config.redis_url.as_deref(), settings.cache_ttl).await?;

    if config.reset_on_startup {
        reset_storage(store.as_ref(), &cache).await;
    }

    let collectors = CollectorAggregator::from_config(&config)?;
    let platforms = collectors.platforms();
    tracing::info!(?platforms, "collectors registered");

    let resolver = Arc::new(FreshnessResolver::new(
        cache,
        store,
        Arc::new(collectors),
        Arc::new(Classifier::new()),
        settings.freshness_window,
    ));
    let background = BackgroundPool::new(config.pool);
    let health = Arc::new(HealthMonitor::new(config.failure_threshold));
    let reader = HotSearchReader::new(
        Arc::clone(&resolver),
        ClassificationGate::new(),
        background.clone(),
        settings.stale_after,
        settings.classify_debounce,
    );

    let _scheduler = scheduler::build_scheduler(SchedulerContext::new(
        &config,
        &settings,
        resolver,
        Arc::clone(&health),
        background,
        platforms,
    ))
    .await?;

    let app = build_app(
        AppState { reader, health },
        RateLimitState::per_minute(config.rate_limit_per_minute),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
