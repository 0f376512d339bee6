use std::collections::BTreeMap;
use std::net::SocketAddr;

use crate::Platform;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Sizing of the background worker pool.
///
/// Workers are tokio tasks gated by a semaphore, so there is a single
/// concurrency bound rather than a core and a maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSizing {
    pub max_workers: usize,
    pub queue_capacity: usize,
}

impl Default for PoolSizing {
    fn default() -> Self {
        Self {
            max_workers: 16,
            queue_capacity: 100,
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub redis_url: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub cache_ttl_secs: u64,
    pub freshness_window_secs: u64,
    pub stale_after_secs: u64,
    pub failure_threshold: u64,
    pub warmup_interval_secs: u64,
    pub warmup_initial_delay_secs: u64,
    pub cleanup_interval_secs: u64,
    pub retention_secs: u64,
    pub reset_on_startup: bool,
    pub classify_debounce_ms: u64,
    pub pool: PoolSizing,
    pub collector_timeout_secs: u64,
    pub collector_user_agent: String,
    pub collector_max_retries: u32,
    pub collector_backoff_base_secs: u64,
    pub collector_max_items: usize,
    /// Ordered source URLs per platform: primary first, then backups.
    pub feeds: BTreeMap<Platform, Vec<String>>,
    pub rate_limit_per_minute: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("redis_url", &self.redis_url.as_ref().map(|_| "[redacted]"))
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("freshness_window_secs", &self.freshness_window_secs)
            .field("stale_after_secs", &self.stale_after_secs)
            .field("failure_threshold", &self.failure_threshold)
            .field("warmup_interval_secs", &self.warmup_interval_secs)
            .field("warmup_initial_delay_secs", &self.warmup_initial_delay_secs)
            .field("cleanup_interval_secs", &self.cleanup_interval_secs)
            .field("retention_secs", &self.retention_secs)
            .field("reset_on_startup", &self.reset_on_startup)
            .field("classify_debounce_ms", &self.classify_debounce_ms)
            .field("pool", &self.pool)
            .field("collector_timeout_secs", &self.collector_timeout_secs)
            .field("collector_user_agent", &self.collector_user_agent)
            .field("collector_max_retries", &self.collector_max_retries)
            .field(
                "collector_backoff_base_secs",
                &self.collector_backoff_base_secs,
            )
            .field("collector_max_items", &self.collector_max_items)
            .field("feeds", &self.feeds)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}
