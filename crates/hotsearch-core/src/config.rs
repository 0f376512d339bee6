use std::collections::BTreeMap;
use std::env::VarError;
use std::fmt::Display;
use std::str::FromStr;

use crate::app_config::{AppConfig, Environment, PoolSizing};
use crate::{ConfigError, Platform};

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("HOTSEARCH_ENV", "development"))?;
    let bind_addr = parse_addr("HOTSEARCH_BIND_ADDR", "0.0.0.0:8080")?;
    let log_level = or_default("HOTSEARCH_LOG_LEVEL", "info");
    let redis_url = lookup("HOTSEARCH_REDIS_URL")
        .ok()
        .filter(|url| !url.trim().is_empty());

    let pool = PoolSizing {
        max_workers: parse_var(&lookup, "HOTSEARCH_POOL_MAX_WORKERS", 16)?,
        queue_capacity: parse_var(&lookup, "HOTSEARCH_POOL_QUEUE_CAPACITY", 100)?,
    };
    if pool.max_workers == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "HOTSEARCH_POOL_MAX_WORKERS".to_string(),
            reason: "max workers must be non-zero".to_string(),
        });
    }

    let mut feeds = BTreeMap::new();
    for platform in Platform::ALL {
        let var = format!("HOTSEARCH_FEED_{}", platform.as_str());
        if let Ok(raw) = lookup(&var) {
            let urls = split_urls(&raw);
            if !urls.is_empty() {
                feeds.insert(platform, urls);
            }
        }
    }

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        redis_url,
        db_max_connections: parse_var(&lookup, "HOTSEARCH_DB_MAX_CONNECTIONS", 10)?,
        db_min_connections: parse_var(&lookup, "HOTSEARCH_DB_MIN_CONNECTIONS", 1)?,
        db_acquire_timeout_secs: parse_var(&lookup, "HOTSEARCH_DB_ACQUIRE_TIMEOUT_SECS", 10)?,
        cache_ttl_secs: parse_var(&lookup, "HOTSEARCH_CACHE_TTL_SECS", 600)?,
        freshness_window_secs: parse_var(&lookup, "HOTSEARCH_FRESHNESS_WINDOW_SECS", 300)?,
        stale_after_secs: parse_var(&lookup, "HOTSEARCH_STALE_AFTER_SECS", 600)?,
        failure_threshold: parse_var(&lookup, "HOTSEARCH_FAILURE_THRESHOLD", 3)?,
        warmup_interval_secs: parse_var(&lookup, "HOTSEARCH_WARMUP_INTERVAL_SECS", 30)?,
        warmup_initial_delay_secs: parse_var(&lookup, "HOTSEARCH_WARMUP_INITIAL_DELAY_SECS", 5)?,
        cleanup_interval_secs: parse_var(&lookup, "HOTSEARCH_CLEANUP_INTERVAL_SECS", 600)?,
        retention_secs: parse_var(&lookup, "HOTSEARCH_RETENTION_SECS", 600)?,
        reset_on_startup: parse_bool(&lookup, "HOTSEARCH_RESET_ON_STARTUP", true)?,
        classify_debounce_ms: parse_var(&lookup, "HOTSEARCH_CLASSIFY_DEBOUNCE_MS", 500)?,
        pool,
        collector_timeout_secs: parse_var(&lookup, "HOTSEARCH_COLLECTOR_TIMEOUT_SECS", 15)?,
        collector_user_agent: or_default("HOTSEARCH_COLLECTOR_USER_AGENT", DEFAULT_USER_AGENT),
        collector_max_retries: parse_var(&lookup, "HOTSEARCH_COLLECTOR_MAX_RETRIES", 2)?,
        collector_backoff_base_secs: parse_var(
            &lookup,
            "HOTSEARCH_COLLECTOR_BACKOFF_BASE_SECS",
            1,
        )?,
        collector_max_items: parse_var(&lookup, "HOTSEARCH_COLLECTOR_MAX_ITEMS", 50)?,
        feeds,
        rate_limit_per_minute: parse_var(&lookup, "HOTSEARCH_RATE_LIMIT_PER_MINUTE", 100)?,
    })
}

fn parse_var<F, T>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(var) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
        Err(_) => Ok(default),
    }
}

fn parse_bool<F>(lookup: &F, var: &str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let Ok(raw) = lookup(var) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got {other:?}"),
        }),
    }
}

fn split_urls(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "HOTSEARCH_ENV".to_string(),
            reason: format!("unknown environment {other:?}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
