//! Cache tier for hot-search lists.
//!
//! Provides:
//! - A fixed key schema: one aggregate key plus one key per platform
//! - A [`CacheBackend`] seam with Redis and in-process implementations
//! - [`CacheTier`], the typed list cache the freshness pipeline talks to

mod backend;
mod error;
mod keys;
mod tier;

use std::sync::Arc;
use std::time::Duration;

pub use backend::{CacheBackend, MemoryBackend, RedisBackend, SharedRedis};
pub use error::{CacheError, CacheResult};
pub use keys::CacheKey;
pub use tier::CacheTier;

/// Builds a cache tier on Redis when `redis_url` is set, otherwise in process.
///
/// # Errors
///
/// Returns [`CacheError::Redis`] if the Redis connection cannot be opened.
pub async fn connect_cache(redis_url: Option<&str>, ttl: Duration) -> CacheResult<CacheTier> {
    let backend: Arc<dyn CacheBackend> = match redis_url {
        Some(url) => {
            let backend = RedisBackend::connect(url).await?;
            tracing::info!("cache: using redis backend");
            Arc::new(backend)
        }
        None => {
            tracing::info!("cache: no redis url configured, using in-process backend");
            Arc::new(MemoryBackend::new())
        }
    };
    Ok(CacheTier::new(backend, ttl))
}

/// In-process cache tier.
#[must_use]
pub fn in_memory(ttl: Duration) -> CacheTier {
    CacheTier::new(Arc::new(MemoryBackend::new()), ttl)
}
