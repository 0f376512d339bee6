use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{CacheError, CacheResult};

/// Shared Redis connection manager
pub type SharedRedis = Arc<Mutex<ConnectionManager>>;

/// Raw string key/value store with per-key TTL.
#[async_trait::async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<Option<String>>;

    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()>;

    async fn del(&self, keys: &[String]) -> CacheResult<()>;
}

/// Redis-backed store.
#[derive(Clone)]
pub struct RedisBackend {
    redis: SharedRedis,
}

impl RedisBackend {
    #[must_use]
    pub fn new(redis: SharedRedis) -> Self {
        Self { redis }
    }

    /// Opens a managed connection to `url`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Redis`] if the URL is invalid or the server is
    /// unreachable.
    pub async fn connect(url: &str) -> CacheResult<Self> {
        let client = redis::Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;
        Ok(Self::new(Arc::new(Mutex::new(manager))))
    }
}

#[async_trait::async_trait]
impl CacheBackend for RedisBackend {
    async fn get_raw(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.redis.lock().await;
        let result: Option<String> = conn.get(key).await.map_err(CacheError::Redis)?;
        Ok(result)
    }

    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()> {
        // SETEX rejects a zero TTL.
        let ttl_secs = ttl.as_secs().max(1);
        let mut conn = self.redis.lock().await;
        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(CacheError::Redis)?;
        debug!(key = %key, ttl = ttl_secs, "Cache set");
        Ok(())
    }

    async fn del(&self, keys: &[String]) -> CacheResult<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.redis.lock().await;
        conn.del::<_, ()>(keys).await.map_err(CacheError::Redis)?;
        debug!(count = keys.len(), "Cache delete");
        Ok(())
    }
}

/// In-process store used when no Redis URL is configured, and in tests.
///
/// Expired entries are dropped lazily on read.
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl CacheBackend for MemoryBackend {
    async fn get_raw(&self, key: &str) -> CacheResult<Option<String>> {
        let mut entries = self.entries.lock().await;
        let Some((value, expires_at)) = entries.get(key) else {
            return Ok(None);
        };
        if *expires_at > Instant::now() {
            return Ok(Some(value.clone()));
        }
        entries.remove(key);
        Ok(None)
    }

    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()> {
        let expires_at = Instant::now() + ttl;
        self.entries
            .lock()
            .await
            .insert(key.to_owned(), (value, expires_at));
        Ok(())
    }

    async fn del(&self, keys: &[String]) -> CacheResult<()> {
        let mut entries = self.entries.lock().await;
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }
}
