use std::sync::Arc;
use std::time::Duration;

use hotsearch_core::{HotSearchItem, Platform};
use tracing::{debug, warn};

use crate::backend::CacheBackend;
use crate::error::CacheResult;
use crate::keys::CacheKey;

/// Hot-search lists cached under the aggregate key and one key per platform.
///
/// Values are JSON arrays of [`HotSearchItem`]. Every write uses the same TTL.
/// Entries that fail to decode are deleted and reported as a miss.
#[derive(Clone)]
pub struct CacheTier {
    backend: Arc<dyn CacheBackend>,
    ttl: Duration,
}

impl std::fmt::Debug for CacheTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheTier")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl CacheTier {
    #[must_use]
    pub fn new(backend: Arc<dyn CacheBackend>, ttl: Duration) -> Self {
        Self { backend, ttl }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// # Errors
    ///
    /// Returns [`crate::CacheError`] if the backend read fails.
    pub async fn get_all(&self) -> CacheResult<Option<Vec<HotSearchItem>>> {
        self.get(&CacheKey::all()).await
    }

    /// # Errors
    ///
    /// Returns [`crate::CacheError`] if the backend read fails.
    pub async fn get_platform(&self, platform: Platform) -> CacheResult<Option<Vec<HotSearchItem>>> {
        self.get(&CacheKey::platform(platform)).await
    }

    /// # Errors
    ///
    /// Returns [`crate::CacheError`] if serialisation or the backend write fails.
    pub async fn cache_all(&self, items: &[HotSearchItem]) -> CacheResult<()> {
        self.set(&CacheKey::all(), items).await
    }

    /// # Errors
    ///
    /// Returns [`crate::CacheError`] if serialisation or the backend write fails.
    pub async fn cache_platform(&self, platform: Platform, items: &[HotSearchItem]) -> CacheResult<()> {
        self.set(&CacheKey::platform(platform), items).await
    }

    /// Removes the aggregate entry and every platform entry.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CacheError`] if the backend delete fails.
    pub async fn clear_all(&self) -> CacheResult<()> {
        self.backend.del(&CacheKey::every()).await?;
        debug!("cache: cleared all entries");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`crate::CacheError`] if the backend delete fails.
    pub async fn clear_platform(&self, platform: Platform) -> CacheResult<()> {
        self.backend.del(&[CacheKey::platform(platform)]).await?;
        debug!(%platform, "cache: cleared platform entry");
        Ok(())
    }

    async fn get(&self, key: &str) -> CacheResult<Option<Vec<HotSearchItem>>> {
        let Some(raw) = self.backend.get_raw(key).await? else {
            debug!(key = %key, "Cache miss");
            return Ok(None);
        };

        match serde_json::from_str::<Vec<HotSearchItem>>(&raw) {
            Ok(items) => {
                debug!(key = %key, count = items.len(), "Cache hit");
                Ok(Some(items))
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Cache deserialization failed");
                if let Err(del_err) = self.backend.del(&[key.to_owned()]).await {
                    warn!(key = %key, error = %del_err, "failed to delete corrupted cache entry");
                }
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, items: &[HotSearchItem]) -> CacheResult<()> {
        let data = serde_json::to_string(items)?;
        self.backend.set_ex(key, data, self.ttl).await?;
        debug!(key = %key, count = items.len(), "Cache set");
        Ok(())
    }
}
