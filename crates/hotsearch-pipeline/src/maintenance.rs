use chrono::{DateTime, Duration, Utc};
use hotsearch_cache::CacheTier;

use crate::store::ItemStore;

/// Deletes rows captured before `now - retention`. Returns the number removed,
/// 0 when the delete fails.
pub async fn cleanup_expired(store: &dyn ItemStore, retention: Duration, now: DateTime<Utc>) -> u64 {
    let cutoff = now - retention;
    match store.delete_captured_before(cutoff).await {
        Ok(deleted) => {
            tracing::info!(count = deleted, %cutoff, "cleanup: removed expired rows");
            deleted
        }
        Err(e) => {
            tracing::error!(error = %e, "cleanup: failed to remove expired rows");
            0
        }
    }
}

/// Empties the durable store and every cache entry. Failures are logged.
pub async fn reset_storage(store: &dyn ItemStore, cache: &CacheTier) {
    match store.reset().await {
        Ok(()) => tracing::info!("reset: durable store emptied"),
        Err(e) => tracing::error!(error = %e, "reset: failed to empty durable store"),
    }
    match cache.clear_all().await {
        Ok(()) => tracing::info!("reset: cache cleared"),
        Err(e) => tracing::error!(error = %e, "reset: failed to clear cache"),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration as StdDuration;

    use hotsearch_core::{HotSearchItem, Platform};

    use super::*;
    use crate::store::MemoryItemStore;

    #[tokio::test]
    async fn cleanup_keeps_rows_inside_retention() {
        let now = Utc::now();
        let store = MemoryItemStore::with_items(vec![
            HotSearchItem::new("old", Platform::Weibo, 1, 1, now - Duration::minutes(11)),
            HotSearchItem::new("new", Platform::Weibo, 1, 2, now - Duration::minutes(9)),
        ]);

        assert_eq!(cleanup_expired(&store, Duration::minutes(10), now).await, 1);
        let remaining = store.list_all().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "new");
    }

    #[tokio::test]
    async fn reset_empties_store_and_cache() {
        let item = HotSearchItem::new("a", Platform::Douyin, 1, 1, Utc::now());
        let store = MemoryItemStore::with_items(vec![item.clone()]);
        let cache = hotsearch_cache::in_memory(StdDuration::from_secs(60));
        cache.cache_all(&[item.clone()]).await.unwrap();
        cache.cache_platform(Platform::Douyin, &[item]).await.unwrap();

        reset_storage(&store, &cache).await;

        assert!(store.is_empty().await);
        assert!(cache.get_all().await.unwrap().is_none());
        assert!(cache.get_platform(Platform::Douyin).await.unwrap().is_none());
    }
}
