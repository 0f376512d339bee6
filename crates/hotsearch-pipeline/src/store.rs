use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hotsearch_core::{HotSearchItem, Platform};
use hotsearch_db::DbError;
use sqlx::PgPool;
use tokio::sync::Mutex;

/// Durable store the pipeline persists to and falls back on.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn list_captured_after(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<HotSearchItem>, DbError>;

    async fn list_by_platform(&self, platform: Platform) -> Result<Vec<HotSearchItem>, DbError>;

    async fn list_all(&self) -> Result<Vec<HotSearchItem>, DbError>;

    /// Updates items that carry an id and inserts the rest. Returns the items
    /// with ids assigned.
    async fn save(&self, items: Vec<HotSearchItem>) -> Result<Vec<HotSearchItem>, DbError>;

    /// Writes classification results back. Ids whose row is gone are skipped
    /// rather than re-inserted; items without an id are inserted. Returns the
    /// items actually written.
    async fn update_classified(
        &self,
        items: Vec<HotSearchItem>,
    ) -> Result<Vec<HotSearchItem>, DbError>;

    async fn delete_by_platform(&self, platform: Platform) -> Result<u64, DbError>;

    async fn delete_captured_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DbError>;

    /// Removes every row, preferring the fast path and falling back to a
    /// plain delete.
    async fn reset(&self) -> Result<(), DbError>;

    async fn latest_captured_at(&self) -> Result<Option<DateTime<Utc>>, DbError>;

    async fn latest_captured_at_by_platform(
        &self,
    ) -> Result<BTreeMap<Platform, DateTime<Utc>>, DbError>;

    /// Verifies the store is reachable.
    async fn ping(&self) -> Result<(), DbError>;
}

/// Postgres-backed store.
#[derive(Debug, Clone)]
pub struct PgItemStore {
    pool: PgPool,
}

impl PgItemStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn list_captured_after(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<HotSearchItem>, DbError> {
        hotsearch_db::list_items_captured_after(&self.pool, since).await
    }

    async fn list_by_platform(&self, platform: Platform) -> Result<Vec<HotSearchItem>, DbError> {
        hotsearch_db::list_items_by_platform(&self.pool, platform).await
    }

    async fn list_all(&self) -> Result<Vec<HotSearchItem>, DbError> {
        hotsearch_db::list_items(&self.pool).await
    }

    async fn save(&self, items: Vec<HotSearchItem>) -> Result<Vec<HotSearchItem>, DbError> {
        hotsearch_db::save_items(&self.pool, items).await
    }

    async fn update_classified(
        &self,
        items: Vec<HotSearchItem>,
    ) -> Result<Vec<HotSearchItem>, DbError> {
        hotsearch_db::update_item_classifications(&self.pool, items).await
    }

    async fn delete_by_platform(&self, platform: Platform) -> Result<u64, DbError> {
        hotsearch_db::delete_items_by_platform(&self.pool, platform).await
    }

    async fn delete_captured_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DbError> {
        hotsearch_db::delete_items_captured_before(&self.pool, cutoff).await
    }

    async fn reset(&self) -> Result<(), DbError> {
        match hotsearch_db::truncate_items(&self.pool).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!(error = %e, "store: truncate failed, falling back to delete");
                let deleted = hotsearch_db::delete_all_items(&self.pool).await?;
                tracing::info!(count = deleted, "store: deleted all rows");
                Ok(())
            }
        }
    }

    async fn latest_captured_at(&self) -> Result<Option<DateTime<Utc>>, DbError> {
        hotsearch_db::latest_captured_at(&self.pool).await
    }

    async fn latest_captured_at_by_platform(
        &self,
    ) -> Result<BTreeMap<Platform, DateTime<Utc>>, DbError> {
        hotsearch_db::latest_captured_at_by_platform(&self.pool).await
    }

    async fn ping(&self) -> Result<(), DbError> {
        hotsearch_db::health_check(&self.pool).await
    }
}

/// In-process store with the same ordering as [`PgItemStore`].
#[derive(Debug, Default)]
pub struct MemoryItemStore {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    rows: Vec<HotSearchItem>,
    next_id: i64,
}

impl MemoryState {
    fn insert(&mut self, mut item: HotSearchItem) -> HotSearchItem {
        self.next_id += 1;
        item.id = Some(self.next_id);
        self.rows.push(item.clone());
        item
    }

    /// Copies the classification fields onto the row with `id`; `false` when
    /// no such row exists.
    fn update(&mut self, id: i64, item: &HotSearchItem) -> bool {
        match self.rows.iter_mut().find(|row| row.id == Some(id)) {
            Some(row) => {
                row.category = item.category;
                row.url.clone_from(&item.url);
                true
            }
            None => false,
        }
    }
}

impl MemoryItemStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `items`, ids assigned in order.
    #[must_use]
    pub fn with_items(items: Vec<HotSearchItem>) -> Self {
        let mut state = MemoryState::default();
        for item in items {
            state.insert(item);
        }
        Self {
            state: Mutex::new(state),
        }
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn sorted(mut items: Vec<HotSearchItem>) -> Vec<HotSearchItem> {
    items.sort_by(|a, b| {
        a.platform
            .cmp(&b.platform)
            .then(a.rank.cmp(&b.rank))
            .then(a.id.cmp(&b.id))
    });
    items
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn list_captured_after(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<HotSearchItem>, DbError> {
        let state = self.state.lock().await;
        Ok(sorted(
            state
                .rows
                .iter()
                .filter(|item| item.captured_at >= since)
                .cloned()
                .collect(),
        ))
    }

    async fn list_by_platform(&self, platform: Platform) -> Result<Vec<HotSearchItem>, DbError> {
        let state = self.state.lock().await;
        Ok(sorted(
            state
                .rows
                .iter()
                .filter(|item| item.platform == platform)
                .cloned()
                .collect(),
        ))
    }

    async fn list_all(&self) -> Result<Vec<HotSearchItem>, DbError> {
        Ok(sorted(self.state.lock().await.rows.clone()))
    }

    async fn save(&self, items: Vec<HotSearchItem>) -> Result<Vec<HotSearchItem>, DbError> {
        let mut state = self.state.lock().await;
        let mut saved = Vec::with_capacity(items.len());
        for item in items {
            match item.id {
                Some(id) if state.update(id, &item) => saved.push(item),
                _ => saved.push(state.insert(item)),
            }
        }
        Ok(saved)
    }

    async fn update_classified(
        &self,
        items: Vec<HotSearchItem>,
    ) -> Result<Vec<HotSearchItem>, DbError> {
        let mut state = self.state.lock().await;
        let mut written = Vec::with_capacity(items.len());
        for item in items {
            match item.id {
                Some(id) => {
                    if state.update(id, &item) {
                        written.push(item);
                    }
                }
                None => written.push(state.insert(item)),
            }
        }
        Ok(written)
    }

    async fn delete_by_platform(&self, platform: Platform) -> Result<u64, DbError> {
        let mut state = self.state.lock().await;
        let before = state.rows.len();
        state.rows.retain(|item| item.platform != platform);
        Ok((before - state.rows.len()) as u64)
    }

    async fn delete_captured_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DbError> {
        let mut state = self.state.lock().await;
        let before = state.rows.len();
        state.rows.retain(|item| item.captured_at >= cutoff);
        Ok((before - state.rows.len()) as u64)
    }

    async fn reset(&self) -> Result<(), DbError> {
        let mut state = self.state.lock().await;
        state.rows.clear();
        state.next_id = 0;
        Ok(())
    }

    async fn latest_captured_at(&self) -> Result<Option<DateTime<Utc>>, DbError> {
        let state = self.state.lock().await;
        Ok(state.rows.iter().map(|item| item.captured_at).max())
    }

    async fn latest_captured_at_by_platform(
        &self,
    ) -> Result<BTreeMap<Platform, DateTime<Utc>>, DbError> {
        let state = self.state.lock().await;
        let mut latest: BTreeMap<Platform, DateTime<Utc>> = BTreeMap::new();
        for item in &state.rows {
            latest
                .entry(item.platform)
                .and_modify(|at| *at = (*at).max(item.captured_at))
                .or_insert(item.captured_at);
        }
        Ok(latest)
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }
}
