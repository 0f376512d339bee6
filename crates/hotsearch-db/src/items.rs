//! Database operations for the `hot_search_items` table.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use hotsearch_core::{Category, HotSearchItem, Platform};
use sqlx::{PgPool, Postgres, Transaction};

use crate::DbError;

const TITLE_MAX_CHARS: usize = 200;
const URL_MAX_CHARS: usize = 500;

const SELECT_COLUMNS: &str = "SELECT id, title, platform, heat, rank, captured_at, category, url, \
                              actual_source, degraded_reason \
                              FROM hot_search_items";

/// A row from the `hot_search_items` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HotSearchRow {
    pub id: i64,
    pub title: String,
    pub platform: String,
    pub heat: i64,
    pub rank: i32,
    pub captured_at: DateTime<Utc>,
    pub category: Option<String>,
    pub url: Option<String>,
    pub actual_source: Option<String>,
    pub degraded_reason: Option<String>,
}

impl HotSearchRow {
    /// Converts the row into a domain item.
    ///
    /// Unknown stored categories map to [`Category::Other`] so the classifier
    /// picks them up again.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidRow`] if the stored platform is not recognised.
    pub fn into_item(self) -> Result<HotSearchItem, DbError> {
        let platform = self
            .platform
            .parse::<Platform>()
            .map_err(|source| DbError::InvalidRow {
                id: self.id,
                source,
            })?;

        Ok(HotSearchItem {
            id: Some(self.id),
            title: self.title,
            platform,
            heat: self.heat.max(0),
            rank: self.rank,
            captured_at: self.captured_at,
            category: self.category.as_deref().map(Category::from_stored),
            url: self.url,
            actual_source: self.actual_source,
            degraded_reason: self.degraded_reason,
        })
    }
}

fn into_items(rows: Vec<HotSearchRow>) -> Result<Vec<HotSearchItem>, DbError> {
    rows.into_iter().map(HotSearchRow::into_item).collect()
}

fn clip(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

async fn insert_one(
    tx: &mut Transaction<'_, Postgres>,
    item: &HotSearchItem,
) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO hot_search_items \
             (title, platform, heat, rank, captured_at, category, url, actual_source, degraded_reason) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         RETURNING id",
    )
    .bind(clip(&item.title, TITLE_MAX_CHARS))
    .bind(item.platform.as_str())
    .bind(item.heat.max(0))
    .bind(item.rank)
    .bind(item.captured_at)
    .bind(item.category.map(Category::as_str))
    .bind(item.url.as_deref().map(|url| clip(url, URL_MAX_CHARS)))
    .bind(item.actual_source.as_deref())
    .bind(item.degraded_reason.as_deref())
    .fetch_one(&mut **tx)
    .await?;

    Ok(id)
}

/// Inserts every item as a new row and returns the items with their ids set.
///
/// All inserts run in one transaction.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any insert fails; nothing is committed then.
pub async fn insert_items(
    pool: &PgPool,
    items: Vec<HotSearchItem>,
) -> Result<Vec<HotSearchItem>, DbError> {
    if items.is_empty() {
        return Ok(items);
    }

    let mut tx = pool.begin().await?;
    let mut saved = Vec::with_capacity(items.len());
    for mut item in items {
        item.id = Some(insert_one(&mut tx, &item).await?);
        saved.push(item);
    }
    tx.commit().await?;

    Ok(saved)
}

/// Persists items: rows that already carry an id have their `category` and
/// `url` updated in place, everything else is inserted.
///
/// An id whose row has since been deleted is re-inserted as a new row. The
/// classification pass uses [`update_item_classifications`] instead so it
/// never brings back a superseded snapshot.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails; nothing is committed then.
pub async fn save_items(
    pool: &PgPool,
    items: Vec<HotSearchItem>,
) -> Result<Vec<HotSearchItem>, DbError> {
    if items.is_empty() {
        return Ok(items);
    }

    let mut tx = pool.begin().await?;
    let mut saved = Vec::with_capacity(items.len());
    for mut item in items {
        if let Some(id) = item.id {
            let result = sqlx::query(
                "UPDATE hot_search_items SET category = $1, url = $2 WHERE id = $3",
            )
            .bind(item.category.map(Category::as_str))
            .bind(item.url.as_deref().map(|url| clip(url, URL_MAX_CHARS)))
            .bind(id)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() > 0 {
                saved.push(item);
                continue;
            }
        }
        item.id = Some(insert_one(&mut tx, &item).await?);
        saved.push(item);
    }
    tx.commit().await?;

    Ok(saved)
}

/// Writes classification results back: rows that carry an id get their
/// `category` and `url` updated, items without an id are inserted.
///
/// An id whose row is gone was superseded by a newer snapshot; it is skipped
/// and left out of the returned list.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails; nothing is committed then.
pub async fn update_item_classifications(
    pool: &PgPool,
    items: Vec<HotSearchItem>,
) -> Result<Vec<HotSearchItem>, DbError> {
    if items.is_empty() {
        return Ok(items);
    }

    let mut tx = pool.begin().await?;
    let mut written = Vec::with_capacity(items.len());
    for mut item in items {
        match item.id {
            Some(id) => {
                let result = sqlx::query(
                    "UPDATE hot_search_items SET category = $1, url = $2 WHERE id = $3",
                )
                .bind(item.category.map(Category::as_str))
                .bind(item.url.as_deref().map(|url| clip(url, URL_MAX_CHARS)))
                .bind(id)
                .execute(&mut *tx)
                .await?;

                if result.rows_affected() == 0 {
                    continue;
                }
            }
            None => item.id = Some(insert_one(&mut tx, &item).await?),
        }
        written.push(item);
    }
    tx.commit().await?;

    Ok(written)
}

/// Lists rows captured at or after `since`, newest snapshot first and by rank
/// within a platform.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a row cannot be decoded.
pub async fn list_items_captured_after(
    pool: &PgPool,
    since: DateTime<Utc>,
) -> Result<Vec<HotSearchItem>, DbError> {
    let rows = sqlx::query_as::<_, HotSearchRow>(&format!(
        "{SELECT_COLUMNS} WHERE captured_at >= $1 ORDER BY platform, rank ASC, id ASC"
    ))
    .bind(since)
    .fetch_all(pool)
    .await?;

    into_items(rows)
}

/// Lists every row for one platform ordered by rank.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a row cannot be decoded.
pub async fn list_items_by_platform(
    pool: &PgPool,
    platform: Platform,
) -> Result<Vec<HotSearchItem>, DbError> {
    let rows = sqlx::query_as::<_, HotSearchRow>(&format!(
        "{SELECT_COLUMNS} WHERE platform = $1 ORDER BY rank ASC, id ASC"
    ))
    .bind(platform.as_str())
    .fetch_all(pool)
    .await?;

    into_items(rows)
}

/// Lists every stored row.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a row cannot be decoded.
pub async fn list_items(pool: &PgPool) -> Result<Vec<HotSearchItem>, DbError> {
    let rows = sqlx::query_as::<_, HotSearchRow>(&format!(
        "{SELECT_COLUMNS} ORDER BY platform, rank ASC, id ASC"
    ))
    .fetch_all(pool)
    .await?;

    into_items(rows)
}

/// Deletes every row for `platform`. Returns the number of rows removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_items_by_platform(pool: &PgPool, platform: Platform) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM hot_search_items WHERE platform = $1")
        .bind(platform.as_str())
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Deletes rows captured strictly before `cutoff`. Returns the number removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_items_captured_before(
    pool: &PgPool,
    cutoff: DateTime<Utc>,
) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM hot_search_items WHERE captured_at < $1")
        .bind(cutoff)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Empties the table and resets the id sequence.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the truncate fails (for example when the role
/// lacks the `TRUNCATE` privilege).
pub async fn truncate_items(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query("TRUNCATE TABLE hot_search_items RESTART IDENTITY")
        .execute(pool)
        .await?;
    Ok(())
}

/// Deletes every row. Slower than [`truncate_items`] but needs only `DELETE`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_all_items(pool: &PgPool) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM hot_search_items")
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Most recent `captured_at` across all rows, `None` when the table is empty.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn latest_captured_at(pool: &PgPool) -> Result<Option<DateTime<Utc>>, DbError> {
    let latest = sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
        "SELECT MAX(captured_at) FROM hot_search_items",
    )
    .fetch_one(pool)
    .await?;

    Ok(latest)
}

/// Most recent `captured_at` per platform. Platforms without rows are absent;
/// rows with an unrecognised platform are skipped.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn latest_captured_at_by_platform(
    pool: &PgPool,
) -> Result<BTreeMap<Platform, DateTime<Utc>>, DbError> {
    let rows = sqlx::query_as::<_, (String, DateTime<Utc>)>(
        "SELECT platform, MAX(captured_at) \
         FROM hot_search_items \
         GROUP BY platform",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(platform, at)| platform.parse::<Platform>().ok().map(|p| (p, at)))
        .collect())
}
