//! List transforms applied before items reach a reader.

use chrono::{DateTime, Duration, Utc};
use hotsearch_core::{Category, HotSearchItem};

/// Drops `degraded` items and items captured more than `stale_after` before
/// `now`.
///
/// If that would leave nothing from a non-empty list, the list is returned
/// unchanged.
#[must_use]
pub fn filter_degraded(
    items: Vec<HotSearchItem>,
    now: DateTime<Utc>,
    stale_after: Duration,
) -> Vec<HotSearchItem> {
    if items.is_empty() {
        return items;
    }

    let cutoff = now - stale_after;
    let kept: Vec<HotSearchItem> = items
        .iter()
        .filter(|item| item.category != Some(Category::Degraded) && item.captured_at >= cutoff)
        .cloned()
        .collect();

    if kept.is_empty() {
        tracing::warn!(
            count = items.len(),
            "filter: every item is degraded or stale, returning unfiltered list"
        );
        return items;
    }

    let dropped = items.len() - kept.len();
    if dropped > 0 {
        tracing::debug!(dropped, kept = kept.len(), "filter: dropped degraded or stale items");
    }
    kept
}

/// Fills a missing or blank `url` with the platform search URL for the title
/// and marks items without a category as `pending`.
#[must_use]
pub fn repair_items(mut items: Vec<HotSearchItem>) -> Vec<HotSearchItem> {
    for item in &mut items {
        if item.url.as_deref().is_none_or(|url| url.trim().is_empty()) {
            item.url = Some(item.platform.search_url(&item.title));
        }
        if item.category.is_none() {
            item.category = Some(Category::Pending);
        }
    }
    items
}

/// Keeps items whose category equals `category`. `None` keeps everything.
#[must_use]
pub fn filter_by_category(
    items: Vec<HotSearchItem>,
    category: Option<Category>,
) -> Vec<HotSearchItem> {
    match category {
        Some(category) => items
            .into_iter()
            .filter(|item| item.category == Some(category))
            .collect(),
        None => items,
    }
}

/// Stable sort by rank ascending.
#[must_use]
pub fn sort_by_rank(mut items: Vec<HotSearchItem>) -> Vec<HotSearchItem> {
    items.sort_by_key(|item| item.rank);
    items
}
