use chrono::{DateTime, Utc};
use hotsearch_core::{Category, HotSearchItem, Platform};
use serde::Serialize;

/// Classification progress over a set of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassificationStats {
    pub total: usize,
    /// Items still `pending` or `evaluating`.
    pub pending: usize,
    /// Items carrying a topic category.
    pub classified: usize,
    pub classified_percentage: usize,
    pub classifying: bool,
}

impl ClassificationStats {
    #[must_use]
    pub fn from_items(items: &[HotSearchItem], classifying: bool) -> Self {
        let total = items.len();
        let pending = items
            .iter()
            .filter(|item| {
                matches!(
                    item.category,
                    Some(Category::Pending | Category::Evaluating)
                )
            })
            .count();
        let classified = items
            .iter()
            .filter(|item| item.category.is_some_and(Category::is_topic))
            .count();
        let classified_percentage = if total == 0 {
            0
        } else {
            classified * 100 / total
        };

        Self {
            total,
            pending,
            classified,
            classified_percentage,
            classifying,
        }
    }
}

/// Most recent capture times, overall and per platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastUpdate {
    pub last_update: DateTime<Utc>,
    /// Keyed by lower-case platform slug.
    pub platforms: std::collections::BTreeMap<String, DateTime<Utc>>,
}

impl LastUpdate {
    /// `overall` falls back to `now` when nothing has been stored yet.
    #[must_use]
    pub fn new(
        overall: Option<DateTime<Utc>>,
        per_platform: &std::collections::BTreeMap<Platform, DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            last_update: overall.unwrap_or(now),
            platforms: per_platform
                .iter()
                .map(|(platform, at)| (platform.slug().to_owned(), *at))
                .collect(),
        }
    }
}
