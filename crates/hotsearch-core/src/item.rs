use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{Category, Platform};

/// Title prefix a fallback source puts on rows it could not fetch fresh.
pub const DEGRADED_TITLE_PREFIX: &str = "【降级数据】";

/// One ranked entry of a platform's hot-search list.
///
/// Created by a collector at fetch time, then filled in downstream: the
/// classifier sets `category` and URL repair sets `url`. A later successful
/// fetch supersedes the whole platform snapshot rather than updating rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotSearchItem {
    /// Durable-store id; `None` until the item has been persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub platform: Platform,
    /// Popularity score, never negative.
    pub heat: i64,
    /// 1 = top of the list.
    pub rank: i32,
    pub captured_at: DateTime<Utc>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub url: Option<String>,
    /// Which source in the collector's fallback chain produced the row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded_reason: Option<String>,
}

impl HotSearchItem {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        platform: Platform,
        heat: i64,
        rank: i32,
        captured_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            platform,
            heat: heat.max(0),
            rank,
            captured_at,
            category: None,
            url: None,
            actual_source: None,
            degraded_reason: None,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// `true` when the classifier is allowed to (re)assign the category:
    /// unset, `pending`, or `other`.
    #[must_use]
    pub fn needs_classification(&self) -> bool {
        matches!(
            self.category,
            None | Some(Category::Pending | Category::Other)
        )
    }

    /// `true` when the title carries the degraded-data marker.
    #[must_use]
    pub fn has_degraded_marker(&self) -> bool {
        self.title.starts_with(DEGRADED_TITLE_PREFIX)
    }

    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.captured_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> HotSearchItem {
        HotSearchItem::new("title", Platform::Weibo, 10, 1, Utc::now())
    }

    #[test]
    fn negative_heat_is_clamped() {
        let item = HotSearchItem::new("t", Platform::Weibo, -5, 1, Utc::now());
        assert_eq!(item.heat, 0);
    }

    #[test]
    fn needs_classification_only_for_unset_pending_and_other() {
        assert!(item().needs_classification());
        assert!(item().with_category(Category::Pending).needs_classification());
        assert!(item().with_category(Category::Other).needs_classification());
        assert!(!item().with_category(Category::Tech).needs_classification());
        assert!(!item().with_category(Category::Evaluating).needs_classification());
        assert!(!item().with_category(Category::Degraded).needs_classification());
    }

    #[test]
    fn detects_degraded_marker() {
        let mut degraded = item();
        degraded.title = format!("{DEGRADED_TITLE_PREFIX}旧数据");
        assert!(degraded.has_degraded_marker());
        assert!(!item().has_degraded_marker());
    }

    #[test]
    fn serializes_category_lower_case_and_skips_missing_id() {
        let json = serde_json::to_value(item().with_category(Category::Sports)).expect("serialize");
        assert_eq!(json["category"], "sports");
        assert_eq!(json["platform"], "WEIBO");
        assert!(json.get("id").is_none());
    }
}
