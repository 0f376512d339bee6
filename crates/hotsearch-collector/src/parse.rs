//! Decoding of JSON hot-search feeds into [`HotSearchItem`]s.
//!
//! Feeds come in a few shapes: a bare array of entries, or an object that
//! wraps the array under `data`, `items`, or `list`. Entry field names vary
//! between providers, so each field accepts the common aliases.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use hotsearch_core::{HotSearchItem, Platform};
use regex::Regex;
use serde::Deserialize;

static HEAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*([万千亿])?").expect("valid heat regex")
});

/// Titles that are list chrome rather than topics.
const NOISE_FRAGMENTS: &[&str] = &["排名", "热搜榜", "跳转", "在榜", "今日最高排名"];

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum FeedPayload {
    List(Vec<FeedEntry>),
    Wrapped {
        #[serde(alias = "items", alias = "list")]
        data: Vec<FeedEntry>,
    },
}

impl FeedPayload {
    pub(crate) fn into_entries(self) -> Vec<FeedEntry> {
        match self {
            FeedPayload::List(entries) | FeedPayload::Wrapped { data: entries } => entries,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeedEntry {
    #[serde(alias = "word", alias = "name", alias = "keyword")]
    pub title: String,
    #[serde(default, alias = "hot", alias = "hot_value", alias = "num")]
    pub heat: Option<serde_json::Value>,
    #[serde(default, alias = "link")]
    pub url: Option<String>,
}

/// Parses a heat value that may be a JSON number or a display string such as
/// `"12.3万"`. Unparseable or negative values yield `0`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn parse_heat(value: &serde_json::Value) -> i64 {
    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0)
            .max(0),
        serde_json::Value::String(s) => parse_heat_text(s),
        _ => 0,
    }
}

/// Parses display heat text. `万` multiplies by 10⁴, `千` by 10³, `亿` by 10⁸.
#[must_use]
pub fn parse_heat_text(text: &str) -> i64 {
    let compact: String = text.chars().filter(|c| *c != ',').collect();
    let Some(caps) = HEAT_RE.captures(&compact) else {
        return 0;
    };
    let Ok(number) = caps[1].parse::<f64>() else {
        return 0;
    };
    let multiplier = match caps.get(2).map(|m| m.as_str()) {
        Some("亿") => 100_000_000.0,
        Some("万") => 10_000.0,
        Some("千") => 1_000.0,
        _ => 1.0,
    };
    #[allow(clippy::cast_possible_truncation)]
    let heat = (number * multiplier) as i64;
    heat.max(0)
}

/// `true` when a title looks like a real topic rather than list chrome.
#[must_use]
pub fn is_listable_title(title: &str) -> bool {
    let title = title.trim();
    if title.is_empty() || title.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    !NOISE_FRAGMENTS.iter().any(|noise| title.contains(noise))
}

/// Turns feed entries into ranked items, skipping noise titles and capping
/// the list at `max_items`. Ranks are assigned from feed order starting at 1.
pub(crate) fn entries_to_items(
    entries: Vec<FeedEntry>,
    platform: Platform,
    max_items: usize,
    captured_at: DateTime<Utc>,
) -> Vec<HotSearchItem> {
    entries
        .into_iter()
        .filter(|entry| is_listable_title(&entry.title))
        .take(max_items)
        .zip(1_i32..)
        .map(|(entry, rank)| {
            let heat = entry.heat.as_ref().map_or(0, parse_heat);
            let mut item = HotSearchItem::new(entry.title.trim(), platform, heat, rank, captured_at);
            item.url = entry
                .url
                .filter(|url| url.starts_with("http://") || url.starts_with("https://"));
            item
        })
        .collect()
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
