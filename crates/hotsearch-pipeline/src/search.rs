//! Keyword search over an already-resolved item list.

use chrono::{DateTime, Duration, Utc};
use hotsearch_core::HotSearchItem;

pub const MAX_SEARCH_RESULTS: usize = 50;

const EXACT_SCORE: u32 = 100;
const PREFIX_SCORE: u32 = 80;
const CONTAINS_SCORE: u32 = 60;
const FRAGMENT_BASE_SCORE: u32 = 30;
const FRAGMENT_SCORE: u32 = 10;
const HIGH_HEAT: i64 = 1_000_000;
const HIGH_HEAT_BONUS: u32 = 10;
const RECENT_BONUS: u32 = 5;
const MIN_FRAGMENT_CHARS: usize = 2;

fn is_separator(c: char) -> bool {
    c.is_whitespace()
        || c.is_ascii_punctuation()
        || matches!(
            c,
            '，' | '。' | '、' | '；' | '：' | '？' | '！' | '“' | '”' | '‘' | '’' | '（' | '）'
                | '《' | '》' | '【' | '】' | '·' | '…'
        )
}

/// Scores items against `keyword` and returns the best matches, highest score
/// first, at most [`MAX_SEARCH_RESULTS`].
#[must_use]
pub fn search_by_keyword(
    items: &[HotSearchItem],
    keyword: &str,
    now: DateTime<Utc>,
) -> Vec<HotSearchItem> {
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return Vec::new();
    }
    let fragments: Vec<&str> = keyword
        .split(is_separator)
        .filter(|fragment| fragment.chars().count() >= MIN_FRAGMENT_CHARS)
        .collect();

    let mut scored: Vec<(u32, &HotSearchItem)> = items
        .iter()
        .map(|item| (score(item, &keyword, &fragments, now), item))
        .filter(|(score, _)| *score > 0)
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .take(MAX_SEARCH_RESULTS)
        .map(|(_, item)| item.clone())
        .collect()
}

fn score(item: &HotSearchItem, keyword: &str, fragments: &[&str], now: DateTime<Utc>) -> u32 {
    let title = item.title.to_lowercase();

    let mut score = if title == keyword {
        EXACT_SCORE
    } else if title.starts_with(keyword) {
        PREFIX_SCORE
    } else if title.contains(keyword) {
        CONTAINS_SCORE
    } else {
        let hits = fragments
            .iter()
            .filter(|fragment| title.contains(**fragment))
            .count();
        if hits == 0 {
            return 0;
        }
        let hits = u32::try_from(hits).unwrap_or(u32::MAX);
        FRAGMENT_BASE_SCORE.saturating_add(FRAGMENT_SCORE.saturating_mul(hits))
    };

    if item.heat > HIGH_HEAT {
        score += HIGH_HEAT_BONUS;
    }
    if item.captured_at > now - Duration::hours(1) {
        score += RECENT_BONUS;
    }
    score
}
