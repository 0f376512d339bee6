use dashmap::DashMap;
use hotsearch_core::{Category, HotSearchItem};
use regex::Regex;

use crate::keywords::{
    CULTURE_CUE_PATTERN, CULTURE_KEYWORDS, CULTURE_RELAXED_KEYWORDS, ECONOMY_KEYWORDS,
    ENTERTAINMENT_KEYWORDS, MILITARY_KEYWORDS, MILITARY_RELAXED_KEYWORDS, POLITICS_KEYWORDS,
    SOCIETY_HIGH_IMPACT_KEYWORDS, SOCIETY_KEYWORDS, SPORTS_KEYWORDS, TECH_KEYWORDS,
};

/// Maximum number of characters kept in a memo key.
const CORE_KEY_MAX_CHARS: usize = 20;
/// Best scores below this fall through to the title heuristics.
const MIN_CONFIDENT_SCORE: f64 = 0.8;
/// A society win scoring below this yields to a culture cue in the title.
const SOCIETY_CULTURE_OVERRIDE_SCORE: f64 = 1.8;
const CULTURE_MATCH_BONUS: f64 = 0.5;
/// Heuristic buckets, in characters.
const SHORT_NUMERIC_TITLE_CHARS: usize = 15;
const LONG_TITLE_CHARS: usize = 25;

struct CategoryRule {
    category: Category,
    weight: f64,
    keywords: &'static [&'static str],
    /// Stop scoring once this rule matches at least this many keywords.
    early_stop_matches: Option<usize>,
}

/// Scoring order. Ties keep the earlier rule.
const RULES: [CategoryRule; 8] = [
    CategoryRule {
        category: Category::Military,
        weight: 2.5,
        keywords: MILITARY_KEYWORDS,
        early_stop_matches: Some(3),
    },
    CategoryRule {
        category: Category::Politics,
        weight: 2.5,
        keywords: POLITICS_KEYWORDS,
        early_stop_matches: Some(3),
    },
    CategoryRule {
        category: Category::Tech,
        weight: 2.0,
        keywords: TECH_KEYWORDS,
        early_stop_matches: Some(2),
    },
    CategoryRule {
        category: Category::Economy,
        weight: 1.8,
        keywords: ECONOMY_KEYWORDS,
        early_stop_matches: Some(2),
    },
    CategoryRule {
        category: Category::Sports,
        weight: 1.6,
        keywords: SPORTS_KEYWORDS,
        early_stop_matches: None,
    },
    CategoryRule {
        category: Category::Entertainment,
        weight: 1.6,
        keywords: ENTERTAINMENT_KEYWORDS,
        early_stop_matches: None,
    },
    CategoryRule {
        category: Category::Culture,
        weight: 2.0,
        keywords: CULTURE_KEYWORDS,
        early_stop_matches: None,
    },
    CategoryRule {
        category: Category::Society,
        weight: 0.7,
        keywords: SOCIETY_KEYWORDS,
        early_stop_matches: None,
    },
];

/// Weighted keyword classifier with a concurrent memo.
///
/// The keyword tables are compile-time constants; only the culture cue regex
/// is built at construction. The memo maps a title's core key to the category
/// first computed for it and is never invalidated, so titles differing only in
/// digits or punctuation share one result.
pub struct Classifier {
    culture_cue: Regex,
    memo: DashMap<String, Category>,
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("memo_len", &self.memo.len())
            .finish_non_exhaustive()
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    #[must_use]
    pub fn new() -> Self {
        Self {
            culture_cue: Regex::new(CULTURE_CUE_PATTERN).expect("valid culture cue regex"),
            memo: DashMap::new(),
        }
    }

    /// Number of memoised title keys.
    #[must_use]
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    /// Assigns a topic category to `title`.
    ///
    /// Empty titles are `society`. Otherwise the memo is consulted first; on a
    /// miss the title is scored and the result memoised.
    #[must_use]
    pub fn classify_title(&self, title: &str) -> Category {
        if title.trim().is_empty() {
            return Category::Society;
        }

        let key = core_key(title);
        if let Some(hit) = self.memo.get(&key) {
            let category = *hit;
            tracing::trace!(title, %category, "classifier: memo hit");
            return category;
        }

        let category = self.score(title);
        self.memo.insert(key, category);
        category
    }

    /// Classifies every item whose category is unset, `pending`, or `other`.
    /// Items already carrying any other category are left untouched.
    #[must_use]
    pub fn classify_items(&self, mut items: Vec<HotSearchItem>) -> Vec<HotSearchItem> {
        let mut classified = 0usize;
        for item in items.iter_mut().filter(|item| item.needs_classification()) {
            item.category = Some(self.classify_title(&item.title));
            classified += 1;
        }
        tracing::debug!(
            classified,
            total = items.len(),
            "classifier: classification completed"
        );
        items
    }

    fn score(&self, title: &str) -> Category {
        let culture_cue = self.culture_cue.is_match(title);

        let mut best: Option<Category> = None;
        let mut max_score = 0.0_f64;
        for rule in &RULES {
            let matched: Vec<&str> = rule
                .keywords
                .iter()
                .copied()
                .filter(|keyword| title.contains(keyword))
                .collect();
            let match_count = matched.len();

            if rule.category == Category::Society
                && match_count < 2
                && !matched
                    .iter()
                    .any(|keyword| SOCIETY_HIGH_IMPACT_KEYWORDS.contains(keyword))
            {
                continue;
            }

            #[allow(clippy::cast_precision_loss)]
            let mut score = match_count as f64 * rule.weight;
            if rule.category == Category::Culture && match_count > 0 {
                score += CULTURE_MATCH_BONUS;
            }

            if score > max_score {
                max_score = score;
                best = Some(rule.category);
                tracing::trace!(
                    title,
                    category = %rule.category,
                    match_count,
                    score,
                    "classifier: new best category"
                );
            }

            if rule
                .early_stop_matches
                .is_some_and(|threshold| match_count >= threshold)
            {
                break;
            }
        }

        if best == Some(Category::Society) && max_score < SOCIETY_CULTURE_OVERRIDE_SCORE && culture_cue
        {
            best = Some(Category::Culture);
        }

        match best {
            Some(category) if max_score >= MIN_CONFIDENT_SCORE => category,
            _ => Self::fallback(title, culture_cue),
        }
    }

    fn fallback(title: &str, culture_cue: bool) -> Category {
        let contains_any = |keywords: &[&str]| keywords.iter().any(|k| title.contains(k));
        let char_len = title.chars().count();

        if contains_any(MILITARY_RELAXED_KEYWORDS) {
            Category::Military
        } else if culture_cue || contains_any(CULTURE_RELAXED_KEYWORDS) {
            Category::Culture
        } else if title.chars().any(|c| c.is_ascii_digit()) && char_len < SHORT_NUMERIC_TITLE_CHARS {
            Category::Tech
        } else if char_len > LONG_TITLE_CHARS {
            Category::Entertainment
        } else {
            Category::Society
        }
    }
}

/// Memo key for `title`: digits, whitespace and ASCII punctuation removed,
/// capped at 20 characters.
#[must_use]
pub fn core_key(title: &str) -> String {
    title
        .chars()
        .filter(|c| !(c.is_ascii_digit() || c.is_whitespace() || c.is_ascii_punctuation()))
        .take(CORE_KEY_MAX_CHARS)
        .collect()
}

#[cfg(test)]
#[path = "classifier_test.rs"]
mod tests;
