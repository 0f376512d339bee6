use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Topic assigned to a hot-search item.
///
/// The first eight variants form the fixed taxonomy; `Society` doubles as the
/// catch-all bucket. The remaining variants are lifecycle sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Politics,
    Military,
    Economy,
    Tech,
    Entertainment,
    Sports,
    Culture,
    Society,
    Pending,
    Evaluating,
    Degraded,
    Other,
}

impl Category {
    /// The fixed topic taxonomy.
    pub const TOPICS: [Category; 8] = [
        Category::Politics,
        Category::Military,
        Category::Economy,
        Category::Tech,
        Category::Entertainment,
        Category::Sports,
        Category::Culture,
        Category::Society,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Politics => "politics",
            Category::Military => "military",
            Category::Economy => "economy",
            Category::Tech => "tech",
            Category::Entertainment => "entertainment",
            Category::Sports => "sports",
            Category::Culture => "culture",
            Category::Society => "society",
            Category::Pending => "pending",
            Category::Evaluating => "evaluating",
            Category::Degraded => "degraded",
            Category::Other => "other",
        }
    }

    /// `true` for members of the topic taxonomy.
    #[must_use]
    pub fn is_topic(self) -> bool {
        Self::TOPICS.contains(&self)
    }

    /// Parses a stored category, mapping anything unrecognised to `Other`.
    #[must_use]
    pub fn from_stored(s: &str) -> Self {
        s.parse().unwrap_or(Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let category = match s.trim().to_ascii_lowercase().as_str() {
            "politics" => Category::Politics,
            "military" => Category::Military,
            "economy" => Category::Economy,
            "tech" => Category::Tech,
            "entertainment" => Category::Entertainment,
            "sports" => Category::Sports,
            "culture" => Category::Culture,
            "society" => Category::Society,
            "pending" => Category::Pending,
            "evaluating" => Category::Evaluating,
            "degraded" => Category::Degraded,
            "other" => Category::Other,
            _ => return Err(CoreError::UnknownCategory(s.to_string())),
        };
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_variant_through_str() {
        for category in Category::TOPICS
            .into_iter()
            .chain([Category::Pending, Category::Evaluating, Category::Degraded, Category::Other])
        {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn sentinels_are_not_topics() {
        assert!(Category::Society.is_topic());
        assert!(!Category::Pending.is_topic());
        assert!(!Category::Degraded.is_topic());
        assert!(!Category::Other.is_topic());
    }

    #[test]
    fn unknown_stored_value_becomes_other() {
        assert_eq!(Category::from_stored("astrology"), Category::Other);
        assert_eq!(Category::from_stored("TECH"), Category::Tech);
    }
}
