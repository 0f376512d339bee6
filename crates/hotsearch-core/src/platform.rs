use std::fmt;
use std::str::FromStr;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A source platform whose ranked hot-search list is aggregated.
///
/// The upper-case form (`"WEIBO"`) is the canonical storage and cache-key
/// representation; parsing accepts any case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Platform {
    Weibo,
    Toutiao,
    Bilibili,
    Douyin,
}

impl Platform {
    /// Every platform, in canonical collection order.
    pub const ALL: [Platform; 4] = [
        Platform::Weibo,
        Platform::Toutiao,
        Platform::Bilibili,
        Platform::Douyin,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Weibo => "WEIBO",
            Platform::Toutiao => "TOUTIAO",
            Platform::Bilibili => "BILIBILI",
            Platform::Douyin => "DOUYIN",
        }
    }

    /// Lower-case form used in JSON maps keyed by platform.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Platform::Weibo => "weibo",
            Platform::Toutiao => "toutiao",
            Platform::Bilibili => "bilibili",
            Platform::Douyin => "douyin",
        }
    }

    /// Position of this platform in [`Platform::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Platform::Weibo => 0,
            Platform::Toutiao => 1,
            Platform::Bilibili => 2,
            Platform::Douyin => 3,
        }
    }

    /// Builds the platform's public search URL for `title`.
    #[must_use]
    pub fn search_url(self, title: &str) -> String {
        let encoded = utf8_percent_encode(title, NON_ALPHANUMERIC);
        match self {
            Platform::Weibo => format!("https://s.weibo.com/weibo?q={encoded}"),
            Platform::Toutiao => format!("https://www.toutiao.com/search/?keyword={encoded}"),
            Platform::Bilibili => format!("https://search.bilibili.com/all?keyword={encoded}"),
            Platform::Douyin => format!("https://www.douyin.com/search/{encoded}"),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WEIBO" => Ok(Platform::Weibo),
            "TOUTIAO" => Ok(Platform::Toutiao),
            "BILIBILI" => Ok(Platform::Bilibili),
            "DOUYIN" => Ok(Platform::Douyin),
            _ => Err(CoreError::UnknownPlatform(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_any_case() {
        assert_eq!("weibo".parse::<Platform>(), Ok(Platform::Weibo));
        assert_eq!("Bilibili".parse::<Platform>(), Ok(Platform::Bilibili));
        assert_eq!(" DOUYIN ".parse::<Platform>(), Ok(Platform::Douyin));
    }

    #[test]
    fn rejects_unknown_platform() {
        assert_eq!(
            "zhihu".parse::<Platform>(),
            Err(CoreError::UnknownPlatform("zhihu".to_string()))
        );
    }

    #[test]
    fn index_matches_all_order() {
        for (i, platform) in Platform::ALL.iter().enumerate() {
            assert_eq!(platform.index(), i);
        }
    }

    #[test]
    fn serializes_upper_case() {
        let json = serde_json::to_string(&Platform::Toutiao).expect("serialize");
        assert_eq!(json, "\"TOUTIAO\"");
    }

    #[test]
    fn search_url_percent_encodes_title() {
        let url = Platform::Weibo.search_url("a b");
        assert_eq!(url, "https://s.weibo.com/weibo?q=a%20b");

        let url = Platform::Douyin.search_url("热搜");
        assert!(url.starts_with("https://www.douyin.com/search/%E7%83%AD"));
    }
}
