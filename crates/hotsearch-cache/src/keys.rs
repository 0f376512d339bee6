//! Cache key schema.
//!
//! Format: `hotsearch:all` for the aggregate list and
//! `hotsearch:platform:{PLATFORM}` per platform, using the upper-case
//! platform form.

use hotsearch_core::Platform;

const PREFIX: &str = "hotsearch";

pub struct CacheKey;

impl CacheKey {
    /// Aggregate list across every platform.
    #[must_use]
    pub fn all() -> String {
        format!("{PREFIX}:all")
    }

    #[must_use]
    pub fn platform(platform: Platform) -> String {
        format!("{PREFIX}:platform:{}", platform.as_str())
    }

    /// Every key the tier can write.
    #[must_use]
    pub fn every() -> Vec<String> {
        std::iter::once(Self::all())
            .chain(Platform::ALL.into_iter().map(Self::platform))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_formats() {
        assert_eq!(CacheKey::all(), "hotsearch:all");
        assert_eq!(
            CacheKey::platform(Platform::Bilibili),
            "hotsearch:platform:BILIBILI"
        );
    }

    #[test]
    fn every_covers_aggregate_and_each_platform() {
        let keys = CacheKey::every();
        assert_eq!(keys.len(), 1 + Platform::ALL.len());
        assert!(keys.contains(&CacheKey::all()));
        assert!(keys.contains(&CacheKey::platform(Platform::Douyin)));
    }
}
