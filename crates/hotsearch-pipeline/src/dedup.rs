use std::collections::{HashMap, HashSet};

use hotsearch_core::{HotSearchItem, Platform};

fn title_key(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Collapses items with the same trimmed, lower-cased title, keeping the one
/// with the highest heat. Survivors stay in first-seen order.
#[must_use]
pub fn deduplicate_by_title(items: Vec<HotSearchItem>) -> Vec<HotSearchItem> {
    let mut slots: HashMap<String, usize> = HashMap::with_capacity(items.len());
    let mut kept: Vec<HotSearchItem> = Vec::with_capacity(items.len());

    for item in items {
        let key = title_key(&item.title);
        match slots.get(&key) {
            Some(&slot) => {
                if item.heat > kept[slot].heat {
                    kept[slot] = item;
                }
            }
            None => {
                slots.insert(key, kept.len());
                kept.push(item);
            }
        }
    }
    kept
}

/// Keeps the first item for each (title, url) pair.
#[must_use]
pub fn deduplicate_by_title_and_url(items: Vec<HotSearchItem>) -> Vec<HotSearchItem> {
    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| {
            seen.insert((
                title_key(&item.title),
                item.url.as_deref().unwrap_or_default().trim().to_owned(),
            ))
        })
        .collect()
}

/// Groups items by platform in first-seen platform order and deduplicates each
/// group by title independently.
#[must_use]
pub fn deduplicate_by_platform(items: Vec<HotSearchItem>) -> Vec<HotSearchItem> {
    let mut order: Vec<Platform> = Vec::new();
    let mut groups: HashMap<Platform, Vec<HotSearchItem>> = HashMap::new();
    for item in items {
        if !groups.contains_key(&item.platform) {
            order.push(item.platform);
        }
        groups.entry(item.platform).or_default().push(item);
    }

    order
        .into_iter()
        .filter_map(|platform| groups.remove(&platform))
        .flat_map(deduplicate_by_title)
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn item(title: &str, platform: Platform, heat: i64) -> HotSearchItem {
        HotSearchItem::new(title, platform, heat, 1, Utc::now())
    }

    #[test]
    fn keeps_highest_heat_in_first_seen_position() {
        let items = vec![
            item("Alpha", Platform::Weibo, 10),
            item("beta", Platform::Weibo, 5),
            item(" alpha ", Platform::Douyin, 50),
            item("ALPHA", Platform::Toutiao, 20),
        ];

        let deduped = deduplicate_by_title(items);

        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].heat, 50);
        assert_eq!(deduped[0].platform, Platform::Douyin);
        assert_eq!(deduped[1].title, "beta");
    }

    #[test]
    fn equal_heat_keeps_the_first_item() {
        let deduped = deduplicate_by_title(vec![
            item("same", Platform::Weibo, 7),
            item("same", Platform::Douyin, 7),
        ]);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].platform, Platform::Weibo);
    }

    #[test]
    fn title_and_url_pairs_are_distinct() {
        let mut a = item("t", Platform::Weibo, 1);
        a.url = Some("https://a".to_owned());
        let mut b = item("t", Platform::Weibo, 9);
        b.url = Some("https://b".to_owned());
        let mut a_again = item("T", Platform::Douyin, 99);
        a_again.url = Some("https://a".to_owned());

        let deduped = deduplicate_by_title_and_url(vec![a, b, a_again]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].heat, 1);
        assert_eq!(deduped[1].heat, 9);
    }

    #[test]
    fn platform_groups_are_deduplicated_separately() {
        let deduped = deduplicate_by_platform(vec![
            item("x", Platform::Douyin, 1),
            item("x", Platform::Weibo, 2),
            item("x", Platform::Douyin, 3),
            item("y", Platform::Weibo, 4),
        ]);

        let summary: Vec<(Platform, &str, i64)> = deduped
            .iter()
            .map(|i| (i.platform, i.title.as_str(), i.heat))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Platform::Douyin, "x", 3),
                (Platform::Weibo, "x", 2),
                (Platform::Weibo, "y", 4),
            ]
        );
    }
}
