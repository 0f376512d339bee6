use chrono::Utc;
use hotsearch_core::Platform;
use serde_json::json;

use super::*;

#[test]
fn parse_heat_accepts_numbers() {
    assert_eq!(parse_heat(&json!(12_345)), 12_345);
    assert_eq!(parse_heat(&json!(99.9)), 99);
    assert_eq!(parse_heat(&json!(-4)), 0);
    assert_eq!(parse_heat(&json!(null)), 0);
}

#[test]
fn parse_heat_text_applies_chinese_units() {
    assert_eq!(parse_heat_text("12.5万"), 125_000);
    assert_eq!(parse_heat_text("3千"), 3_000);
    assert_eq!(parse_heat_text("1.5亿"), 150_000_000);
    assert_eq!(parse_heat_text("热度 4,521,003"), 4_521_003);
    assert_eq!(parse_heat_text("hot"), 0);
}

#[test]
fn listable_title_rejects_chrome() {
    assert!(is_listable_title("台风登陆浙江"));
    assert!(!is_listable_title("   "));
    assert!(!is_listable_title("42"));
    assert!(!is_listable_title("微博热搜榜"));
    assert!(!is_listable_title("今日最高排名 3"));
}

#[test]
fn payload_accepts_bare_and_wrapped_lists() {
    let bare: FeedPayload =
        serde_json::from_value(json!([{ "title": "a", "heat": 1 }])).expect("bare list");
    assert_eq!(bare.into_entries().len(), 1);

    let wrapped: FeedPayload =
        serde_json::from_value(json!({ "data": [{ "word": "b", "hot": "2万" }] }))
            .expect("wrapped list");
    let entries = wrapped.into_entries();
    assert_eq!(entries[0].title, "b");

    let items: FeedPayload =
        serde_json::from_value(json!({ "items": [{ "name": "c" }] })).expect("items list");
    assert_eq!(items.into_entries()[0].title, "c");
}

#[test]
fn entries_to_items_assigns_ranks_after_filtering() {
    let payload: FeedPayload = serde_json::from_value(json!([
        { "title": "热搜榜" },
        { "title": "first topic", "heat": "1万", "url": "https://example.com/1" },
        { "title": "second topic", "heat": 500, "url": "javascript:void(0)" },
        { "title": "third topic" }
    ]))
    .expect("payload");

    let items = entries_to_items(payload.into_entries(), Platform::Weibo, 2, Utc::now());

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "first topic");
    assert_eq!(items[0].rank, 1);
    assert_eq!(items[0].heat, 10_000);
    assert_eq!(items[0].url.as_deref(), Some("https://example.com/1"));
    assert_eq!(items[1].rank, 2);
    assert!(items[1].url.is_none());
    assert!(items.iter().all(|i| i.platform == Platform::Weibo));
}
