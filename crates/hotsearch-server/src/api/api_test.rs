use std::time::Duration as StdDuration;

use axum::body::{to_bytes, Body};
use axum::http::Request;
use chrono::{Duration, Utc};
use hotsearch_cache::CacheTier;
use hotsearch_classifier::Classifier;
use hotsearch_collector::CollectorAggregator;
use hotsearch_core::{Category, HotSearchItem, Platform, PoolSizing};
use hotsearch_pipeline::{
    BackgroundPool, ClassificationGate, FreshnessResolver, ItemStore, MemoryItemStore,
};
use tower::ServiceExt;

use super::*;

struct TestApp {
    app: Router,
    cache: CacheTier,
}

fn test_app(store: MemoryItemStore) -> TestApp {
    let cache = hotsearch_cache::in_memory(StdDuration::from_secs(600));
    let store: Arc<dyn ItemStore> = Arc::new(store);
    let resolver = Arc::new(FreshnessResolver::new(
        cache.clone(),
        store,
        Arc::new(CollectorAggregator::new()),
        Arc::new(Classifier::new()),
        Duration::minutes(5),
    ));
    let reader = HotSearchReader::new(
        resolver,
        ClassificationGate::new(),
        BackgroundPool::new(PoolSizing::default()),
        Duration::minutes(10),
        StdDuration::from_millis(1),
    );
    let state = AppState {
        reader,
        health: Arc::new(HealthMonitor::new(3)),
    };
    TestApp {
        app: build_app(state, RateLimitState::per_minute(100)),
        cache,
    }
}

fn classified(title: &str, platform: Platform, rank: i32) -> HotSearchItem {
    HotSearchItem::new(title, platform, 1_000, rank, Utc::now()).with_category(Category::Sports)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json parse")
}

#[test]
fn api_error_codes_map_to_statuses() {
    let cases = [
        ("validation_error", StatusCode::BAD_REQUEST),
        ("bad_request", StatusCode::BAD_REQUEST),
        ("not_found", StatusCode::NOT_FOUND),
        ("rate_limited", StatusCode::TOO_MANY_REQUESTS),
        ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (code, status) in cases {
        let response = ApiError::new("req-1", code, "message").into_response();
        assert_eq!(response.status(), status, "code {code}");
    }
}

#[test]
fn parse_optional_treats_blank_as_absent() {
    let parsed: Option<Platform> = parse_optional("req", "platform", Some("  ")).expect("parse");
    assert_eq!(parsed, None);
    let parsed: Option<Platform> =
        parse_optional("req", "platform", Some("weibo")).expect("parse");
    assert_eq!(parsed, Some(Platform::Weibo));
    assert!(parse_optional::<Platform>("req", "platform", Some("zhihu")).is_err());
}

#[tokio::test]
async fn health_reports_every_platform() {
    let TestApp { app, .. } = test_app(MemoryItemStore::new());

    let response = app.oneshot(get("/api/v1/health")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["data"]["database"], "ok");
    let platforms = json["data"]["platforms"].as_array().expect("platforms");
    assert_eq!(platforms.len(), 4);
    assert!(platforms.iter().all(|p| p["status"] == "DOWN"));
}

#[tokio::test]
async fn platform_health_reflects_cached_data() {
    let TestApp { app, cache } = test_app(MemoryItemStore::new());
    cache
        .cache_platform(
            Platform::Bilibili,
            &[classified("番剧更新", Platform::Bilibili, 1)],
        )
        .await
        .expect("cache");

    let response = app
        .oneshot(get("/api/v1/health/platform/bilibili"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["platform"], "BILIBILI");
    assert_eq!(json["data"]["status"], "UP");
    assert_eq!(json["data"]["dataset_size"], 1);
}

#[tokio::test]
async fn unknown_platform_is_a_validation_error() {
    let TestApp { app, .. } = test_app(MemoryItemStore::new());

    for uri in [
        "/api/v1/hot-search?platform=zhihu",
        "/api/v1/health/platform/zhihu",
    ] {
        let response = app.clone().oneshot(get(uri)).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "validation_error");
    }

    let response = app
        .oneshot(post("/api/v1/cache/clear/zhihu"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_category_is_a_validation_error() {
    let TestApp { app, .. } = test_app(MemoryItemStore::new());

    let response = app
        .oneshot(get("/api/v1/hot-search?category=astrology"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn hot_search_serves_cached_list_sorted_by_rank() {
    let TestApp { app, cache } = test_app(MemoryItemStore::new());
    cache
        .cache_all(&[
            classified("second", Platform::Weibo, 2),
            classified("first", Platform::Weibo, 1),
        ])
        .await
        .expect("cache");

    let response = app
        .oneshot(get("/api/v1/hot-search"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let titles: Vec<&str> = json["data"]
        .as_array()
        .expect("data array")
        .iter()
        .filter_map(|item| item["title"].as_str())
        .collect();
    assert_eq!(titles, ["first", "second"]);
    assert!(json["meta"]["request_id"].is_string());
}

#[tokio::test]
async fn hot_search_filters_by_category() {
    let TestApp { app, cache } = test_app(MemoryItemStore::new());
    let mut tech = HotSearchItem::new("new phone launch", Platform::Weibo, 5, 1, Utc::now());
    tech.category = Some(Category::Tech);
    cache
        .cache_all(&[tech, classified("cup final", Platform::Weibo, 2)])
        .await
        .expect("cache");

    let response = app
        .oneshot(get("/api/v1/hot-search?category=sports"))
        .await
        .expect("response");
    let json = body_json(response).await;
    let data = json["data"].as_array().expect("data array");
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["title"], "cup final");
}

#[tokio::test]
async fn clear_all_empties_every_cache_entry() {
    let TestApp { app, cache } = test_app(MemoryItemStore::new());
    let items = [classified("a", Platform::Weibo, 1)];
    cache.cache_all(&items).await.expect("cache");
    cache
        .cache_platform(Platform::Weibo, &items)
        .await
        .expect("cache");

    let response = app
        .oneshot(post("/api/v1/cache/clear-all"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["cleared"], "all");

    assert_eq!(cache.get_all().await.expect("get"), None);
    assert_eq!(cache.get_platform(Platform::Weibo).await.expect("get"), None);
}

#[tokio::test]
async fn clear_platform_leaves_other_entries() {
    let TestApp { app, cache } = test_app(MemoryItemStore::new());
    cache
        .cache_platform(Platform::Weibo, &[classified("a", Platform::Weibo, 1)])
        .await
        .expect("cache");
    cache
        .cache_platform(Platform::Douyin, &[classified("b", Platform::Douyin, 1)])
        .await
        .expect("cache");

    let response = app
        .oneshot(post("/api/v1/cache/clear/weibo"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["cleared"], "WEIBO");

    assert_eq!(cache.get_platform(Platform::Weibo).await.expect("get"), None);
    assert!(cache
        .get_platform(Platform::Douyin)
        .await
        .expect("get")
        .is_some());
}

#[tokio::test]
async fn search_requires_a_keyword() {
    let TestApp { app, .. } = test_app(MemoryItemStore::new());

    for uri in ["/api/v1/search", "/api/v1/search?keyword=%20"] {
        let response = app.clone().oneshot(get(uri)).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[tokio::test]
async fn search_ranks_matching_titles() {
    let TestApp { app, cache } = test_app(MemoryItemStore::new());
    cache
        .cache_all(&[
            classified("world cup final", Platform::Weibo, 1),
            classified("unrelated", Platform::Weibo, 2),
        ])
        .await
        .expect("cache");

    let response = app
        .oneshot(get("/api/v1/search?keyword=cup"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = json["data"].as_array().expect("data array");
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["title"], "world cup final");
}

#[tokio::test]
async fn classification_stats_count_stored_rows() {
    let store = MemoryItemStore::with_items(vec![
        classified("a", Platform::Weibo, 1),
        HotSearchItem::new("b", Platform::Weibo, 1, 2, Utc::now()).with_category(Category::Pending),
    ]);
    let TestApp { app, .. } = test_app(store);

    let response = app
        .oneshot(get("/api/v1/hot-search/classification-stats"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 2);
    assert_eq!(json["data"]["pending"], 1);
    assert_eq!(json["data"]["classified"], 1);
    assert_eq!(json["data"]["classified_percentage"], 50);
    assert_eq!(json["data"]["classifying"], false);
}

#[tokio::test]
async fn last_update_lists_stored_platforms() {
    let store = MemoryItemStore::with_items(vec![classified("a", Platform::Toutiao, 1)]);
    let TestApp { app, .. } = test_app(store);

    let response = app
        .oneshot(get("/api/v1/hot-search/last-update"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["last_update"].is_string());
    assert!(json["data"]["platforms"]["toutiao"].is_string());
    assert!(json["data"]["platforms"].get("weibo").is_none());
}

#[tokio::test]
async fn refresh_without_collectors_returns_empty_list() {
    let TestApp { app, .. } = test_app(MemoryItemStore::new());

    let response = app
        .oneshot(post("/api/v1/hot-search/refresh?platform=weibo"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn rate_limit_applies_to_api_routes_but_not_health() {
    let cache = hotsearch_cache::in_memory(StdDuration::from_secs(600));
    let store: Arc<dyn ItemStore> = Arc::new(MemoryItemStore::new());
    let resolver = Arc::new(FreshnessResolver::new(
        cache,
        store,
        Arc::new(CollectorAggregator::new()),
        Arc::new(Classifier::new()),
        Duration::minutes(5),
    ));
    let state = AppState {
        reader: HotSearchReader::new(
            resolver,
            ClassificationGate::new(),
            BackgroundPool::new(PoolSizing::default()),
            Duration::minutes(10),
            StdDuration::from_millis(1),
        ),
        health: Arc::new(HealthMonitor::new(3)),
    };
    let app = build_app(state, RateLimitState::per_minute(1));

    let first = app
        .clone()
        .oneshot(get("/api/v1/hot-search/last-update"))
        .await
        .expect("response");
    assert_eq!(first.status(), StatusCode::OK);
    let second = app
        .clone()
        .oneshot(get("/api/v1/hot-search/last-update"))
        .await
        .expect("response");
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

    let health = app.oneshot(get("/api/v1/health")).await.expect("response");
    assert_eq!(health.status(), StatusCode::OK);
}
