//! Integration tests for `FallbackCollector` and `CollectorAggregator`.
//!
//! Uses `wiremock` to stand up local feed servers so no real network traffic
//! is made. Covers the primary-source happy path, failover to backups, the
//! all-empty and all-failed outcomes, and per-platform isolation.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hotsearch_collector::{
    CollectorAggregator, CollectorError, FallbackCollector, FeedClient, PlatformCollector,
};
use hotsearch_core::Platform;

/// Builds a `FeedClient` suitable for tests: 5-second timeout, no retries.
fn test_client() -> FeedClient {
    FeedClient::new(5, "hotsearch-test/0.1", 0, 0, 50).expect("failed to build test FeedClient")
}

fn feed_json(titles: &[&str]) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = titles
        .iter()
        .enumerate()
        .map(|(i, t)| json!({ "title": t, "heat": format!("{}万", 10 - i) }))
        .collect();
    json!({ "data": entries })
}

async fn mount_feed(server: &MockServer, route: &str, status: u16, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(&body))
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// FallbackCollector
// ---------------------------------------------------------------------------

#[tokio::test]
async fn primary_source_items_are_ranked_and_tagged() {
    let server = MockServer::start().await;
    mount_feed(&server, "/weibo", 200, feed_json(&["台风登陆", "新品发布会"])).await;

    let collector = FallbackCollector::new(
        Platform::Weibo,
        test_client(),
        vec![format!("{}/weibo", server.uri())],
    );
    let items = collector.fetch(false).await.expect("fetch should succeed");

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].rank, 1);
    assert_eq!(items[0].heat, 100_000);
    assert_eq!(items[1].rank, 2);
    assert!(items
        .iter()
        .all(|i| i.actual_source.as_deref() == Some("primary")));
}

#[tokio::test]
async fn failing_primary_falls_back_to_first_non_empty_backup() {
    let server = MockServer::start().await;
    mount_feed(&server, "/primary", 500, json!({})).await;
    mount_feed(&server, "/backup-empty", 200, json!([])).await;
    mount_feed(&server, "/backup-full", 200, feed_json(&["backup topic"])).await;

    let collector = FallbackCollector::new(
        Platform::Toutiao,
        test_client(),
        vec![
            format!("{}/primary", server.uri()),
            format!("{}/backup-empty", server.uri()),
            format!("{}/backup-full", server.uri()),
        ],
    );
    let items = collector.fetch(false).await.expect("fetch should succeed");

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "backup topic");
    assert_eq!(items[0].actual_source.as_deref(), Some("backup-2"));
}

#[tokio::test]
async fn all_sources_empty_returns_empty_list() {
    let server = MockServer::start().await;
    mount_feed(&server, "/a", 200, json!([])).await;
    mount_feed(&server, "/b", 200, json!({ "items": [] })).await;

    let collector = FallbackCollector::new(
        Platform::Bilibili,
        test_client(),
        vec![format!("{}/a", server.uri()), format!("{}/b", server.uri())],
    );
    let items = collector.fetch(false).await.expect("empty is not an error");
    assert!(items.is_empty());
}

#[tokio::test]
async fn all_sources_failing_is_reported_as_exhausted() {
    let server = MockServer::start().await;
    mount_feed(&server, "/a", 404, json!({})).await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let collector = FallbackCollector::new(
        Platform::Douyin,
        test_client(),
        vec![format!("{}/a", server.uri()), format!("{}/b", server.uri())],
    );
    let result = collector.fetch(false).await;

    assert!(
        matches!(
            result,
            Err(CollectorError::SourcesExhausted {
                platform: Platform::Douyin,
                ..
            })
        ),
        "expected SourcesExhausted, got: {result:?}"
    );
}

#[tokio::test]
async fn no_sources_configured_is_an_error() {
    let collector = FallbackCollector::new(Platform::Weibo, test_client(), vec![]);
    let result = collector.fetch(false).await;
    assert!(matches!(result, Err(CollectorError::NoSources { .. })));
}

#[tokio::test]
async fn force_refresh_sends_no_cache_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weibo"))
        .and(header("cache-control", "no-cache"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_json(&["fresh topic"])))
        .mount(&server)
        .await;

    let collector = FallbackCollector::new(
        Platform::Weibo,
        test_client(),
        vec![format!("{}/weibo", server.uri())],
    );
    let items = collector.fetch(true).await.expect("fetch should succeed");
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn transient_errors_are_retried_before_failing_over() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_feed(&server, "/flaky", 200, feed_json(&["after retry"])).await;

    let client = FeedClient::new(5, "hotsearch-test/0.1", 1, 0, 50).expect("client");
    let collector = FallbackCollector::new(
        Platform::Weibo,
        client,
        vec![format!("{}/flaky", server.uri())],
    );
    let items = collector.fetch(false).await.expect("retry should succeed");
    assert_eq!(items[0].title, "after retry");
    assert_eq!(items[0].actual_source.as_deref(), Some("primary"));
}

// ---------------------------------------------------------------------------
// CollectorAggregator
// ---------------------------------------------------------------------------

#[tokio::test]
async fn aggregator_isolates_platform_failures() {
    let server = MockServer::start().await;
    mount_feed(&server, "/weibo", 200, feed_json(&["w1", "w2"])).await;
    mount_feed(&server, "/toutiao", 404, json!({})).await;

    let client = test_client();
    let aggregator = CollectorAggregator::new()
        .with_collector(Arc::new(FallbackCollector::new(
            Platform::Weibo,
            client.clone(),
            vec![format!("{}/weibo", server.uri())],
        )))
        .with_collector(Arc::new(FallbackCollector::new(
            Platform::Toutiao,
            client,
            vec![format!("{}/toutiao", server.uri())],
        )));

    let items = aggregator.collect_all(false).await;
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.platform == Platform::Weibo));

    assert!(aggregator
        .collect_by_platform(Platform::Toutiao, false)
        .await
        .is_empty());
}
