//! Tests de GET /{number} y GET /provider/{number}.

mod helpers;

use axum::http::StatusCode;
use helpers::{TestApp, assert_lookup_result, assert_unknown_result, key};
use serde_json::Value;

#[tokio::test]
async fn miss_queries_provider_and_caches_result() {
    let app = TestApp::healthy().await;

    let response = app.client.get("/+15551234567").await;

    response
        .assert_status(StatusCode::OK)
        .assert_content_type_contains("application/json");
    assert_lookup_result(&response.json::<Value>(), "SAMPLE", "5551234567");
    assert_eq!(app.provider.calls(), 1);

    let cached = app.wait_until_stored(&key("5551234567")).await;
    assert_eq!(cached.name, "SAMPLE");
    assert_eq!(app.backend.entry_count().await, 1);
}

#[tokio::test]
async fn hit_is_served_without_provider() {
    let app = TestApp::healthy().await;

    app.client.get("/5551234567").await;
    app.wait_until_stored(&key("5551234567")).await;

    // a different provider answer must not leak through
    app.provider.set_name("CHANGED");
    let response = app.client.get("/1-555-123-4567").await;

    response.assert_status(StatusCode::OK);
    assert_lookup_result(&response.json::<Value>(), "SAMPLE", "5551234567");
    assert_eq!(app.provider.calls(), 1);
}

#[tokio::test]
async fn invalid_number_is_rejected_without_side_effects() {
    let app = TestApp::healthy().await;

    let response = app.client.get("/555123456").await;

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_content_type_contains("text/plain");
    assert_eq!(response.text(), "Invalid NANP number");
    assert_eq!(app.provider.calls(), 0);

    app.settle().await;
    assert_eq!(app.backend.entry_count().await, 0);
}

#[tokio::test]
async fn invalid_exchange_is_rejected() {
    let app = TestApp::healthy().await;

    // NXX starting with 1
    app.client
        .get("/2121234567")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(app.provider.calls(), 0);
}

#[tokio::test]
async fn provider_failure_returns_unknown_and_is_not_cached() {
    let app = TestApp::healthy().await;
    app.provider.set_failing(true);

    let response = app.client.get("/2125550100").await;

    response.assert_status(StatusCode::OK);
    assert_unknown_result(&response.json::<Value>(), "2125550100");

    app.settle().await;
    assert!(app.stored(&key("2125550100")).await.is_none());
}

#[tokio::test]
async fn unknown_provider_answer_is_not_cached() {
    let app = TestApp::healthy().await;
    app.provider.set_name("unknown");

    app.client
        .get("/2125550100")
        .await
        .assert_status(StatusCode::OK);
    app.client.get("/2125550100").await;

    app.settle().await;
    assert!(app.stored(&key("2125550100")).await.is_none());
    assert_eq!(app.provider.calls(), 2);
}

#[tokio::test]
async fn request_id_is_forwarded_to_provider() {
    let app = TestApp::healthy().await;

    let response = app
        .client
        .get_with_headers("/5551234567", vec![("x-request-id", "trace-abc")])
        .await;

    response.assert_header("x-request-id", "trace-abc");
    assert_eq!(app.provider.correlation_ids(), vec!["trace-abc".to_string()]);
}

#[tokio::test]
async fn provider_route_skips_cache_read_but_still_writes() {
    let app = TestApp::healthy().await;

    let response = app.client.get("/provider/5551234567").await;
    response.assert_status(StatusCode::OK);
    assert_eq!(app.wait_until_stored(&key("5551234567")).await.name, "SAMPLE");

    // the cached value is ignored on this route
    app.provider.set_name("FRESH");
    let response = app.client.get("/provider/5551234567").await;

    assert_lookup_result(&response.json::<Value>(), "FRESH", "5551234567");
    assert_eq!(app.provider.calls(), 2);

    // first writer wins
    app.settle().await;
    assert_eq!(app.stored(&key("5551234567")).await.unwrap().name, "SAMPLE");
}

#[tokio::test]
async fn provider_route_rejects_invalid_number() {
    let app = TestApp::healthy().await;

    app.client
        .get("/provider/12345")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(app.provider.calls(), 0);
}
