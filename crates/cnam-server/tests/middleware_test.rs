//! Tests de middleware.

mod helpers;

use axum::http::StatusCode;
use helpers::TestApp;
use uuid::Uuid;

// === Request ID ===

#[tokio::test]
async fn response_includes_request_id() {
    let app = TestApp::healthy().await;
    let response = app.client.get("/health").await;

    response.assert_header_exists("x-request-id");
}

#[tokio::test]
async fn request_id_is_uuid_v4() {
    let app = TestApp::healthy().await;
    let response = app.client.get("/5551234567").await;

    let id = response.header("x-request-id").unwrap();
    let parsed = Uuid::parse_str(id).unwrap();

    assert_eq!(parsed.get_version_num(), 4);
}

#[tokio::test]
async fn propagates_incoming_request_id() {
    let app = TestApp::healthy().await;
    let custom_id = "my-custom-request-id-12345";

    let response = app
        .client
        .get_with_headers("/health", vec![("x-request-id", custom_id)])
        .await;

    response.assert_header("x-request-id", custom_id);
}

#[tokio::test]
async fn generates_different_ids_for_each_request() {
    let app = TestApp::healthy().await;
    let response1 = app.client.get("/health").await;
    let response2 = app.client.get("/health").await;

    let id1 = response1.header("x-request-id").unwrap();
    let id2 = response2.header("x-request-id").unwrap();

    assert_ne!(id1, id2);
}

#[tokio::test]
async fn generated_id_reaches_provider() {
    let app = TestApp::healthy().await;
    let response = app.client.get("/5551234567").await;

    let id = response.header("x-request-id").unwrap();
    assert_eq!(app.provider.correlation_ids(), vec![id.to_string()]);
}

// === Response Time ===

#[tokio::test]
async fn response_includes_response_time() {
    let app = TestApp::healthy().await;
    let response = app.client.get("/health").await;

    let value = response.header("x-response-time").unwrap();
    let millis = value.strip_suffix("ms").unwrap();
    assert!(millis.parse::<f64>().unwrap() >= 0.0);
}

#[tokio::test]
async fn rejected_requests_carry_both_headers() {
    let app = TestApp::healthy().await;
    let response = app.client.get("/555123456").await;

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_header_exists("x-request-id")
        .assert_header_exists("x-response-time");
}
