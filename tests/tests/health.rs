//! Health endpoint tests.

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::setup::TestContext;
use telemetry::health;

fn server(ctx: &TestContext) -> TestServer {
    TestServer::new(ctx.router.clone()).expect("Failed to create test server")
}

#[tokio::test]
async fn test_health_reports_components() {
    let ctx = TestContext::new();
    let server = server(&ctx);

    let response = server.get("/health").await;
    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert!(body["status"].is_string());
    assert!(body["directory_connected"].is_boolean());
    assert!(body["store_connected"].is_boolean());
}

#[tokio::test]
async fn test_liveness_is_always_ok() {
    let ctx = TestContext::new();
    let server = server(&ctx);

    let response = server.get("/health/live").await;
    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_readiness_follows_store_health() {
    let ctx = TestContext::new();
    let server = server(&ctx);

    // The registry is process-global; mark the store healthy the way
    // startup wiring does.
    health().store.set_healthy();

    let response = server.get("/health/ready").await;
    response.assert_status(StatusCode::OK);
}
