//! Integration tests for liveness, readiness and response headers.
//!
//! Run with: cargo test -p izeshop-integration-tests

#![allow(clippy::unwrap_used)]

use izeshop_integration_tests::TestContext;
use reqwest::StatusCode;

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::new().await;

    let resp = ctx.client.get(ctx.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");

    let resp = ctx.client.get(ctx.url("/health/ready")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_security_and_request_id_headers() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .get(ctx.url("/api/products"))
        .header("x-request-id", "client-supplied-id")
        .send()
        .await
        .unwrap();

    let headers = resp.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-request-id"], "client-supplied-id");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let ctx = TestContext::new().await;

    let resp = ctx.client.get(ctx.url("/api/nope")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
