//! Integration tests for the shopping assistant endpoint.
//!
//! The test server has no language model key, so the assistant runs in
//! demo mode and never leaves the process.
//!
//! Run with: cargo test -p izeshop-integration-tests

#![allow(clippy::unwrap_used)]

use izeshop_integration_tests::{TestContext, TestOptions};
use izeshop_storefront::services::chat::DEMO_MODE_REPLY;
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn test_demo_mode_reply() {
    let ctx = TestContext::seeded().await;

    let resp = ctx
        .client
        .post(ctx.url("/api/chat"))
        .json(&json!({ "message": "Do you sell headphones?" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["reply"], DEMO_MODE_REPLY);
}

#[tokio::test]
async fn test_blank_message_is_rejected() {
    let ctx = TestContext::new().await;

    for request in [json!({ "message": "   " }), json!({})] {
        let resp = ctx
            .client
            .post(ctx.url("/api/chat"))
            .json(&request)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = resp.json().await.unwrap();
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn test_chat_is_rate_limited_after_burst() {
    let ctx = TestContext::start(TestOptions {
        rate_limit: true,
        ..TestOptions::default()
    })
    .await;

    let mut statuses = Vec::new();
    for _ in 0..12 {
        let resp = ctx
            .client
            .post(ctx.url("/api/chat"))
            .json(&json!({ "message": "Any discounts today?" }))
            .send()
            .await
            .unwrap();
        statuses.push(resp.status());
    }

    assert!(
        statuses.iter().take(10).all(|s| *s == StatusCode::OK),
        "{statuses:?}"
    );
    // One token comes back every 3 seconds; the last call is always over
    assert_eq!(statuses.last(), Some(&StatusCode::TOO_MANY_REQUESTS), "{statuses:?}");
}
