//! Integration tests for the cart and checkout flow.
//!
//! Run with: cargo test -p izeshop-integration-tests

#![allow(clippy::unwrap_used)]

use izeshop_integration_tests::TestContext;
use reqwest::StatusCode;
use serde_json::{Value, json};

async fn cart(ctx: &TestContext) -> Vec<Value> {
    let (status, body) = ctx.get_json("/api/cart").await;
    assert_eq!(status, StatusCode::OK);
    body.as_array().unwrap().clone()
}

#[tokio::test]
async fn test_add_update_remove() {
    let ctx = TestContext::seeded().await;
    assert!(cart(&ctx).await.is_empty());

    ctx.add_to_cart(1, 1).await;
    ctx.add_to_cart(4, 2).await;

    let lines = cart(&ctx).await;
    assert_eq!(lines.len(), 2);
    assert_eq!(lines.first().unwrap()["name"], "Acoustic Pro Max Teste");
    assert_eq!(lines.last().unwrap()["quantity"], 2);

    let resp = ctx
        .client
        .put(ctx.url("/api/cart/0"))
        .json(&json!({ "quantity": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Cart updated");

    let (_, summary) = ctx.get_json("/api/cart/summary").await;
    assert_eq!(summary["itemCount"], 5);
    assert_eq!(summary["subtotalFormatted"], "R$\u{a0}1.047,00");

    let resp = ctx
        .client
        .delete(ctx.url("/api/cart/0"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let lines = cart(&ctx).await;
    assert_eq!(lines.len(), 1);
    assert_eq!(lines.first().unwrap()["name"], "Urban Nomad Bag");
}

#[tokio::test]
async fn test_same_product_twice_makes_two_lines() {
    let ctx = TestContext::seeded().await;

    ctx.add_to_cart(2, 1).await;
    ctx.add_to_cart(2, 1).await;

    assert_eq!(cart(&ctx).await.len(), 2);
}

#[tokio::test]
async fn test_invalid_index_and_quantity() {
    let ctx = TestContext::seeded().await;
    ctx.add_to_cart(1, 1).await;

    for path in ["/api/cart/5", "/api/cart/first"] {
        let resp = ctx
            .client
            .put(ctx.url(path))
            .json(&json!({ "quantity": 2 }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{path}");
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["message"], "Invalid index");
    }

    let resp = ctx
        .client
        .put(ctx.url("/api/cart/0"))
        .json(&json!({ "quantity": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Invalid quantity");

    let resp = ctx
        .client
        .delete(ctx.url("/api/cart/7"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // The line is untouched
    let lines = cart(&ctx).await;
    assert_eq!(lines.first().unwrap()["quantity"], 1);
}

#[tokio::test]
async fn test_malformed_cart_body_is_400() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .post(ctx.url("/api/cart"))
        .json(&json!({ "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_overflowing_prices_never_reach_the_cart_total() {
    let ctx = TestContext::seeded().await;
    ctx.add_to_cart(1, 1).await;

    let (_, mut huge) = ctx.get_json("/api/products/5").await;
    huge["price"] = json!("R$79228162514264337593543950335");
    huge["quantity"] = json!(1);

    let resp = ctx
        .client
        .post(ctx.url("/api/cart"))
        .json(&huge)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Cart total is too large");

    let (status, summary) = ctx.get_json("/api/cart/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["itemCount"], 1);

    let resp = ctx
        .client
        .put(ctx.url("/api/cart/0"))
        .json(&json!({ "quantity": u32::MAX }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ctx
        .client
        .post(ctx.url("/api/checkout"))
        .json(&json!({ "fullName": "Ana Souza", "email": "ana@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let order: Value = resp.json().await.unwrap();
    assert_eq!(order["itemCount"], u64::from(u32::MAX));
    assert!(cart(&ctx).await.is_empty());
}

#[tokio::test]
async fn test_checkout_empty_cart_is_rejected() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .post(ctx.url("/api/checkout"))
        .json(&json!({ "fullName": "Ana Souza", "email": "ana@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Cart is empty");
}

#[tokio::test]
async fn test_checkout_validates_contact_details() {
    let ctx = TestContext::seeded().await;
    ctx.add_to_cart(1, 1).await;

    for request in [
        json!({ "fullName": "  ", "email": "ana@example.com" }),
        json!({ "fullName": "Ana Souza", "email": "not-an-email" }),
    ] {
        let resp = ctx
            .client
            .post(ctx.url("/api/checkout"))
            .json(&request)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    // Rejected checkouts leave the cart alone
    assert_eq!(cart(&ctx).await.len(), 1);
}

#[tokio::test]
async fn test_checkout_places_order_and_empties_cart() {
    let ctx = TestContext::seeded().await;
    ctx.add_to_cart(1, 2).await;
    ctx.add_to_cart(3, 1).await;

    let resp = ctx
        .client
        .post(ctx.url("/api/checkout"))
        .json(&json!({ "fullName": "Ana Souza", "email": "ana@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let order: Value = resp.json().await.unwrap();
    assert_eq!(order["fullName"], "Ana Souza");
    assert_eq!(order["email"], "ana@example.com");
    assert_eq!(order["itemCount"], 3);
    assert_eq!(order["totalFormatted"], "R$\u{a0}687,00");
    assert_eq!(
        order["message"],
        "Order Placed for R$\u{a0}687,00! An advisor will contact you shortly."
    );
    assert!(order["orderId"].is_string());

    assert!(cart(&ctx).await.is_empty());

    let (_, summary) = ctx.get_json("/api/cart/summary").await;
    assert_eq!(summary["itemCount"], 0);
}
