//! Checkout handler.
//!
//! Placing an order empties the cart and returns a confirmation. No payment
//! is taken; an advisor follows up with the shopper.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use izeshop_core::Email;

use super::ApiJson;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Contact details collected on the checkout page.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub full_name: String,
    pub email: String,
}

/// Order confirmation returned to the shopper.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_id: Uuid,
    pub full_name: String,
    pub email: Email,
    pub item_count: u64,
    pub total: Decimal,
    pub total_formatted: String,
    pub message: String,
    pub placed_at: DateTime<Utc>,
}

/// Place an order for everything in the cart.
#[instrument(skip(state, request))]
pub async fn place_order(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CheckoutRequest>,
) -> Result<Json<OrderConfirmation>> {
    let full_name = request.full_name.trim().to_owned();
    if full_name.is_empty() {
        return Err(AppError::BadRequest("Full name is required".to_string()));
    }
    let email = Email::parse(&request.email)?;

    // Take the cart atomically so two checkouts cannot both succeed
    let (_items, summary) = state.cart().take_order().await?;
    let confirmation = OrderConfirmation {
        order_id: Uuid::new_v4(),
        full_name,
        email,
        item_count: summary.item_count,
        total: summary.subtotal,
        message: format!(
            "Order Placed for {}! An advisor will contact you shortly.",
            summary.subtotal_formatted
        ),
        total_formatted: summary.subtotal_formatted,
        placed_at: Utc::now(),
    };

    let order_id = confirmation.order_id.to_string();
    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_id", order_id.as_str())]),
    );
    tracing::info!(
        order_id = %confirmation.order_id,
        item_count = confirmation.item_count,
        total = %confirmation.total,
        "Order placed"
    );

    Ok(Json(confirmation))
}
