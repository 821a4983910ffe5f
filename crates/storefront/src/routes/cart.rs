//! Cart route handlers.
//!
//! Lines are addressed by position. Path indices are parsed by hand so a
//! malformed index gets the same `Invalid index` answer as an out-of-range one.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use izeshop_core::{CartItem, CartSummary};

use super::ApiJson;
use crate::error::Result;
use crate::services::cart::CartError;
use crate::state::AppState;

/// Body for a quantity change.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantity {
    pub quantity: i64,
}

fn parse_index(raw: &str) -> std::result::Result<usize, CartError> {
    raw.trim().parse().map_err(|_| CartError::InvalidIndex)
}

/// List cart lines.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<Vec<CartItem>> {
    Json(state.cart().items().await)
}

/// Add a product copy to the cart.
#[instrument(skip(state, item))]
pub async fn add(
    State(state): State<AppState>,
    ApiJson(item): ApiJson<CartItem>,
) -> Result<Json<Value>> {
    let lines = state.cart().add(item).await?;
    tracing::debug!(lines, "Added to cart");
    Ok(Json(json!({ "message": "Product added to cart" })))
}

/// Change the quantity of a line.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path(index): Path<String>,
    ApiJson(body): ApiJson<UpdateQuantity>,
) -> Result<Json<Value>> {
    let index = parse_index(&index)?;
    state.cart().update_quantity(index, body.quantity).await?;
    Ok(Json(json!({ "message": "Cart updated" })))
}

/// Remove a line.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(index): Path<String>,
) -> Result<Json<Value>> {
    let index = parse_index(&index)?;
    state.cart().remove(index).await?;
    Ok(Json(json!({ "message": "Item removed" })))
}

/// Item count and subtotal.
#[instrument(skip(state))]
pub async fn summary(State(state): State<AppState>) -> Result<Json<CartSummary>> {
    Ok(Json(state.cart().summary().await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_index() {
        assert_eq!(parse_index("0"), Ok(0));
        assert_eq!(parse_index(" 3 "), Ok(3));
        assert_eq!(parse_index("-1"), Err(CartError::InvalidIndex));
        assert_eq!(parse_index("first"), Err(CartError::InvalidIndex));
    }
}
