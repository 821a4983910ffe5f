//! Cart line items and totals.
//!
//! A cart line is a copy of the product taken when it was added; it never
//! reconciles with later catalog edits.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::price::{format_brl, line_total};
use super::product::Product;

/// A product copy plus the quantity the shopper asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Variant or option picked on the product page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_detail: Option<String>,
}

const fn default_quantity() -> u32 {
    1
}

impl CartItem {
    /// Parsed unit price times quantity.
    ///
    /// # Errors
    ///
    /// Returns `TotalTooLarge` if the product overflows.
    pub fn line_total(&self) -> Result<Decimal, TotalTooLarge> {
        line_total(&self.product.price, self.quantity).ok_or(TotalTooLarge)
    }
}

/// A cart total that does not fit in a [`Decimal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Cart total is too large")]
pub struct TotalTooLarge;

/// Totals shown on the cart and checkout pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    /// Sum of line quantities.
    pub item_count: u64,
    pub subtotal: Decimal,
    pub subtotal_formatted: String,
}

impl CartSummary {
    /// Compute totals for a list of cart lines.
    ///
    /// # Errors
    ///
    /// Returns `TotalTooLarge` if a line total or the subtotal overflows.
    pub fn from_items(items: &[CartItem]) -> Result<Self, TotalTooLarge> {
        let item_count = items
            .iter()
            .fold(0u64, |count, item| count.saturating_add(u64::from(item.quantity)));

        let mut subtotal = Decimal::ZERO;
        for item in items {
            subtotal = subtotal
                .checked_add(item.line_total()?)
                .ok_or(TotalTooLarge)?;
        }

        Ok(Self {
            item_count,
            subtotal,
            subtotal_formatted: format_brl(subtotal),
        })
    }
}
