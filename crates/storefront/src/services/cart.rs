//! Process-wide shopping cart.
//!
//! There is one cart per server process, shared by every caller and lost on
//! restart. Lines are addressed by their position in the list.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

use izeshop_core::{CartItem, CartSummary, TotalTooLarge};

/// Errors raised by cart mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CartError {
    /// No cart line at the given position.
    #[error("Invalid index")]
    InvalidIndex,

    /// Quantity below one.
    #[error("Invalid quantity")]
    InvalidQuantity,

    /// The cart total no longer fits in a decimal amount.
    #[error("Cart total is too large")]
    TotalTooLarge,

    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    Empty,
}

impl From<TotalTooLarge> for CartError {
    fn from(_: TotalTooLarge) -> Self {
        Self::TotalTooLarge
    }
}

/// Shared, in-memory cart.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    items: Arc<RwLock<Vec<CartItem>>>,
}

impl CartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every cart line in insertion order.
    pub async fn items(&self) -> Vec<CartItem> {
        self.items.read().await.clone()
    }

    /// Append a line. Identical products are not merged.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if the quantity is zero and
    /// `CartError::TotalTooLarge` if the line would overflow the cart total.
    pub async fn add(&self, item: CartItem) -> Result<usize, CartError> {
        if item.quantity < 1 {
            return Err(CartError::InvalidQuantity);
        }
        let mut items = self.items.write().await;
        items.push(item);
        if let Err(e) = CartSummary::from_items(&items) {
            items.pop();
            return Err(e.into());
        }
        Ok(items.len())
    }

    /// Set the quantity of the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidIndex` if there is no such line,
    /// `CartError::InvalidQuantity` if the quantity is below one and
    /// `CartError::TotalTooLarge` if the new quantity would overflow the total.
    pub async fn update_quantity(&self, index: usize, quantity: i64) -> Result<(), CartError> {
        let mut items = self.items.write().await;
        let item = items.get_mut(index).ok_or(CartError::InvalidIndex)?;
        let quantity = u32::try_from(quantity)
            .ok()
            .filter(|q| *q >= 1)
            .ok_or(CartError::InvalidQuantity)?;
        let previous = std::mem::replace(&mut item.quantity, quantity);

        if let Err(e) = CartSummary::from_items(&items) {
            if let Some(item) = items.get_mut(index) {
                item.quantity = previous;
            }
            return Err(e.into());
        }
        Ok(())
    }

    /// Remove the line at `index`, shifting later lines down.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidIndex` if there is no such line.
    pub async fn remove(&self, index: usize) -> Result<CartItem, CartError> {
        let mut items = self.items.write().await;
        if index >= items.len() {
            return Err(CartError::InvalidIndex);
        }
        Ok(items.remove(index))
    }

    /// Total the cart and empty it in one step.
    ///
    /// The cart is left untouched when an error is returned.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Empty` if there is nothing to order and
    /// `CartError::TotalTooLarge` if the total cannot be computed.
    pub async fn take_order(&self) -> Result<(Vec<CartItem>, CartSummary), CartError> {
        let mut items = self.items.write().await;
        if items.is_empty() {
            return Err(CartError::Empty);
        }
        let summary = CartSummary::from_items(&items)?;
        Ok((std::mem::take(&mut *items), summary))
    }

    /// Totals over the current lines.
    ///
    /// # Errors
    ///
    /// Returns `CartError::TotalTooLarge` if the total cannot be computed.
    pub async fn summary(&self) -> Result<CartSummary, CartError> {
        Ok(CartSummary::from_items(&self.items.read().await)?)
    }
}
