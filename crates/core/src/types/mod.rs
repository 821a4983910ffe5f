//! Core types for IzeShop.
//!
//! This module provides the catalog and cart domain along with the
//! price and pagination helpers the storefront pages rely on.

pub mod cart;
pub mod category;
pub mod email;
pub mod id;
pub mod pagination;
pub mod price;
pub mod product;

pub use cart::{CartItem, CartSummary, TotalTooLarge};
pub use category::{Category, aggregate_categories, icon_for};
pub use email::{Email, EmailError};
pub use id::*;
pub use pagination::{PageRequest, paginate};
pub use price::{format_brl, line_total, normalize_price_label, parse_price};
pub use product::{Product, ProductDraft, ProductInput, ProductInputError};
