//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `cart` - Process-wide shopping cart
//! - `chat` - Shopping assistant backed by a language model
//! - `uploads` - Product image storage

pub mod cart;
pub mod chat;
pub mod uploads;
