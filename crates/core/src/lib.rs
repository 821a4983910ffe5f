//! IzeShop Core - Shared domain types library.
//!
//! This crate provides the types used across all IzeShop components:
//! - `storefront` - REST backend for the catalog, cart, checkout, chat and admin API
//! - `cli` - Command-line tools for schema setup and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Price parsing, category aggregation and pagination
//! live here so the server and its tests share one implementation.
//!
//! # Modules
//!
//! - [`types`] - Products, cart lines, categories, prices, pagination, emails and IDs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
