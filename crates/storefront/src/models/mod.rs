//! Domain models for the storefront.

pub mod session;

pub use session::{AdminSession, keys as session_keys};
