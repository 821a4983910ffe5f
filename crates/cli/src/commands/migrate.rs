//! Schema creation command.
//!
//! # Usage
//!
//! ```bash
//! izeshop-cli migrate
//! ```
//!
//! The server also creates the schema on startup; this command prepares a
//! database ahead of the first deploy.

use izeshop_storefront::db::Database;

/// Create the catalog schema if it does not exist.
///
/// # Errors
///
/// Returns an error if the schema statement fails.
pub async fn run(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(backend = ?db.backend(), "Creating catalog schema...");
    db.init_schema().await?;
    tracing::info!("Catalog schema ready");
    Ok(())
}
