//! CLI subcommands.

pub mod migrate;
pub mod products;
pub mod seed;

use izeshop_storefront::config::StorefrontConfig;
use izeshop_storefront::db::Database;

/// Connect to the configured catalog database.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the database is unreachable.
pub async fn connect() -> Result<Database, Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let db = Database::connect(&config.database_url).await?;
    Ok(db)
}
