//! IzeShop storefront library.
//!
//! This crate provides the storefront API as a library, allowing it to be
//! tested and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use thiserror::Error;

use config::StorefrontConfig;
use db::{Database, ProductRepository, RepositoryError};
use services::chat::ChatError;
use state::AppState;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to connect to database: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("failed to prepare catalog: {0}")]
    Catalog(#[from] RepositoryError),

    #[error("failed to build shopping assistant: {0}")]
    Assistant(#[from] ChatError),
}

/// Connect to the store, create the schema, seed the catalog if configured
/// and build the shared application state.
///
/// # Errors
///
/// Returns `StartupError` if any of these steps fails.
pub async fn init_state(config: StorefrontConfig) -> Result<AppState, StartupError> {
    let db = Database::connect(&config.database_url).await?;
    db.init_schema().await?;

    if config.seed_catalog {
        let inserted = ProductRepository::new(&db).seed_defaults().await?;
        if inserted > 0 {
            tracing::info!(inserted, "Catalog was empty, default products added");
        }
    }

    Ok(AppState::new(config, db)?)
}
