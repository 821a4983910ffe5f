//! Category browser handler.

use axum::{Json, extract::State};
use tracing::instrument;

use izeshop_core::{Category, aggregate_categories};

use crate::db::ProductRepository;
use crate::error::Result;
use crate::state::AppState;

/// List categories derived from the catalog, in the order first seen.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let products = ProductRepository::new(state.db())
        .list_oldest_first()
        .await?;
    Ok(Json(aggregate_categories(&products)))
}
