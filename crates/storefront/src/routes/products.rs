//! Public catalog handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use izeshop_core::{PageRequest, Product, ProductId, paginate};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Message returned for unknown or malformed product IDs.
pub const PRODUCT_NOT_FOUND: &str = "Product not found";

/// Query parameters for the product listing.
///
/// Pagination values are taken leniently: anything that is not a
/// non-negative integer is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    #[serde(rename = "_page")]
    pub page: Option<String>,
    #[serde(rename = "_limit")]
    pub limit: Option<String>,
}

impl ListQuery {
    fn search_term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    fn page_request(&self) -> Option<PageRequest> {
        let parse = |value: &Option<String>| value.as_deref().and_then(|v| v.trim().parse::<u32>().ok());
        PageRequest::from_query(parse(&self.page), parse(&self.limit))
    }
}

/// Filter, order newest first, then paginate.
#[must_use]
pub fn select_products(products: Vec<Product>, query: &ListQuery) -> Vec<Product> {
    let filtered = match query.search_term() {
        Some(term) => products
            .into_iter()
            .filter(|p| p.matches_query(term))
            .collect(),
        None => products,
    };
    paginate(filtered, query.page_request())
}

/// Parse a product ID from a path segment, mapping garbage to 404.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the segment is not an integer.
pub fn parse_product_id(raw: &str) -> Result<ProductId> {
    raw.parse::<ProductId>()
        .map_err(|_| AppError::NotFound(PRODUCT_NOT_FOUND.to_string()))
}

/// List products.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.db()).list().await?;
    Ok(Json(select_products(products, &query)))
}

/// Show a single product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let id = parse_product_id(&id)?;

    ProductRepository::new(state.db())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_string()))
}
