//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database)
//!
//! # Catalog
//! GET  /api/categories         - Categories aggregated from the catalog
//! GET  /api/products           - Product listing (?q, ?_page, ?_limit)
//! GET  /api/products/{id}      - Product detail
//!
//! # Admin (requires admin session)
//! POST   /api/products         - Create product (multipart)
//! PUT    /api/products/{id}    - Update product (multipart)
//! DELETE /api/products/{id}    - Delete product
//!
//! # Auth
//! POST /api/login              - Admin login
//! POST /api/logout             - Admin logout
//! GET  /api/session            - Admin login status
//!
//! # Cart
//! GET    /api/cart             - Cart lines
//! POST   /api/cart             - Add a product copy
//! GET    /api/cart/summary     - Item count and subtotal
//! PUT    /api/cart/{index}     - Change quantity
//! DELETE /api/cart/{index}     - Remove line
//!
//! # Checkout and assistant
//! POST /api/checkout           - Place order, empties the cart
//! POST /api/chat               - Ask the shopping assistant
//!
//! # Static
//! GET  /uploads/*              - Uploaded product images
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod chat;
pub mod checkout;
pub mod health;
pub mod products;

use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRequest, rejection::JsonRejection},
    middleware::from_fn,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::middleware::{
    auth_rate_limiter, chat_rate_limiter, create_session_layer, request_id_middleware,
    security_headers_middleware,
};
use crate::services::uploads::UPLOADS_ROUTE;
use crate::state::AppState;

/// JSON body extractor whose rejection is a JSON `AppError`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Create the catalog routes router.
pub fn product_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(admin::create_product))
        .route(
            "/{id}",
            get(products::show)
                .put(admin::update_product)
                .delete(admin::delete_product),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).post(cart::add))
        .route("/summary", get(cart::summary))
        .route("/{index}", put(cart::update).delete(cart::remove))
}

/// Create the auth routes router.
pub fn auth_routes(config: &StorefrontConfig) -> Router<AppState> {
    let login = Router::new().route("/login", post(auth::login));
    let login = if config.rate_limit {
        login.layer(auth_rate_limiter(config.trust_proxy_headers))
    } else {
        login
    };

    Router::new()
        .merge(login)
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::session_status))
}

/// Create the assistant routes router.
pub fn chat_routes(config: &StorefrontConfig) -> Router<AppState> {
    let router = Router::new().route("/chat", post(chat::chat));
    if config.rate_limit {
        router.layer(chat_rate_limiter(config.trust_proxy_headers))
    } else {
        router
    }
}

/// Create all API routes.
pub fn api_routes(state: &AppState) -> Router<AppState> {
    let config = state.config();

    Router::new()
        .route("/categories", get(categories::index))
        .nest("/products", product_routes(config.uploads.max_bytes))
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::place_order))
        .merge(auth_routes(config))
        .merge(chat_routes(config))
}

/// Build the complete application router with its middleware stack.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config().secure_cookies);
    let uploads = ServeDir::new(state.uploads().dir());

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes(&state))
        .nest_service(UPLOADS_ROUTE, uploads)
        .layer(from_fn(security_headers_middleware))
        .layer(CorsLayer::very_permissive())
        .layer(session_layer)
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<axum::body::Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            },
        ))
        .with_state(state)
}
