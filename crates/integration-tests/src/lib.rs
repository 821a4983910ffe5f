//! Integration tests for IzeShop.
//!
//! Each test starts the real storefront router on an ephemeral port, backed
//! by an in-memory SQLite database and a temporary upload directory, and
//! talks to it over HTTP.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p izeshop-integration-tests
//! ```

use std::net::SocketAddr;

use izeshop_storefront::config::StorefrontConfig;
use izeshop_storefront::{init_state, routes};
use reqwest::Client;
use serde_json::{Value, json};
use tempfile::TempDir;

/// Admin password used by [`TestContext::with_admin`].
pub const ADMIN_PASSWORD: &str = "vitrine-de-teste-2024";

/// A running storefront plus a cookie-aware client.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    /// Upload directory; removed when the context is dropped.
    pub uploads: TempDir,
}

/// Options for starting a test server.
#[derive(Debug, Default, Clone, Copy)]
pub struct TestOptions {
    /// Insert the default catalog before serving.
    pub seed_catalog: bool,
    /// Configure [`ADMIN_PASSWORD`] as the admin password.
    pub admin: bool,
    /// Rate limit login and chat per client IP.
    pub rate_limit: bool,
}

impl TestContext {
    /// Start an empty storefront without an admin password.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn new() -> Self {
        Self::start(TestOptions::default()).await
    }

    /// Start a storefront with the default catalog.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn seeded() -> Self {
        Self::start(TestOptions {
            seed_catalog: true,
            ..TestOptions::default()
        })
        .await
    }

    /// Start an empty storefront with an admin password configured.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn with_admin() -> Self {
        Self::start(TestOptions {
            admin: true,
            ..TestOptions::default()
        })
        .await
    }

    /// Start a storefront with the given options.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    #[allow(clippy::expect_used)]
    pub async fn start(options: TestOptions) -> Self {
        let uploads = tempfile::tempdir().expect("create upload dir");

        let mut config = StorefrontConfig::for_tests(
            uploads.path().to_path_buf(),
            options.admin.then_some(ADMIN_PASSWORD),
        );
        config.seed_catalog = options.seed_catalog;
        config.rate_limit = options.rate_limit;

        let state = init_state(config).await.expect("init state");
        let app = routes::app(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");

        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("test server");
        });

        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{addr}"),
            uploads,
        }
    }

    /// Absolute URL for a path on the test server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Log in with [`ADMIN_PASSWORD`].
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the login is rejected.
    #[allow(clippy::expect_used)]
    pub async fn login(&self) {
        let resp = self
            .client
            .post(self.url("/api/login"))
            .json(&json!({ "password": ADMIN_PASSWORD }))
            .send()
            .await
            .expect("login request");
        assert!(resp.status().is_success(), "login failed: {}", resp.status());
    }

    /// GET a path and decode the JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the body is not JSON.
    #[allow(clippy::expect_used)]
    pub async fn get_json(&self, path: &str) -> (reqwest::StatusCode, Value) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request");
        let status = resp.status();
        (status, resp.json().await.expect("JSON body"))
    }

    /// Add a catalog product to the cart with the given quantity.
    ///
    /// # Panics
    ///
    /// Panics if the product cannot be fetched or the cart rejects it.
    #[allow(clippy::expect_used)]
    pub async fn add_to_cart(&self, product_id: i64, quantity: u32) {
        let (status, mut product) = self.get_json(&format!("/api/products/{product_id}")).await;
        assert!(status.is_success(), "product {product_id} missing");
        product["quantity"] = json!(quantity);

        let resp = self
            .client
            .post(self.url("/api/cart"))
            .json(&product)
            .send()
            .await
            .expect("add to cart");
        assert!(resp.status().is_success(), "add to cart failed: {}", resp.status());
    }
}
