//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::db::Database;
use crate::services::cart::CartStore;
use crate::services::chat::{ChatError, ShoppingAssistant};
use crate::services::uploads::UploadStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database, the cart and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    db: Database,
    cart: CartStore,
    assistant: ShoppingAssistant,
    uploads: UploadStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `db` - Connected catalog database
    ///
    /// # Errors
    ///
    /// Returns an error if the language model client cannot be built.
    pub fn new(config: StorefrontConfig, db: Database) -> Result<Self, ChatError> {
        let assistant = ShoppingAssistant::from_config(&config.gemini)?;
        let uploads = UploadStore::new(config.uploads.dir.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                cart: CartStore::new(),
                assistant,
                uploads,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog database.
    #[must_use]
    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    /// Get a reference to the process-wide cart.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    #[must_use]
    pub fn assistant(&self) -> &ShoppingAssistant {
        &self.inner.assistant
    }

    #[must_use]
    pub fn uploads(&self) -> &UploadStore {
        &self.inner.uploads
    }
}
