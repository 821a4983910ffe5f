//! Shopping assistant backed by a language model.
//!
//! The assistant is stateless: every message is answered on its own, with the
//! live catalog summarised into the system instruction. Failures never reach
//! the shopper as errors; a canned apology is returned instead.

mod client;
mod error;
mod types;

pub use client::GeminiClient;
pub use error::ChatError;

use izeshop_core::Product;

use crate::config::GeminiConfig;

/// Reply used when no API key is configured.
pub const DEMO_MODE_REPLY: &str = "I am currently in demo mode. Please configure the GEMINI_API_KEY to enable my full capabilities.";

/// Reply used when the model returns no text.
pub const EMPTY_REPLY: &str =
    "I'm sorry, I couldn't process that. How may I assist you with our collection today?";

/// Reply used when the model call fails.
pub const DELAY_REPLY: &str =
    "Our systems are experiencing a brief delay. I am here to help as soon as possible.";

/// Answers shopper questions about the catalog.
#[derive(Clone)]
pub struct ShoppingAssistant {
    client: Option<GeminiClient>,
}

impl ShoppingAssistant {
    /// Build the assistant from configuration.
    ///
    /// Without an API key the assistant runs in demo mode.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Config` if the HTTP client cannot be built.
    pub fn from_config(config: &GeminiConfig) -> Result<Self, ChatError> {
        let client = config
            .api_key
            .as_ref()
            .map(|key| GeminiClient::new(key, &config.api_base, &config.model))
            .transpose()?;

        if client.is_none() {
            tracing::warn!("GEMINI_API_KEY not set, shopping assistant running in demo mode");
        }

        Ok(Self { client })
    }

    /// An assistant that always answers in demo mode.
    #[must_use]
    pub const fn demo() -> Self {
        Self { client: None }
    }

    #[must_use]
    pub const fn is_demo(&self) -> bool {
        self.client.is_none()
    }

    /// Answer one shopper message with the given catalog as context.
    pub async fn reply(&self, message: &str, catalog: &[Product]) -> String {
        let Some(client) = &self.client else {
            return DEMO_MODE_REPLY.to_string();
        };

        match client.generate(&system_instruction(catalog), message).await {
            Ok(Some(text)) => text,
            Ok(None) => EMPTY_REPLY.to_string(),
            Err(e) => {
                tracing::error!(error = %e, "Shopping assistant request failed");
                DELAY_REPLY.to_string()
            }
        }
    }
}

/// System instruction carrying the catalog summary.
#[must_use]
pub fn system_instruction(catalog: &[Product]) -> String {
    let products = catalog
        .iter()
        .map(Product::context_line)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are a premium personal shopping assistant for \"IzeShop\". \
         Your tone is sophisticated, helpful, and professional. \
         Available products are: {products}. \
         Recommend these products when relevant and keep answers concise."
    )
}
