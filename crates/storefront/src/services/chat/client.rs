//! HTTP client for the `generateContent` API.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use super::error::{ApiErrorResponse, ChatError};
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};

const API_KEY_HEADER: &str = "x-goog-api-key";
const TEMPERATURE: f32 = 0.7;

/// Language model API client.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl GeminiClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - API key sent on every request
    /// * `api_base` - Base URL without a trailing slash
    /// * `model` - Model ID (e.g., gemini-1.5-flash)
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Config` if the API key contains invalid header
    /// characters or the HTTP client cannot be built.
    pub fn new(api_key: &SecretString, api_base: &str, model: &str) -> Result<Self, ChatError> {
        let mut key = HeaderValue::from_str(api_key.expose_secret())
            .map_err(|_| ChatError::Config("API key is not a valid header value".to_string()))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(API_KEY_HEADER, key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ChatError::Config(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                endpoint: format!("{api_base}/v1beta/models/{model}:generateContent"),
                model: model.to_string(),
            }),
        })
    }

    /// Send a single user message with a system instruction.
    ///
    /// Returns the model's text, or `None` when the response carried no text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API returns an error response.
    #[instrument(skip(self, system, message), fields(model = %self.inner.model))]
    pub async fn generate(
        &self,
        system: &str,
        message: &str,
    ) -> Result<Option<String>, ChatError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(message)],
            system_instruction: Some(Content::instruction(system)),
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
            },
        };

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .json(&request)
            .send()
            .await?;

        let parsed = Self::handle_response(response).await?;
        Ok(parsed.text())
    }

    /// Handle a successful response.
    async fn handle_response(
        response: reqwest::Response,
    ) -> Result<GenerateContentResponse, ChatError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| ChatError::Parse(format!("Failed to parse response: {e}")))
        } else {
            Err(Self::handle_error_status(status, response).await)
        }
    }

    /// Handle an error status code.
    async fn handle_error_status(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> ChatError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return ChatError::RateLimited(retry_after);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return ChatError::Unauthorized("API key rejected".to_string());
        }

        match response.text().await {
            Ok(body) => match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_error) => {
                    tracing::warn!(
                        http_status = %status,
                        code = api_error.error.code,
                        api_status = %api_error.error.status,
                        "Language model API returned an error"
                    );
                    ChatError::Api {
                        status: api_error.error.status,
                        message: api_error.error.message,
                    }
                }
                Err(_) => ChatError::Api {
                    status: status.to_string(),
                    message: body,
                },
            },
            Err(e) => ChatError::Http(e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::json;

    use super::*;

    async fn failing_api(status: StatusCode, body: serde_json::Value) -> String {
        let app = Router::new().route(
            "/v1beta/models/{model}",
            post(move || async move { (status, Json(body)) }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_api_error_body_is_mapped() {
        let base = failing_api(
            StatusCode::BAD_REQUEST,
            json!({"error": {"code": 400, "message": "Request contains an invalid argument.", "status": "INVALID_ARGUMENT"}}),
        )
        .await;
        let client = GeminiClient::new(&SecretString::from("k-123"), &base, "gemini-1.5-flash").unwrap();

        let err = client.generate("system", "hello").await.unwrap_err();
        assert!(matches!(
            err,
            ChatError::Api { ref status, ref message }
                if status == "INVALID_ARGUMENT" && message == "Request contains an invalid argument."
        ));
    }

    #[tokio::test]
    async fn test_rejected_key_is_unauthorized() {
        let base = failing_api(StatusCode::FORBIDDEN, json!({})).await;
        let client = GeminiClient::new(&SecretString::from("k-123"), &base, "gemini-1.5-flash").unwrap();

        let err = client.generate("system", "hello").await.unwrap_err();
        assert!(matches!(err, ChatError::Unauthorized(_)));
    }

    #[test]
    fn test_gemini_client_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<GeminiClient>();
    }

    #[test]
    fn test_gemini_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GeminiClient>();
    }

    #[test]
    fn test_rejects_key_with_newline() {
        let key = SecretString::from("bad\nkey");
        assert!(matches!(
            GeminiClient::new(&key, "http://localhost", "gemini-1.5-flash"),
            Err(ChatError::Config(_))
        ));
    }

    #[test]
    fn test_endpoint_format() {
        let key = SecretString::from("k-123");
        let client = GeminiClient::new(&key, "https://generativelanguage.googleapis.com", "gemini-1.5-flash")
            .expect("client");
        assert_eq!(
            client.inner.endpoint,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }
}
