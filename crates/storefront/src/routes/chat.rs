//! Shopping assistant handler.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::ApiJson;
use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Answer a shopper message using the live catalog as context.
#[instrument(skip(state, request))]
pub async fn chat(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ChatRequest>,
) -> Result<Json<ChatReply>> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(AppError::BadRequest("Message is required".to_string()));
    }

    let assistant = state.assistant();
    let reply = if assistant.is_demo() {
        assistant.reply(message, &[]).await
    } else {
        let catalog = ProductRepository::new(state.db())
            .list_oldest_first()
            .await?;
        assistant.reply(message, &catalog).await
    };

    Ok(Json(ChatReply { reply }))
}
