//! Admin login and logout.

use axum::{Json, extract::State};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use super::ApiJson;
use crate::error::{AppError, Result};
use crate::middleware::{clear_admin_session, set_admin_session};
use crate::models::{AdminSession, session_keys};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Compare without short-circuiting on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Log in as admin with the shared password.
#[instrument(skip(state, session, request))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<Value>> {
    let Some(expected) = state.config().admin_password.as_ref() else {
        tracing::warn!("Admin login attempted but STOREFRONT_ADMIN_PASSWORD is not set");
        return Err(AppError::Unauthorized("Admin login is disabled".to_string()));
    };

    if !constant_time_eq(
        request.password.as_bytes(),
        expected.expose_secret().as_bytes(),
    ) {
        tracing::warn!("Admin login failed");
        return Err(AppError::Unauthorized("Invalid password".to_string()));
    }

    set_admin_session(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    tracing::info!("Admin logged in");

    Ok(Json(json!({ "success": true })))
}

/// Log out of the admin session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<Value>> {
    clear_admin_session(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    Ok(Json(json!({ "success": true })))
}

/// Report whether the caller holds an admin session.
#[instrument(skip(session))]
pub async fn session_status(session: Session) -> Json<Value> {
    let admin = session
        .get::<AdminSession>(session_keys::ADMIN)
        .await
        .ok()
        .flatten()
        .is_some();
    Json(json!({ "admin": admin }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"vitrine-2024", b"vitrine-2024"));
        assert!(!constant_time_eq(b"vitrine-2024", b"vitrine-2025"));
        assert!(!constant_time_eq(b"short", b"longer"));
        assert!(constant_time_eq(b"", b""));
    }
}
