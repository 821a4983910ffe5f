//! Admin authentication extractor.
//!
//! The admin panel is gated by a single shared password. A successful login
//! stores an [`AdminSession`] marker; mutating catalog routes require it.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{AdminSession, session_keys};

/// Extractor that requires an admin session.
///
/// Rejects with 401 when the session has no admin marker.
///
/// # Example
///
/// ```rust,ignore
/// async fn delete_product(
///     RequireAdmin(_admin): RequireAdmin,
///     Path(id): Path<String>,
/// ) -> Result<Json<Value>> {
///     // ...
/// }
/// ```
pub struct RequireAdmin(pub AdminSession);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Unauthorized("Admin login required".to_string()))?;

        let admin: AdminSession = session
            .get(session_keys::ADMIN)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| AppError::Unauthorized("Admin login required".to_string()))?;

        Ok(Self(admin))
    }
}

/// Mark the session as logged in as admin.
///
/// The session ID is cycled first so a pre-login cookie cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_admin_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::ADMIN, AdminSession::now()).await
}

/// Clear the admin marker from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_admin_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<AdminSession>(session_keys::ADMIN).await?;
    Ok(())
}
