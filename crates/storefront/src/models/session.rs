//! Session-related types.
//!
//! Types stored in the session for authentication state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marker stored in the session once the admin password was accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSession {
    /// When the admin logged in.
    pub logged_in_at: DateTime<Utc>,
}

impl AdminSession {
    #[must_use]
    pub fn now() -> Self {
        Self {
            logged_in_at: Utc::now(),
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for the admin login marker.
    pub const ADMIN: &str = "admin";
}
