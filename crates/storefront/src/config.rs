//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults run a local single-process shop.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 0.0.0.0)
//! - `STOREFRONT_PORT` - Listen port (falls back to `PORT`, default: 5001)
//! - `DATABASE_URL` - Networked `PostgreSQL` store. When unset the file-backed
//!   SQLite store at `STOREFRONT_SQLITE_PATH` is used instead. TLS is
//!   negotiated through the URL's `sslmode`: `sslmode=require` encrypts
//!   without verifying the server certificate (typical for hosted Postgres),
//!   `sslmode=verify-full` also checks it against the system roots
//! - `STOREFRONT_SQLITE_PATH` - SQLite database file (default: database.sqlite)
//! - `STOREFRONT_ADMIN_PASSWORD` - Shared admin password; admin login is
//!   disabled when unset
//! - `GEMINI_API_KEY` - Language model API key (falls back to `API_KEY`); the
//!   chat assistant runs in demo mode when unset
//! - `GEMINI_MODEL` - Model ID (default: gemini-1.5-flash)
//! - `GEMINI_API_BASE` - API base URL (default: <https://generativelanguage.googleapis.com>)
//! - `STOREFRONT_UPLOAD_DIR` - Directory for product image uploads (default: uploads)
//! - `STOREFRONT_MAX_UPLOAD_BYTES` - Request body limit for uploads (default: 5 MiB)
//! - `STOREFRONT_SEED_CATALOG` - Seed the default catalog into an empty store (default: true)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sampling (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry performance sampling (default: 0.0)
//! - `STOREFRONT_RATE_LIMIT` - Rate limit login and chat per client IP (default: true)
//! - `STOREFRONT_TRUST_PROXY_HEADERS` - Take the client IP from proxy headers
//!   (`CF-Connecting-IP`, `X-Real-IP`, `Fly-Client-IP`, `X-Forwarded-For`)
//!   instead of the peer address. Only enable behind a proxy that overwrites
//!   them (default: false)
//! - `STOREFRONT_SECURE_COOKIES` - Mark the session cookie `Secure` (default: false)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_PORT: &str = "5001";
const DEFAULT_SQLITE_PATH: &str = "database.sqlite";
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
const MIN_ADMIN_PASSWORD_LENGTH: usize = 8;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "changeme",
    "placeholder",
    "password",
    "your-",
    "xxx",
    "todo",
    "fixme",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Database connection URL (`postgres://...` or `sqlite://...`)
    pub database_url: SecretString,
    /// Shared admin password, compared in plaintext
    pub admin_password: Option<SecretString>,
    /// Language model configuration
    pub gemini: GeminiConfig,
    /// Product image upload configuration
    pub uploads: UploadConfig,
    /// Whether to seed the default catalog into an empty store on startup
    pub seed_catalog: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sampling rate
    pub sentry_sample_rate: f32,
    /// Sentry performance sampling rate
    pub sentry_traces_sample_rate: f32,
    /// Whether login and chat are rate limited per client IP
    pub rate_limit: bool,
    /// Whether the rate limiter trusts proxy headers for the client IP
    pub trust_proxy_headers: bool,
    /// Whether the session cookie is marked `Secure`
    pub secure_cookies: bool,
}

/// Language model API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key; `None` puts the assistant in demo mode
    pub api_key: Option<SecretString>,
    /// Model ID (e.g., gemini-1.5-flash)
    pub model: String,
    /// API base URL, overridable for tests and proxies
    pub api_base: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Product image upload configuration.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory uploaded images are written to and served from
    pub dir: PathBuf,
    /// Maximum accepted request body size for product forms
    pub max_bytes: usize,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable cannot be parsed or the admin
    /// password looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Lookup(&lookup);

        let host = env
            .or_default("STOREFRONT_HOST", "0.0.0.0")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string()))?;
        let port = env
            .first_of(&["STOREFRONT_PORT", "PORT"])
            .unwrap_or_else(|| DEFAULT_PORT.to_string())
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string()))?;

        let database_url = env.get("DATABASE_URL").map_or_else(
            || {
                let path = env.or_default("STOREFRONT_SQLITE_PATH", DEFAULT_SQLITE_PATH);
                SecretString::from(sqlite_url(&path))
            },
            SecretString::from,
        );

        let admin_password = env
            .get("STOREFRONT_ADMIN_PASSWORD")
            .map(|value| validate_admin_password(&value, "STOREFRONT_ADMIN_PASSWORD"))
            .transpose()?;

        let gemini = GeminiConfig {
            api_key: env
                .first_of(&["GEMINI_API_KEY", "API_KEY"])
                .filter(|key| !key.trim().is_empty())
                .map(SecretString::from),
            model: env.or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            api_base: env
                .or_default("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE)
                .trim_end_matches('/')
                .to_string(),
        };

        let uploads = UploadConfig {
            dir: PathBuf::from(env.or_default("STOREFRONT_UPLOAD_DIR", "uploads")),
            max_bytes: match env.get("STOREFRONT_MAX_UPLOAD_BYTES") {
                Some(value) => value.parse::<usize>().map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "STOREFRONT_MAX_UPLOAD_BYTES".to_string(),
                        e.to_string(),
                    )
                })?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
        };

        let seed_catalog = parse_bool(
            "STOREFRONT_SEED_CATALOG",
            &env.or_default("STOREFRONT_SEED_CATALOG", "true"),
        )?;

        let sentry_sample_rate = parse_rate(
            "SENTRY_SAMPLE_RATE",
            &env.or_default("SENTRY_SAMPLE_RATE", "1.0"),
        )?;
        let sentry_traces_sample_rate = parse_rate(
            "SENTRY_TRACES_SAMPLE_RATE",
            &env.or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0"),
        )?;
        let rate_limit = parse_bool(
            "STOREFRONT_RATE_LIMIT",
            &env.or_default("STOREFRONT_RATE_LIMIT", "true"),
        )?;
        let trust_proxy_headers = parse_bool(
            "STOREFRONT_TRUST_PROXY_HEADERS",
            &env.or_default("STOREFRONT_TRUST_PROXY_HEADERS", "false"),
        )?;
        let secure_cookies = parse_bool(
            "STOREFRONT_SECURE_COOKIES",
            &env.or_default("STOREFRONT_SECURE_COOKIES", "false"),
        )?;

        Ok(Self {
            host,
            port,
            database_url,
            admin_password,
            gemini,
            uploads,
            seed_catalog,
            sentry_dsn: env.get("SENTRY_DSN"),
            sentry_environment: env.get("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
            rate_limit,
            trust_proxy_headers,
            secure_cookies,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Configuration for tests: in-memory SQLite, no seeding, no model key.
    #[must_use]
    pub fn for_tests(upload_dir: PathBuf, admin_password: Option<&str>) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
            database_url: SecretString::from("sqlite::memory:"),
            admin_password: admin_password.map(SecretString::from),
            gemini: GeminiConfig {
                api_key: None,
                model: DEFAULT_GEMINI_MODEL.to_string(),
                api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            },
            uploads: UploadConfig {
                dir: upload_dir,
                max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
            seed_catalog: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
            rate_limit: false,
            trust_proxy_headers: false,
            secure_cookies: false,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Thin wrapper over a variable lookup function.
struct Lookup<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Lookup<'_, F> {
    /// Get an optional variable.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    /// Get the first variable that is set.
    fn first_of(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.get(key))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }
}

/// Connection URL for a file-backed SQLite store, created if missing.
fn sqlite_url(path: &str) -> String {
    format!("sqlite://{path}?mode=rwc")
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

fn parse_rate(key: &str, value: &str) -> Result<f32, ConfigError> {
    let rate = value
        .trim()
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a rate between 0.0 and 1.0, got {rate}"),
        ))
    }
}

/// Reject admin passwords that are too short or look like placeholders.
fn validate_admin_password(value: &str, var_name: &str) -> Result<SecretString, ConfigError> {
    if value.len() < MIN_ADMIN_PASSWORD_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {MIN_ADMIN_PASSWORD_LENGTH} characters (got {})",
                value.len()
            ),
        ));
    }

    let lower = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(SecretString::from(value.to_owned()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;
    use crate::db::Backend;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:5001");
        assert_eq!(
            config.database_url.expose_secret(),
            "sqlite://database.sqlite?mode=rwc"
        );
        assert!(config.admin_password.is_none());
        assert!(config.gemini.api_key.is_none());
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
        assert_eq!(config.uploads.dir, PathBuf::from("uploads"));
        assert!(config.seed_catalog);
        assert!(config.rate_limit);
        assert!(!config.trust_proxy_headers);
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_database_url_selects_networked_store() {
        let config = load(&[("DATABASE_URL", "postgres://shop@db/izeshop")]).unwrap();
        assert_eq!(
            Backend::from_url(config.database_url.expose_secret()),
            Backend::Postgres
        );

        let config = load(&[("STOREFRONT_SQLITE_PATH", "/tmp/shop.sqlite")]).unwrap();
        assert_eq!(
            Backend::from_url(config.database_url.expose_secret()),
            Backend::Sqlite
        );
        assert_eq!(
            config.database_url.expose_secret(),
            "sqlite:///tmp/shop.sqlite?mode=rwc"
        );
    }

    #[test]
    fn test_port_fallbacks() {
        assert_eq!(load(&[("PORT", "8080")]).unwrap().port, 8080);
        assert_eq!(
            load(&[("PORT", "8080"), ("STOREFRONT_PORT", "9000")])
                .unwrap()
                .port,
            9000
        );
        assert!(matches!(
            load(&[("STOREFRONT_PORT", "not-a-port")]),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_api_key_fallback_and_blank() {
        let config = load(&[("API_KEY", "k-123")]).unwrap();
        assert!(config.gemini.api_key.is_some());

        let config = load(&[("GEMINI_API_KEY", "  ")]).unwrap();
        assert!(config.gemini.api_key.is_none());
    }

    #[test]
    fn test_admin_password_validation() {
        assert!(matches!(
            load(&[("STOREFRONT_ADMIN_PASSWORD", "short")]),
            Err(ConfigError::InsecureSecret(_, _))
        ));
        assert!(matches!(
            load(&[("STOREFRONT_ADMIN_PASSWORD", "changeme-now")]),
            Err(ConfigError::InsecureSecret(_, _))
        ));

        let config = load(&[("STOREFRONT_ADMIN_PASSWORD", "vitrine-2024-ize")]).unwrap();
        assert_eq!(
            config.admin_password.unwrap().expose_secret(),
            "vitrine-2024-ize"
        );
    }

    #[test]
    fn test_sample_rate_bounds() {
        assert!(load(&[("SENTRY_TRACES_SAMPLE_RATE", "0.25")]).is_ok());
        assert!(load(&[("SENTRY_TRACES_SAMPLE_RATE", "1.5")]).is_err());
    }

    #[test]
    fn test_seed_flag_parsing() {
        assert!(!load(&[("STOREFRONT_SEED_CATALOG", "off")]).unwrap().seed_catalog);
        assert!(load(&[("STOREFRONT_SEED_CATALOG", "maybe")]).is_err());
    }

    #[test]
    fn test_trust_proxy_headers_flag() {
        let config = load(&[("STOREFRONT_TRUST_PROXY_HEADERS", "true")]).unwrap();
        assert!(config.trust_proxy_headers);
        assert!(load(&[("STOREFRONT_TRUST_PROXY_HEADERS", "sometimes")]).is_err());
    }

    #[test]
    fn test_gemini_config_debug_redacts_key() {
        let config = load(&[("GEMINI_API_KEY", "super_secret_model_key")]).unwrap();
        let debug_output = format!("{:?}", config.gemini);

        assert!(debug_output.contains("gemini-1.5-flash"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_model_key"));
    }
}
