//! Agent configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREMIND_DATABASE_URL` - `SQLite` connection string (e.g. `sqlite://storemind.db`)
//!
//! ## Optional
//! - `STOREMIND_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREMIND_PORT` - Listen port (default: 3002)
//! - `STOREMIND_AUDIT_RETENTION_DAYS` - Days to keep audit records (default: 90)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Default number of days audit records are retained.
const DEFAULT_RETENTION_DAYS: u32 = 90;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is absent.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    /// An environment variable failed to parse.
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Agent application configuration.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// `SQLite` database connection URL (may embed credentials for remote VFS setups)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Days audit records are retained before the cleanup pass deletes them
    pub audit_retention_days: u32,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
}

impl AgentConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STOREMIND_DATABASE_URL")?;
        let host = get_env_or_default("STOREMIND_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREMIND_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("STOREMIND_PORT", "3002")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREMIND_PORT".to_string(), e.to_string()))?;
        let audit_retention_days = get_env_or_default(
            "STOREMIND_AUDIT_RETENTION_DAYS",
            &DEFAULT_RETENTION_DAYS.to_string(),
        )
        .parse::<u32>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("STOREMIND_AUDIT_RETENTION_DAYS".to_string(), e.to_string())
        })?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            database_url,
            host,
            port,
            audit_retention_days,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    // Try primary key first (e.g., STOREMIND_DATABASE_URL)
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    // Fallback to generic DATABASE_URL
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
