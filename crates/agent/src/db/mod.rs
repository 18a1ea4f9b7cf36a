//! Database operations for the agent's `SQLite` store.
//!
//! # Tables
//!
//! - `audit_log` - Append-only trail of ability dispatches
//!
//! # Migrations
//!
//! Migrations are embedded from `crates/agent/migrations/` and run via:
//! ```bash
//! cargo run -p storemind-cli -- migrate
//! ```

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

/// Embedded migrations for the agent store.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failure.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// Creates the database file if missing and enables WAL so concurrent
/// dispatchers can append audit records without serializing readers.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Run the embedded migrations against a pool.
///
/// # Errors
///
/// Returns error if a migration fails to apply.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), RepositoryError> {
    MIGRATOR.run(pool).await?;
    Ok(())
}
