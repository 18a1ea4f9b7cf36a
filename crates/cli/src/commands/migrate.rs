//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! sm-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `STOREMIND_DATABASE_URL` - `SQLite` connection string for the agent store
//!   (falls back to `DATABASE_URL`)

use storemind_agent::config::AgentConfig;
use storemind_agent::db;

/// Run agent database migrations.
///
/// # Errors
///
/// Returns error if configuration is missing, the database is unreachable,
/// or a migration fails to apply.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AgentConfig::from_env()?;

    tracing::info!("Connecting to agent database...");
    let pool = db::create_pool(&config.database_url).await?;

    tracing::info!("Running agent migrations...");
    db::run_migrations(&pool).await?;

    tracing::info!("Agent migrations complete!");
    Ok(())
}
