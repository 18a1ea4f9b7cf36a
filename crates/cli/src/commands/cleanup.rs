//! One-shot audit retention pass.
//!
//! The agent binary runs the same pass daily; this command exists for
//! external schedulers (cron, CI) and for operators trimming the log by hand.
//!
//! # Usage
//!
//! ```bash
//! sm-cli cleanup            # uses STOREMIND_AUDIT_RETENTION_DAYS (default 90)
//! sm-cli cleanup --days 30  # explicit window
//! ```

use storemind_agent::audit::store;
use storemind_agent::config::AgentConfig;
use storemind_agent::db;

/// Delete audit records older than the retention window.
///
/// # Errors
///
/// Returns error if configuration is missing, the database is unreachable,
/// or the delete fails.
pub async fn run(days: Option<u32>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AgentConfig::from_env()?;
    let retention_days = days.unwrap_or(config.audit_retention_days);

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;

    tracing::info!(retention_days, "Running audit retention pass...");
    let deleted = store::cleanup(&pool, retention_days).await?;
    tracing::info!(deleted, "Audit retention pass complete");

    Ok(())
}
