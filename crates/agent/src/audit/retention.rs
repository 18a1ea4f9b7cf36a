//! Scheduled retention cleanup for the audit log.

use std::time::Duration;

use sqlx::SqlitePool;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use super::store;

/// Interval between retention passes.
const RETENTION_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Spawn the daily retention task.
///
/// The first pass runs immediately on startup, then once per day. Failures
/// are logged and the task keeps running; a missed pass only delays deletion.
pub fn spawn_retention_task(pool: SqlitePool, retention_days: u32) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(RETENTION_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            match store::cleanup(&pool, retention_days).await {
                Ok(0) => debug!(retention_days, "audit retention pass: nothing to delete"),
                Ok(deleted) => info!(retention_days, deleted, "audit retention pass complete"),
                Err(e) => error!(error = %e, "audit retention pass failed"),
            }
        }
    })
}
