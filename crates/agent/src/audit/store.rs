//! Persistence operations for the audit log.
//!
//! Writes append one immutable row per dispatch; reads page through the
//! filter/sort vocabulary of the query module. The retention pass is the only
//! deletion path. All SQL here is built from fixed fragments with `?` binds —
//! caller-supplied values never reach the query text.

use chrono::{Duration, Utc};
use sqlx::sqlite::SqliteArguments;
use sqlx::query::QueryAs;
use sqlx::{Sqlite, SqlitePool};
use storemind_core::AuditRecordId;
use tracing::instrument;

use crate::db::RepositoryError;

use super::query::{AuditFilter, SortDir, SortKey, order_clause, where_clause};
use super::record::{AuditRecord, NewAuditRecord};

/// Column list shared by every `SELECT` against the audit table.
const SELECT_COLUMNS: &str = "SELECT id, actor_id, actor_type, ability_id, action_category, \
     action_type, description, parameters, result, status, object_type, object_id, \
     ip_address, created_at FROM audit_log";

/// Append one audit record, stamping `created_at`, and return its id.
///
/// # Errors
///
/// Returns error if the database insert fails.
#[instrument(skip(pool, record), fields(ability = %record.ability_id, status = %record.status))]
pub async fn write(
    pool: &SqlitePool,
    record: NewAuditRecord,
) -> Result<AuditRecordId, RepositoryError> {
    let result = sqlx::query(
        "INSERT INTO audit_log (actor_id, actor_type, ability_id, action_category, \
         action_type, description, parameters, result, status, object_type, object_id, \
         ip_address, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(record.actor_id.as_i64())
    .bind(record.actor_type)
    .bind(record.ability_id)
    .bind(record.action_category)
    .bind(record.action_type)
    .bind(record.description)
    .bind(record.parameters)
    .bind(record.result)
    .bind(record.status)
    .bind(record.object_type)
    .bind(record.object_id)
    .bind(record.ip_address)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(AuditRecordId::new(result.last_insert_rowid()))
}

/// Fetch one record by id.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn get(
    pool: &SqlitePool,
    id: AuditRecordId,
) -> Result<Option<AuditRecord>, RepositoryError> {
    let sql = format!("{SELECT_COLUMNS} WHERE id = ?");
    let record = sqlx::query_as::<_, AuditRecord>(&sql)
        .bind(id.as_i64())
        .fetch_optional(pool)
        .await?;
    Ok(record)
}

/// Retrieve one ordered page of records matching the filters.
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn query(
    pool: &SqlitePool,
    filter: &AuditFilter,
    sort: SortKey,
    dir: SortDir,
    limit: i64,
    offset: i64,
) -> Result<Vec<AuditRecord>, RepositoryError> {
    let mut sql = String::from(SELECT_COLUMNS);
    sql.push_str(&where_clause(filter));
    sql.push_str(order_clause(sort, dir));
    sql.push_str(" LIMIT ? OFFSET ?");

    let records = bind_filters(sqlx::query_as::<_, AuditRecord>(&sql), filter)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(records)
}

/// Count records matching the filters (same filter set, no sort/pagination).
///
/// # Errors
///
/// Returns error if the database query fails.
pub async fn count(pool: &SqlitePool, filter: &AuditFilter) -> Result<i64, RepositoryError> {
    let mut sql = String::from("SELECT COUNT(*) FROM audit_log");
    sql.push_str(&where_clause(filter));

    let (total,): (i64,) = bind_filters(sqlx::query_as(&sql), filter)
        .fetch_one(pool)
        .await?;
    Ok(total)
}

/// Delete records older than `retention_days`; returns the deleted-row count.
///
/// Idempotent and safe to run concurrently with writes: new records are never
/// older than the cutoff.
///
/// # Errors
///
/// Returns error if the database delete fails.
#[instrument(skip(pool))]
pub async fn cleanup(pool: &SqlitePool, retention_days: u32) -> Result<u64, RepositoryError> {
    let cutoff = Utc::now() - Duration::days(i64::from(retention_days));
    let result = sqlx::query("DELETE FROM audit_log WHERE created_at < ?")
        .bind(cutoff)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Bind active filter values in the exact order `where_clause` emitted their
/// placeholders.
fn bind_filters<'q, O>(
    mut query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    filter: &'q AuditFilter,
) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
    if let Some(actor_id) = filter.actor_id {
        query = query.bind(actor_id.as_i64());
    }
    if let Some(actor_type) = filter.actor_type {
        query = query.bind(actor_type);
    }
    if let Some(action_type) = filter.action_type.as_deref() {
        query = query.bind(action_type);
    }
    if let Some(action_category) = filter.action_category.as_deref() {
        query = query.bind(action_category);
    }
    if let Some(status) = filter.status {
        query = query.bind(status);
    }
    if let Some(object_type) = filter.object_type.as_deref() {
        query = query.bind(object_type);
    }
    if let Some(object_id) = filter.object_id.as_deref() {
        query = query.bind(object_id);
    }
    if let Some(created_after) = filter.created_after {
        query = query.bind(created_after);
    }
    if let Some(created_before) = filter.created_before {
        query = query.bind(created_before);
    }
    if let Some(search) = filter.search.as_deref() {
        let pattern = format!("%{}%", search.to_lowercase());
        query = query.bind(pattern.clone()).bind(pattern);
    }
    query
}
