//! Filter and sort vocabulary for the audit query surface.
//!
//! Filter and sort parameters originate from untrusted HTTP input. Values are
//! only ever bound as SQL parameters; identifiers (sort key, direction) go
//! through the closed whitelist in [`order_clause`], which maps every
//! supported combination to a fully static `ORDER BY` fragment. Nothing the
//! caller supplies is ever interpolated into the query text.

use chrono::{DateTime, Utc};
use storemind_core::{ActorId, ActorType};

use super::record::AuditStatus;

/// Optional, AND-combined audit filters.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Match one invoking principal.
    pub actor_id: Option<ActorId>,
    /// Match one principal classification.
    pub actor_type: Option<ActorType>,
    /// Match one action type (final id segment).
    pub action_type: Option<String>,
    /// Match one action category.
    pub action_category: Option<String>,
    /// Match one dispatch outcome.
    pub status: Option<AuditStatus>,
    /// Match one denormalized object type.
    pub object_type: Option<String>,
    /// Match one denormalized object id.
    pub object_id: Option<String>,
    /// Lower creation-time bound (inclusive).
    pub created_after: Option<DateTime<Utc>>,
    /// Upper creation-time bound (inclusive).
    pub created_before: Option<DateTime<Utc>>,
    /// Case-insensitive substring match over description OR ability id.
    pub search: Option<String>,
}

/// Whitelisted sort keys for audit queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Sort by insert time (default).
    #[default]
    CreatedAt,
    /// Sort by action type.
    ActionType,
    /// Sort by dispatch outcome.
    Status,
    /// Sort by invoking principal.
    ActorId,
}

impl SortKey {
    /// Parse a caller-supplied sort key.
    ///
    /// Values outside the whitelist silently fall back to `created_at`.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("action_type") => Self::ActionType,
            Some("status") => Self::Status,
            Some("actor_id") => Self::ActorId,
            _ => Self::CreatedAt,
        }
    }
}

/// Sort direction for audit queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    /// Oldest (or lowest) first.
    Asc,
    /// Newest (or highest) first (default).
    #[default]
    Desc,
}

impl SortDir {
    /// Parse a caller-supplied direction; invalid values default to
    /// descending.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("asc") => Self::Asc,
            _ => Self::Desc,
        }
    }
}

/// Static `ORDER BY` fragment for one whitelisted (key, direction) pair.
///
/// The record id breaks ties so pagination is deterministic even when many
/// records share one timestamp.
#[must_use]
pub const fn order_clause(key: SortKey, dir: SortDir) -> &'static str {
    match (key, dir) {
        (SortKey::CreatedAt, SortDir::Asc) => " ORDER BY created_at ASC, id ASC",
        (SortKey::CreatedAt, SortDir::Desc) => " ORDER BY created_at DESC, id DESC",
        (SortKey::ActionType, SortDir::Asc) => " ORDER BY action_type ASC, id ASC",
        (SortKey::ActionType, SortDir::Desc) => " ORDER BY action_type DESC, id DESC",
        (SortKey::Status, SortDir::Asc) => " ORDER BY status ASC, id ASC",
        (SortKey::Status, SortDir::Desc) => " ORDER BY status DESC, id DESC",
        (SortKey::ActorId, SortDir::Asc) => " ORDER BY actor_id ASC, id ASC",
        (SortKey::ActorId, SortDir::Desc) => " ORDER BY actor_id DESC, id DESC",
    }
}

/// `WHERE` clause assembled from fixed fragments, one `?` per active filter.
///
/// Must stay in lockstep with `bind_filters` in the store module: both walk
/// the filters in the same order.
#[must_use]
pub fn where_clause(filter: &AuditFilter) -> String {
    let mut sql = String::from(" WHERE 1=1");
    if filter.actor_id.is_some() {
        sql.push_str(" AND actor_id = ?");
    }
    if filter.actor_type.is_some() {
        sql.push_str(" AND actor_type = ?");
    }
    if filter.action_type.is_some() {
        sql.push_str(" AND action_type = ?");
    }
    if filter.action_category.is_some() {
        sql.push_str(" AND action_category = ?");
    }
    if filter.status.is_some() {
        sql.push_str(" AND status = ?");
    }
    if filter.object_type.is_some() {
        sql.push_str(" AND object_type = ?");
    }
    if filter.object_id.is_some() {
        sql.push_str(" AND object_id = ?");
    }
    if filter.created_after.is_some() {
        sql.push_str(" AND created_at >= ?");
    }
    if filter.created_before.is_some() {
        sql.push_str(" AND created_at <= ?");
    }
    if filter.search.is_some() {
        sql.push_str(" AND (LOWER(description) LIKE ? OR LOWER(ability_id) LIKE ?)");
    }
    sql
}
