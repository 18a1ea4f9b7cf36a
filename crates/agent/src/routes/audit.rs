//! Audit read API: paged JSON listing and CSV export.
//!
//! Filter, sort, and pagination parameters arrive as untrusted query input.
//! Filter values are parsed into typed filters and only ever bound as SQL
//! parameters; sort parameters go through the query engine's whitelist, with
//! out-of-whitelist values silently falling back to `created_at DESC`.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audit::record::AuditRecord;
use crate::audit::{AuditFilter, SortDir, SortKey, store};
use crate::error::AppError;
use crate::state::AppState;

/// Hard cap on `per_page`, enforced by this calling layer.
const MAX_PER_PAGE: i64 = 100;
/// Default page size.
const DEFAULT_PER_PAGE: i64 = 25;
/// Row cap for one CSV export.
const EXPORT_MAX_ROWS: i64 = 10_000;

/// Query parameters accepted by the audit read API.
#[derive(Debug, Default, Deserialize)]
pub struct AuditQueryParams {
    /// 1-based page number (default 1).
    pub page: Option<i64>,
    /// Page size, clamped to 100 (default 25).
    pub per_page: Option<i64>,
    /// Sort key; values outside the whitelist fall back to `created_at`.
    pub order_by: Option<String>,
    /// Sort direction; invalid values fall back to descending.
    pub order_dir: Option<String>,
    /// Filter: invoking principal id.
    pub actor_id: Option<i64>,
    /// Filter: principal classification.
    pub actor_type: Option<String>,
    /// Filter: action type (final id segment).
    pub action_type: Option<String>,
    /// Filter: action category.
    pub action_category: Option<String>,
    /// Filter: dispatch outcome.
    pub status: Option<String>,
    /// Filter: denormalized object type.
    pub object_type: Option<String>,
    /// Filter: denormalized object id.
    pub object_id: Option<String>,
    /// Filter: creation-time lower bound (RFC 3339).
    pub after: Option<DateTime<Utc>>,
    /// Filter: creation-time upper bound (RFC 3339).
    pub before: Option<DateTime<Utc>>,
    /// Filter: case-insensitive substring over description or ability id.
    pub search: Option<String>,
}

/// One page of audit records plus pagination totals.
#[derive(Debug, Serialize)]
pub struct AuditListResponse {
    /// Records on this page, in the requested order.
    pub records: Vec<AuditRecord>,
    /// Total records matching the filters.
    pub total: i64,
    /// 1-based page number served.
    pub page: i64,
    /// Page size served.
    pub per_page: i64,
    /// Total pages for the filtered set.
    pub total_pages: i64,
}

/// `GET /audit` - paged, filtered, sorted audit records.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<AuditQueryParams>,
) -> Result<Json<AuditListResponse>, AppError> {
    let filter = parse_filter(&params)?;
    let sort = SortKey::parse(params.order_by.as_deref());
    let dir = SortDir::parse(params.order_dir.as_deref());

    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
    let offset = (page - 1) * per_page;

    let records = store::query(state.pool(), &filter, sort, dir, per_page, offset).await?;
    let total = store::count(state.pool(), &filter).await?;

    Ok(Json(AuditListResponse {
        records,
        total,
        page,
        per_page,
        total_pages: (total + per_page - 1) / per_page,
    }))
}

/// `GET /audit/export` - the filtered set serialized as CSV.
pub async fn export(
    State(state): State<AppState>,
    Query(params): Query<AuditQueryParams>,
) -> Result<Response, AppError> {
    let filter = parse_filter(&params)?;
    let sort = SortKey::parse(params.order_by.as_deref());
    let dir = SortDir::parse(params.order_dir.as_deref());

    let records = store::query(state.pool(), &filter, sort, dir, EXPORT_MAX_ROWS, 0).await?;

    let mut body = String::from(
        "id,actor_id,actor_type,action_type,action_category,description,ability_id,status,ip_address,created_at\n",
    );
    for record in &records {
        let row = [
            record.id.to_string(),
            record.actor_id.to_string(),
            record.actor_type.to_string(),
            record.action_type.clone(),
            record.action_category.clone(),
            record.description.clone(),
            record.ability_id.clone(),
            record.status.to_string(),
            record.ip_address.clone().unwrap_or_default(),
            record.created_at.to_rfc3339(),
        ];
        let line: Vec<String> = row.iter().map(|field| csv_escape(field)).collect();
        body.push_str(&line.join(","));
        body.push('\n');
    }

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"audit-log.csv\"",
            ),
        ],
        body,
    )
        .into_response())
}

/// Parse typed filters out of the raw query parameters.
fn parse_filter(params: &AuditQueryParams) -> Result<AuditFilter, AppError> {
    let actor_type = params
        .actor_type
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(|e| AppError::BadRequest(format!("{e}")))?;
    let status = params
        .status
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(|e| AppError::BadRequest(format!("{e}")))?;

    Ok(AuditFilter {
        actor_id: params.actor_id.map(Into::into),
        actor_type,
        action_type: params.action_type.clone(),
        action_category: params.action_category.clone(),
        status,
        object_type: params.object_type.clone(),
        object_id: params.object_id.clone(),
        created_after: params.after,
        created_before: params.before,
        search: params.search.clone(),
    })
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_escape_plain_field() {
        assert_eq!(csv_escape("viewed order"), "viewed order");
    }

    #[test]
    fn test_csv_escape_delimiters_and_quotes() {
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_escape("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn test_parse_filter_rejects_unknown_actor_type() {
        let params = AuditQueryParams {
            actor_type: Some("robot".to_string()),
            ..AuditQueryParams::default()
        };
        assert!(parse_filter(&params).is_err());
    }

    #[test]
    fn test_parse_filter_accepts_known_values() {
        let params = AuditQueryParams {
            actor_type: Some("admin".to_string()),
            status: Some("success".to_string()),
            action_category: Some("orders".to_string()),
            ..AuditQueryParams::default()
        };
        let filter = parse_filter(&params).expect("valid filter");
        assert!(filter.actor_type.is_some());
        assert!(filter.status.is_some());
        assert_eq!(filter.action_category.as_deref(), Some("orders"));
    }
}
