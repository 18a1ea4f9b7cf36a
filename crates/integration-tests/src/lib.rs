//! Integration tests for Storemind.
//!
//! The tests drive the full agent stack - catalog, gate, dispatcher, audit
//! store, HTTP routes - over in-memory `SQLite` pools, so no external server
//! or database is required.
//!
//! # Test Categories
//!
//! - `agent_dispatch` - end-to-end dispatch scenarios
//! - `agent_audit_query` - audit writer, query engine, and retention
//! - `agent_schema_export` - actor-scoped schema export
//! - `agent_http_api` - route-level tests via `tower::ServiceExt::oneshot`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use secrecy::SecretString;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use storemind_agent::abilities::{
    Ability, AbilityCatalog, ArgMap, AuthorizationGate, FnHandler, ParamType, Parameter,
};
use storemind_agent::config::AgentConfig;
use storemind_agent::db;
use storemind_agent::state::AppState;
use storemind_core::Permission;

/// Fresh, migrated in-memory audit store.
///
/// A single connection keeps every handle on the same in-memory database.
///
/// # Panics
///
/// Panics if the pool cannot be created or migrations fail; tests cannot
/// proceed without a store.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    db::run_migrations(&pool).await.expect("migrations");
    pool
}

/// Configuration stub pointing at an in-memory store.
#[must_use]
pub fn test_config() -> AgentConfig {
    AgentConfig {
        database_url: SecretString::from("sqlite::memory:"),
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
        audit_retention_days: 90,
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Shared application state over the given pool and catalog.
#[must_use]
pub fn test_state(pool: SqlitePool, catalog: AbilityCatalog) -> AppState {
    AppState::new(
        test_config(),
        pool,
        catalog,
        AuthorizationGate::with_default_roles(),
    )
}

/// `demo/echo`: read-gated, one required string parameter, echoes it back.
#[must_use]
pub fn echo_ability() -> Ability {
    Ability::new(
        "demo/echo",
        "Echo",
        "Echo a message back to the caller.",
        "store",
        Arc::new(FnHandler::new(|args: &ArgMap| {
            Ok(json!({"echo": args.get("msg").cloned().unwrap_or(Value::Null)}))
        })),
    )
    .with_permission(Permission::Read)
    .with_parameters(vec![Parameter::required(
        "msg",
        ParamType::String,
        "Message to echo",
    )])
}

/// `storemind/orders/cancel`: manage-gated write with the advisory flags set.
#[must_use]
pub fn cancel_order_ability() -> Ability {
    Ability::new(
        "storemind/orders/cancel",
        "Cancel order",
        "Cancel an open order.",
        "orders",
        Arc::new(FnHandler::new(|args: &ArgMap| {
            Ok(json!({"cancelled": args.get("order_id").cloned().unwrap_or(Value::Null)}))
        })),
    )
    .confirmed()
    .destructive()
    .with_parameters(vec![Parameter::required(
        "order_id",
        ParamType::Integer,
        "The order ID",
    )])
}

/// Catalog pre-loaded with the standard test abilities.
#[must_use]
pub fn test_catalog() -> AbilityCatalog {
    let catalog = AbilityCatalog::new();
    assert!(catalog.register(echo_ability()));
    assert!(catalog.register(cancel_order_ability()));
    catalog
}

/// Argument map literal helper.
#[must_use]
pub fn args(pairs: &[(&str, Value)]) -> ArgMap {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}
