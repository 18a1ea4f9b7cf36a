//! HTTP routes for the agent service.

pub mod abilities;
pub mod audit;

use axum::Router;
use axum::routing::{get, post};

use crate::state::AppState;

/// Assemble the agent's route tree.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/abilities", get(abilities::schema))
        .route("/abilities/categories", get(abilities::categories))
        .route("/abilities/execute", post(abilities::execute))
        .route("/audit", get(audit::list))
        .route("/audit/export", get(audit::export))
}
