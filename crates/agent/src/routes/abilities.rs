//! Ability surface: actor-scoped schema export and dispatch.
//!
//! The orchestration layer calls `GET /abilities` once per model turn to
//! build the function list, and `POST /abilities/execute` once per tool call.

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use storemind_core::{Actor, ActorId};

use crate::abilities::{ArgMap, Category, ExportedAbility};
use crate::error::AppError;
use crate::state::AppState;

/// Query parameters scoping a schema export to one actor.
#[derive(Debug, Deserialize)]
pub struct SchemaQuery {
    /// Principal classification (`admin`, `customer`, `guest`, `system`).
    pub actor_type: String,
    /// Principal id (default 0).
    pub actor_id: Option<i64>,
}

/// `GET /abilities` - the function list the actor may invoke.
pub async fn schema(
    State(state): State<AppState>,
    Query(query): Query<SchemaQuery>,
) -> Result<Json<Vec<ExportedAbility>>, AppError> {
    let actor_type = query
        .actor_type
        .parse()
        .map_err(|e| AppError::BadRequest(format!("{e}")))?;
    let actor = Actor::new(
        ActorId::new(query.actor_id.unwrap_or(0)),
        actor_type,
    );
    Ok(Json(state.exporter().export(&actor)))
}

/// `GET /abilities/categories` - the category label set.
pub async fn categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.catalog().categories())
}

/// One dispatch request from the orchestration layer.
#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    /// Id of the ability to invoke.
    pub ability: String,
    /// Arguments for the ability's declared parameters.
    #[serde(default)]
    pub args: ArgMap,
    /// The invoking principal.
    pub actor: Actor,
}

/// Dispatch outcome returned to the orchestration layer.
#[derive(Debug, Serialize)]
pub struct ExecuteResponse {
    /// The handler's payload.
    pub result: Value,
}

/// `POST /abilities/execute` - one ability dispatch.
pub async fn execute(
    State(state): State<AppState>,
    Json(request): Json<ExecuteRequest>,
) -> Result<Json<ExecuteResponse>, AppError> {
    let result = state
        .dispatcher()
        .execute(&request.ability, &request.args, &request.actor)
        .await?;
    Ok(Json(ExecuteResponse { result }))
}
