//! The ability dispatcher: one end-to-end dispatch attempt.
//!
//! Sequence (fail-fast, first violation wins): catalog lookup, authorization,
//! validation, handler invocation. Request-shape failures (unknown ability,
//! forbidden, invalid arguments) return before any audit write; every
//! dispatch that reaches the handler writes exactly one terminal audit
//! record. The audit write is best-effort relative to the primary operation:
//! a store failure is logged, never propagated over a successful execution.

use serde_json::Value;
use sqlx::SqlitePool;
use storemind_core::Actor;
use tracing::{error, instrument};

use crate::audit::record::{AuditStatus, NewAuditRecord};
use crate::audit::store;

use super::catalog::AbilityCatalog;
use super::error::DispatchError;
use super::gate::AuthorizationGate;
use super::types::{Ability, ArgMap};
use super::validator;

/// Orchestrates catalog lookup, authorization, validation, handler
/// invocation, and audit recording for a single ability call.
pub struct AbilityDispatcher<'a> {
    catalog: &'a AbilityCatalog,
    gate: &'a AuthorizationGate,
    pool: &'a SqlitePool,
}

impl<'a> AbilityDispatcher<'a> {
    /// Create a dispatcher over the shared catalog, gate, and audit store.
    #[must_use]
    pub const fn new(
        catalog: &'a AbilityCatalog,
        gate: &'a AuthorizationGate,
        pool: &'a SqlitePool,
    ) -> Self {
        Self {
            catalog,
            gate,
            pool,
        }
    }

    /// Execute one ability dispatch for `actor`.
    ///
    /// Returns the handler's payload on success. Handler payloads carrying
    /// application-level error data still count as successful dispatches;
    /// only an unexpected handler fault maps to
    /// [`DispatchError::ExecutionFault`], which is also recorded as a failed
    /// audit entry with the fault message captured as the result.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::AbilityNotFound`], [`DispatchError::Forbidden`],
    /// or [`DispatchError::InvalidArguments`] for request-shape violations
    /// (no audit record is written for these), and
    /// [`DispatchError::ExecutionFault`] when the handler fails.
    #[instrument(skip(self, args, actor), fields(ability = %ability_id, actor_type = %actor.actor_type))]
    pub async fn execute(
        &self,
        ability_id: &str,
        args: &ArgMap,
        actor: &Actor,
    ) -> Result<Value, DispatchError> {
        let ability = self
            .catalog
            .get(ability_id)
            .ok_or_else(|| DispatchError::AbilityNotFound(ability_id.to_string()))?;

        self.gate.authorize(actor, &ability)?;
        validator::validate(&ability, args)?;

        let args = merge_defaults(&ability, args);
        match ability.handler.invoke(&args).await {
            Ok(value) => {
                let result = serde_json::to_string(&value).ok();
                self.record(&ability, actor, &args, AuditStatus::Success, result)
                    .await;
                Ok(value)
            }
            Err(fault) => {
                let message = fault.to_string();
                self.record(
                    &ability,
                    actor,
                    &args,
                    AuditStatus::Failed,
                    Some(message.clone()),
                )
                .await;
                Err(DispatchError::ExecutionFault(message))
            }
        }
    }

    /// Write the terminal audit record; never fails the dispatch.
    async fn record(
        &self,
        ability: &Ability,
        actor: &Actor,
        args: &ArgMap,
        status: AuditStatus,
        result: Option<String>,
    ) {
        let record = NewAuditRecord::from_dispatch(ability, actor, args, status, result);
        if let Err(e) = store::write(self.pool, record).await {
            error!(error = %e, ability = %ability.id, "audit write failed; primary result preserved");
        }
    }
}

/// Merge declared parameter defaults into the supplied arguments.
fn merge_defaults(ability: &Ability, args: &ArgMap) -> ArgMap {
    let mut merged = args.clone();
    for parameter in &ability.parameters {
        if let Some(default) = &parameter.default {
            merged
                .entry(parameter.name.clone())
                .or_insert_with(|| default.clone());
        }
    }
    merged
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::abilities::types::{FnHandler, ParamType, Parameter};

    use super::*;

    #[test]
    fn test_merge_defaults_fills_absent_only() {
        let ability = Ability::new(
            "demo/echo",
            "Echo",
            "",
            "store",
            Arc::new(FnHandler::new(|_args| Ok(json!(null)))),
        )
        .with_parameters(vec![
            Parameter::optional("limit", ParamType::Integer, "").with_default(json!(10)),
            Parameter::optional("verbose", ParamType::Boolean, "").with_default(json!(false)),
        ]);

        let mut supplied = ArgMap::new();
        supplied.insert("limit".to_string(), json!(3));

        let merged = merge_defaults(&ability, &supplied);
        assert_eq!(merged.get("limit"), Some(&json!(3)));
        assert_eq!(merged.get("verbose"), Some(&json!(false)));
    }
}
