//! Schema export: the actor-scoped, LLM-consumable function list.
//!
//! Projects the catalog into the function-calling shape the orchestration
//! layer feeds to the model: one entry per ability the actor is authorized
//! for, with a JSON-Schema object describing the declared parameters.
//! Repeated calls with the same actor and catalog state produce identical
//! output.

use serde::Serialize;
use serde_json::{Value, json};
use storemind_core::Actor;

use super::catalog::AbilityCatalog;
use super::gate::AuthorizationGate;
use super::types::Ability;

/// One exported, invocable function definition.
#[derive(Debug, Clone, Serialize)]
pub struct ExportedAbility {
    /// The ability id, used verbatim as the callable function name.
    pub name: String,
    /// Human-readable description, exported verbatim.
    pub description: String,
    /// JSON-Schema object for the ability's parameters.
    pub input_schema: Value,
}

/// Projects the catalog, filtered by the actor's permissions, into a
/// function-calling schema.
pub struct SchemaExporter<'a> {
    catalog: &'a AbilityCatalog,
    gate: &'a AuthorizationGate,
}

impl<'a> SchemaExporter<'a> {
    /// Create an exporter over the shared catalog and gate.
    #[must_use]
    pub const fn new(catalog: &'a AbilityCatalog, gate: &'a AuthorizationGate) -> Self {
        Self { catalog, gate }
    }

    /// Export the functions `actor` may invoke, in catalog insertion order.
    #[must_use]
    pub fn export(&self, actor: &Actor) -> Vec<ExportedAbility> {
        self.catalog
            .list(None)
            .into_iter()
            .filter(|ability| self.gate.allows(actor, ability))
            .map(|ability| export_one(&ability))
            .collect()
    }
}

/// Project one ability into its exported shape.
fn export_one(ability: &Ability) -> ExportedAbility {
    ExportedAbility {
        name: ability.id.clone(),
        description: ability.description.clone(),
        input_schema: input_schema(ability),
    }
}

/// Build the JSON-Schema object for an ability's parameter contract.
fn input_schema(ability: &Ability) -> Value {
    let mut properties = serde_json::Map::new();
    for parameter in &ability.parameters {
        properties.insert(
            parameter.name.clone(),
            json!({
                "type": parameter.kind.as_str(),
                "description": parameter.description,
            }),
        );
    }
    let required: Vec<&str> = ability
        .parameters
        .iter()
        .filter(|p| p.required)
        .map(|p| p.name.as_str())
        .collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}
