//! Ability definitions: metadata, parameter contracts, and the handler seam.
//!
//! An [`Ability`] is one named store operation an AI agent may invoke. The
//! declarative parts (name, description, category, parameter contract,
//! required permission, advisory flags) drive validation, authorization, and
//! schema export; the [`AbilityHandler`] bound at registration time does the
//! actual work and is exclusively owned by the catalog entry.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use storemind_core::Permission;

use super::error::HandlerError;

/// Argument map supplied with a dispatch.
///
/// Parameter sets are declared dynamically per ability, so arguments stay an
/// open-ended ordered map validated against the declared contract rather than
/// a compiled struct.
pub type ArgMap = serde_json::Map<String, Value>;

/// The single-method contract every concrete ability implementation satisfies.
///
/// Handlers return their payload as JSON. An `Ok` value is the ability's
/// result even when it carries an application-level error object ("order not
/// found" is data, not a crash); `Err` signals an unexpected fault and is
/// audited as a failed dispatch.
#[async_trait]
pub trait AbilityHandler: Send + Sync {
    /// Execute the ability with validated, default-merged arguments.
    async fn invoke(&self, args: &ArgMap) -> Result<Value, HandlerError>;
}

/// Adapter turning a plain closure into an [`AbilityHandler`].
///
/// Concrete store abilities implement the trait directly; this adapter keeps
/// registration lightweight for simple lookups and for tests.
pub struct FnHandler<F>(F);

impl<F> FnHandler<F>
where
    F: Fn(&ArgMap) -> Result<Value, HandlerError> + Send + Sync,
{
    /// Wrap a closure as a handler.
    pub const fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> AbilityHandler for FnHandler<F>
where
    F: Fn(&ArgMap) -> Result<Value, HandlerError> + Send + Sync,
{
    async fn invoke(&self, args: &ArgMap) -> Result<Value, HandlerError> {
        (self.0)(args)
    }
}

/// Declared type of one ability parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// Whole number; accepts any numeric-coercible value.
    Integer,
    /// Textual value.
    String,
    /// Boolean; also accepts the literal set `{"true","false","0","1",0,1}`.
    Boolean,
    /// Sequence value.
    Array,
    /// Any numeric value.
    Number,
}

impl ParamType {
    /// JSON-Schema type name, as emitted by the schema exporter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Number => "number",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared parameter of an ability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name as supplied in the argument map.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub kind: ParamType,
    /// Whether a dispatch must supply this parameter.
    pub required: bool,
    /// Value merged into the arguments when the caller omits the parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Human-readable description, exported verbatim to the LLM schema.
    pub description: String,
}

impl Parameter {
    /// Declare a required parameter.
    #[must_use]
    pub fn required(name: impl Into<String>, kind: ParamType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            default: None,
            description: description.into(),
        }
    }

    /// Declare an optional parameter.
    #[must_use]
    pub fn optional(name: impl Into<String>, kind: ParamType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            default: None,
            description: description.into(),
        }
    }

    /// Attach a default value merged in when the caller omits the parameter.
    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

/// A registered, schema-described, permission-gated store operation.
#[derive(Clone)]
pub struct Ability {
    /// Globally unique, namespaced identifier (e.g. `storemind/orders/get`).
    pub id: String,
    /// Human-readable name, exported verbatim.
    pub name: String,
    /// Human-readable description, exported verbatim.
    pub description: String,
    /// Category key grouping this ability in listings.
    pub category: String,
    /// Ordered parameter contract.
    pub parameters: Vec<Parameter>,
    /// Capability the invoking actor must hold.
    pub permission: Permission,
    /// Advisory flag: the calling UI layer should confirm before invoking.
    pub requires_confirmation: bool,
    /// Advisory flag: the operation destroys data.
    pub is_destructive: bool,
    /// Bound implementation; never serialized.
    pub handler: Arc<dyn AbilityHandler>,
}

impl Ability {
    /// Create an ability with the default `manage` permission and no
    /// parameters; chain the `with_*` methods to fill in the contract.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        handler: Arc<dyn AbilityHandler>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category: category.into(),
            parameters: Vec::new(),
            permission: Permission::default(),
            requires_confirmation: false,
            is_destructive: false,
            handler,
        }
    }

    /// Set the ordered parameter contract.
    #[must_use]
    pub fn with_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Override the required capability (defaults to `manage`).
    #[must_use]
    pub const fn with_permission(mut self, permission: Permission) -> Self {
        self.permission = permission;
        self
    }

    /// Mark the ability as requiring caller-side confirmation.
    #[must_use]
    pub const fn confirmed(mut self) -> Self {
        self.requires_confirmation = true;
        self
    }

    /// Mark the ability as destructive.
    #[must_use]
    pub const fn destructive(mut self) -> Self {
        self.is_destructive = true;
        self
    }

    /// Final namespace segment of the id (`storemind/orders/get` -> `get`).
    #[must_use]
    pub fn action_type(&self) -> &str {
        self.id.rsplit('/').next().unwrap_or(&self.id)
    }

    /// Namespace segment before the action (`storemind/orders/get` ->
    /// `orders`); single-segment ids fall back to the id itself.
    #[must_use]
    pub fn action_category(&self) -> &str {
        let mut segments = self.id.rsplit('/');
        let action = segments.next().unwrap_or(&self.id);
        segments.next().unwrap_or(action)
    }

    /// Look up a declared parameter by name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

impl fmt::Debug for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ability")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("category", &self.category)
            .field("parameters", &self.parameters)
            .field("permission", &self.permission)
            .field("requires_confirmation", &self.requires_confirmation)
            .field("is_destructive", &self.is_destructive)
            .field("handler", &"<handler>")
            .finish_non_exhaustive()
    }
}
