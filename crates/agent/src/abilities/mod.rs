//! The ability registry: declarative, schema-validated command dispatch.
//!
//! Store operations are exposed to the AI agent as *abilities*: named,
//! schema-described, permission-gated operations registered into the
//! [`AbilityCatalog`] during startup by integration modules. Every invocation
//! flows registration -> validation -> authorization -> execution -> audit
//! write; the [`SchemaExporter`] independently projects the catalog into the
//! function list handed to the model each turn.

mod catalog;
mod dispatcher;
mod error;
mod gate;
mod schema;
mod types;
mod validator;

pub use catalog::{AbilityCatalog, Category};
pub use dispatcher::AbilityDispatcher;
pub use error::{DispatchError, HandlerError, ValidationError};
pub use gate::{AuthorizationGate, CapabilityCheck, RoleCapabilities};
pub use schema::{ExportedAbility, SchemaExporter};
pub use types::{Ability, AbilityHandler, ArgMap, FnHandler, ParamType, Parameter};
pub use validator::validate;
