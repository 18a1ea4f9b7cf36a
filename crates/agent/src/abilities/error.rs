//! Error taxonomy for ability dispatch.

use thiserror::Error;

use super::types::ParamType;

/// Fault raised by an ability handler.
///
/// Handlers return application-level errors ("order not found") as data in
/// their `Ok` payload; this type is reserved for unexpected faults, which are
/// audited as failed dispatches.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    /// Create a fault from any displayable source.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

/// Argument validation failure.
///
/// The first failing parameter in declaration order is reported; one
/// violation is sufficient to fail the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required parameter was absent from the supplied arguments.
    #[error("missing required parameter: {0}")]
    MissingParameter(String),

    /// A supplied parameter did not match its declared type.
    #[error("invalid value for parameter {name}: expected {expected}")]
    InvalidParameterType {
        /// Name of the offending parameter.
        name: String,
        /// The declared type it failed to match.
        expected: ParamType,
    },
}

/// Errors surfaced by one dispatch attempt.
///
/// The first three are request-shape errors: surfaced directly to the caller,
/// no audit record, no retry. `ExecutionFault` is additionally recorded as a
/// failed audit entry with the fault message captured as the result.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No ability is registered under the requested id.
    #[error("unknown ability: {0}")]
    AbilityNotFound(String),

    /// The actor does not hold the ability's required capability.
    #[error("actor is not permitted to invoke {0}")]
    Forbidden(String),

    /// The supplied arguments violate the declared parameter contract.
    #[error("invalid arguments: {0}")]
    InvalidArguments(#[from] ValidationError),

    /// The handler raised an unexpected fault. The caller sees a generic
    /// execution error; the fault detail lives on the audit record.
    #[error("ability execution failed")]
    ExecutionFault(String),
}
