//! Unified error handling for the agent service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::abilities::DispatchError;
use crate::db::RepositoryError;

/// Application-level error type for the agent service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Ability dispatch failed.
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Agent request error"
            );
        }

        let status = match &self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Dispatch(e) => match e {
                DispatchError::AbilityNotFound(_) => StatusCode::NOT_FOUND,
                DispatchError::Forbidden(_) => StatusCode::FORBIDDEN,
                DispatchError::InvalidArguments(_) => StatusCode::UNPROCESSABLE_ENTITY,
                DispatchError::ExecutionFault(_) => StatusCode::BAD_GATEWAY,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Dispatch(e) => e.to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}
