//! Error taxonomy for the todo core
//!
//! Every port, domain rule and use case returns `DomainError`. Each variant maps
//! to exactly one `ErrorKind`, and the kind alone decides how the error is
//! surfaced at the boundary (status class, log severity, retryability).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::domain::entities::{TodoId, TodoStatus, UserId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{message}")]
    Validation {
        message: String,
        field: Option<&'static str>,
    },

    #[error("{message}")]
    UniqueConstraint {
        message: String,
        constraint: &'static str,
    },

    #[error("{message}")]
    StateTransition {
        message: String,
        current: TodoStatus,
        attempted: TodoStatus,
    },

    #[error("User with id {0} not found")]
    UserNotFound(UserId),

    #[error("Todo with id {0} not found")]
    TodoNotFound(TodoId),

    #[error("User with id {0} does not have permission to perform this operation")]
    PermissionDenied(UserId),

    #[error("Failed to establish connection to data persistence layer")]
    Connection {
        operation: &'static str,
        entity: &'static str,
        cause: String,
    },

    #[error("Failed to execute data operation in {operation}")]
    DataOperation {
        operation: &'static str,
        entity: &'static str,
        cause: String,
    },

    #[error("Internal error: {0}")]
    System(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation {
            message: message.into(),
            field: None,
        }
    }

    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        DomainError::Validation {
            message: message.into(),
            field: Some(field),
        }
    }

    pub fn state_transition(
        message: impl Into<String>,
        current: TodoStatus,
        attempted: TodoStatus,
    ) -> Self {
        DomainError::StateTransition {
            message: message.into(),
            current,
            attempted,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation { .. } => ErrorKind::Validation,
            DomainError::UniqueConstraint { .. } => ErrorKind::UniqueConstraint,
            DomainError::StateTransition { .. } => ErrorKind::StateTransition,
            DomainError::UserNotFound(_) | DomainError::TodoNotFound(_) => ErrorKind::NotFound,
            DomainError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            DomainError::Connection { .. } => ErrorKind::Connection,
            DomainError::DataOperation { .. } => ErrorKind::DataOperation,
            DomainError::System(_) => ErrorKind::System,
        }
    }

    /// Message safe to show to a caller. System kinds never leak storage details.
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Connection => "Service temporarily unavailable".to_string(),
            ErrorKind::DataOperation | ErrorKind::System => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }

    /// Structured context attached to business errors
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            DomainError::Validation {
                field: Some(field), ..
            } => Some(json!({ "field": field })),
            DomainError::UniqueConstraint { constraint, .. } => {
                Some(json!({ "constraint_name": constraint }))
            }
            DomainError::StateTransition {
                current, attempted, ..
            } => Some(json!({
                "current_state": current.to_string(),
                "attempted_state": attempted.to_string(),
            })),
            _ => None,
        }
    }
}

/// Log severity of an error kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// Flat classification of `DomainError`, used as the boundary mapping table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    UniqueConstraint,
    StateTransition,
    NotFound,
    PermissionDenied,
    Connection,
    DataOperation,
    System,
}

impl ErrorKind {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::UniqueConstraint | ErrorKind::StateTransition => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
            ErrorKind::Connection => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::DataOperation | ErrorKind::System => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            ErrorKind::Connection | ErrorKind::DataOperation | ErrorKind::System => {
                Severity::Error
            }
            _ => Severity::Warning,
        }
    }

    /// Whether the same request may succeed if simply repeated later
    pub fn retryable(self) -> bool {
        matches!(self, ErrorKind::Connection)
    }

    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::UniqueConstraint => "UNIQUE_CONSTRAINT",
            ErrorKind::StateTransition => "STATE_TRANSITION",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::PermissionDenied => "PERMISSION_DENIED",
            ErrorKind::Connection => "SERVICE_UNAVAILABLE",
            ErrorKind::DataOperation => "DATA_OPERATION_FAILED",
            ErrorKind::System => "INTERNAL_SERVER_ERROR",
        }
    }
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let kind = self.kind();

        match kind.severity() {
            Severity::Warning => tracing::warn!(kind = kind.code(), "{}", self),
            Severity::Error => match &self {
                DomainError::Connection {
                    operation,
                    entity,
                    cause,
                }
                | DomainError::DataOperation {
                    operation,
                    entity,
                    cause,
                } => tracing::error!(
                    kind = kind.code(),
                    operation = %operation,
                    entity = %entity,
                    cause = %cause,
                    "{}",
                    self
                ),
                _ => tracing::error!(kind = kind.code(), "{}", self),
            },
        }

        let body = Json(ErrorResponse {
            error: kind.code(),
            message: self.user_message(),
            details: self.details(),
        });

        (kind.status_code(), body).into_response()
    }
}
