//! Response types for the payroll run engine API.
//!
//! This module defines the structured error body every rejected operation
//! returns, and the mapping from [`EngineError`] to HTTP status codes.
//! Business-rule rejections surface their error kind verbatim; role denials
//! share the `InvalidTransition` kind but answer 403.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error kind for programmatic handling.
    pub error_kind: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(error_kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_kind: error_kind.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        error_kind: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            error_kind: error_kind.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("ValidationError", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MalformedJson", message)
    }

    /// Creates the 403 body for a caller with no usable role set.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::with_details(
            "InvalidTransition",
            message,
            "The caller's role set does not authorize this action",
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::InvalidTransition { .. } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::new("InvalidTransition", message),
            },
            EngineError::RoleNotAuthorized { .. } | EngineError::EventRoleNotAuthorized => {
                ApiErrorResponse {
                    status: StatusCode::FORBIDDEN,
                    error: ApiError::forbidden(message),
                }
            }
            EngineError::AlreadyAdjudicated { .. } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::with_details(
                    "AlreadyAdjudicated",
                    message,
                    "The event reached a terminal status; refresh and create a new event if a correction is needed",
                ),
            },
            EngineError::GateNotSatisfied { .. } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::new("GateNotSatisfied", message),
            },
            EngineError::ConcurrentModification { .. } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::with_details(
                    "ConcurrentModification",
                    message,
                    "Refetch the run and retry once with the current version",
                ),
            },
            EngineError::ValidationError { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("ValidationError", message),
            },
            EngineError::RunNotFound { .. } | EngineError::EventNotFound { .. } => {
                ApiErrorResponse {
                    status: StatusCode::NOT_FOUND,
                    error: ApiError::new("NotFound", message),
                }
            }
            EngineError::RosterUnavailable { .. } => ApiErrorResponse {
                status: StatusCode::SERVICE_UNAVAILABLE,
                error: ApiError::with_details(
                    "RosterUnavailable",
                    message,
                    "Infrastructure failure; retry with backoff, the run state is unchanged",
                ),
            },
            EngineError::PolicyNotFound { .. } | EngineError::PolicyParseError { .. } => {
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::new("ConfigError", message),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, RunAction, RunStatus};
    use uuid::Uuid;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TestError", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"error_kind\":\"TestError\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_invalid_transition_maps_to_409() {
        let engine_error = EngineError::InvalidTransition {
            action: RunAction::Lock,
            status: RunStatus::Created,
        };
        let response: ApiErrorResponse = engine_error.into();
        assert_eq!(response.status, StatusCode::CONFLICT);
        assert_eq!(response.error.error_kind, "InvalidTransition");
    }

    #[test]
    fn test_role_denial_maps_to_403_with_invalid_transition_kind() {
        let engine_error = EngineError::RoleNotAuthorized {
            action: RunAction::Lock,
            required: Role::PayrollManager,
        };
        let response: ApiErrorResponse = engine_error.into();
        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert_eq!(response.error.error_kind, "InvalidTransition");
    }

    #[test]
    fn test_concurrent_modification_maps_to_409() {
        let engine_error = EngineError::ConcurrentModification {
            run_id: Uuid::nil(),
            expected: 1,
            found: 2,
        };
        let response: ApiErrorResponse = engine_error.into();
        assert_eq!(response.status, StatusCode::CONFLICT);
        assert_eq!(response.error.error_kind, "ConcurrentModification");
    }

    #[test]
    fn test_roster_unavailable_maps_to_503() {
        let engine_error = EngineError::RosterUnavailable {
            entity: "entity_a".to_string(),
            message: "timeout".to_string(),
        };
        let response: ApiErrorResponse = engine_error.into();
        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.error.error_kind, "RosterUnavailable");
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let engine_error = EngineError::RunNotFound { run_id: Uuid::nil() };
        let response: ApiErrorResponse = engine_error.into();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.error.error_kind, "NotFound");
    }
}
