//! Error handling for the Kinship server

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kinship::{KinshipError, relationships::RelationshipError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Server error types
#[derive(Debug, Error)]
pub enum ServerError {
    /// Kinship library error
    #[error(transparent)]
    Kinship(#[from] KinshipError),

    /// Missing or invalid credentials
    #[error("{0}")]
    Auth(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<RelationshipError> for ServerError {
    fn from(err: RelationshipError) -> Self {
        ServerError::Kinship(KinshipError::Relationship(err))
    }
}

impl ServerError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Auth(_) => StatusCode::UNAUTHORIZED,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Kinship(err) => match err {
                KinshipError::BadValues(_) => StatusCode::BAD_REQUEST,
                KinshipError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
                KinshipError::NotAllowed(_) => StatusCode::FORBIDDEN,
                KinshipError::NotFound(_) => StatusCode::NOT_FOUND,
                KinshipError::AlreadyExists(_) => StatusCode::CONFLICT,
                KinshipError::Relationship(rel) => match rel {
                    RelationshipError::BadValues { .. } => StatusCode::BAD_REQUEST,
                    RelationshipError::RequestNotFound { .. }
                    | RelationshipError::RelationNotFound { .. } => StatusCode::NOT_FOUND,
                    RelationshipError::AlreadyRequested { .. }
                    | RelationshipError::AlreadyRelated { .. } => StatusCode::CONFLICT,
                    RelationshipError::PartialFailure { .. }
                    | RelationshipError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                },
                KinshipError::Storage(_)
                | KinshipError::Configuration(_)
                | KinshipError::Logging(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Get the error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            ServerError::Auth(_) => "unauthenticated",
            ServerError::Internal(_) => "internal_error",
            ServerError::Kinship(err) => match err {
                KinshipError::BadValues(_) => "bad_values",
                KinshipError::Unauthenticated(_) => "unauthenticated",
                KinshipError::NotAllowed(_) => "not_allowed",
                KinshipError::NotFound(_) => "not_found",
                KinshipError::AlreadyExists(_) => "already_exists",
                KinshipError::Relationship(rel) => rel.code(),
                KinshipError::Storage(_) => "storage_error",
                KinshipError::Configuration(_) => "configuration_error",
                KinshipError::Logging(_) => "logging_error",
            },
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ServerError::Kinship(KinshipError::Relationship(rel)) => Some(json!({
                "kind": rel.kind(),
                "identities": rel.identities(),
            })),
            _ => None,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let error_response = ErrorResponse {
            error: self.error_type().to_string(),
            message: self.to_string(),
            details: self.details(),
        };

        (status, Json(error_response)).into_response()
    }
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

/// Helper function to create an authentication error
pub fn unauthenticated(message: &str) -> ServerError {
    ServerError::Auth(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found_request() -> ServerError {
        RelationshipError::RequestNotFound {
            kind: "follow".to_string(),
            from: "alice".to_string(),
            to: "bob".to_string(),
        }
        .into()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ServerError::from(KinshipError::BadValues("x".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::from(KinshipError::NotAllowed("x".into())).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ServerError::from(KinshipError::Unauthenticated("x".into())).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServerError::from(KinshipError::AlreadyExists("x".into())).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(not_found_request().status_code(), StatusCode::NOT_FOUND);

        let partial: ServerError = RelationshipError::PartialFailure {
            kind: "monitor".to_string(),
            operation: "accept",
            from: "a".to_string(),
            to: "b".to_string(),
            cause: "boom".to_string(),
            compensation: "boom".to_string(),
        }
        .into();
        assert_eq!(partial.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(partial.error_type(), "partial_failure");
    }

    #[test]
    fn test_relationship_details() {
        let err = not_found_request();
        assert_eq!(err.error_type(), "request_not_found");

        let details = err.details().unwrap();
        assert_eq!(details["kind"], "follow");
        assert_eq!(details["identities"], json!(["alice", "bob"]));
        assert_eq!(err.to_string(), "follow request from alice to bob does not exist!");
    }
}
