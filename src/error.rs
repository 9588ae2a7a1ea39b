//! Error types for the todo service
//!
//! Request-level errors surfaced to callers. Cache tier failures live in
//! `cache::TierError` and never reach this type.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Service Error Enum ==
/// Unified request-level error type.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Malformed or missing request data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Referenced item does not exist in the owner's collection
    #[error("Not found: {0}")]
    NotFound(String),

    /// Source of record failed to load or persist
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// Request arrived without an authenticated owner identity
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),
}

/// Unreadable bodies and wrong content types are client input errors.
impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::InvalidInput(rejection.body_text())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ServiceError::InvalidInput(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Bad request", msg.clone()),
            ),
            ServiceError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("Not found", msg.clone()),
            ),
            ServiceError::SourceUnavailable(detail) => {
                tracing::error!(error = %detail, "source of record failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Internal server error", "Failed to process request"),
                )
            }
            ServiceError::Unauthenticated(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("Unauthorized", msg.clone()),
            ),
        };

        (status, Json(body)).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the service.
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let cases = [
            (ServiceError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                ServiceError::SourceUnavailable("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ServiceError::Unauthenticated("x".into()), StatusCode::UNAUTHORIZED),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_source_error_hides_details() {
        let response =
            ServiceError::SourceUnavailable("connection refused to db-7".into()).into_response();
        let json = body_json(response).await;

        assert_eq!(json["error"], "Internal server error");
        assert!(!json.to_string().contains("db-7"));
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_client_error_carries_message() {
        let response =
            ServiceError::InvalidInput("Todo content is required".into()).into_response();
        let json = body_json(response).await;

        assert_eq!(json["message"], "Todo content is required");
        assert!(json["timestamp"].is_string());
    }
}
