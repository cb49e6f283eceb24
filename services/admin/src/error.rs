//! Custom error types for the admin service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the admin service
///
/// Every handler boundary maps failures into one of these; nothing escapes
/// as an unhandled fault.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or missing input fields
    #[error("Validation failed")]
    Validation(Vec<String>),

    /// Duplicate email at registration
    #[error("User already exists")]
    Conflict,

    /// Bad credentials at login; deliberately uniform for unknown email
    /// and wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing or invalid session on a protected mutation
    #[error("Unauthorized")]
    Unauthorized,

    /// Unknown id
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(fields) => (StatusCode::BAD_REQUEST, json!({ "error": fields })),
            ApiError::Conflict => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "User already exists" }),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Invalid credentials" }),
            ),
            ApiError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, json!({ "error": "Unauthorized" }))
            }
            ApiError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("{} not found", resource) }),
            ),
            ApiError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error" }),
                )
            }
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal Server Error" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for admin service results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::Validation(vec!["bad".to_string()]),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::Conflict, StatusCode::BAD_REQUEST),
            (ApiError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (ApiError::Unauthorized, StatusCode::UNAUTHORIZED),
            (ApiError::NotFound("Product"), StatusCode::NOT_FOUND),
            (
                ApiError::InternalServerError,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
