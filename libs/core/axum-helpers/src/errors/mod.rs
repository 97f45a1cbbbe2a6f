pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Error as UuidError;
use validator::ValidationErrors;

/// Standard error response structure.
///
/// Returned for all error responses, providing consistent error information
/// to clients:
/// - `code`: Integer error code for logging/monitoring (e.g., 1001)
/// - `error`: Machine-readable error identifier (e.g., "BadRequest")
/// - `message`: Human-readable error message
/// - `details`: Optional additional error details (e.g., per-field validation errors)
///
/// # JSON Example
///
/// ```json
/// {
///   "code": 1001,
///   "error": "BadRequest",
///   "message": "Request validation failed",
///   "details": { "name": [{ "code": "required" }] }
/// }
/// ```
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details (e.g., validation field errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application error type that can be converted to HTTP responses.
///
/// Integrates with common error types from dependencies and provides
/// structured error responses with error codes for observability.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON parsing error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("UUID error: {0}")]
    UuidError(#[from] UuidError),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details, code) = match self {
            AppError::SerdeJson(e) => {
                tracing::error!(
                    error_code = ErrorCode::SerdeJsonError.code(),
                    "JSON parsing error: {:?}",
                    e
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalServerError",
                    ErrorCode::SerdeJsonError.default_message().to_string(),
                    None,
                    ErrorCode::SerdeJsonError,
                )
            }
            AppError::Database(e) => {
                tracing::error!(
                    error_code = ErrorCode::DatabaseError.code(),
                    "Database error: {:?}",
                    e
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalServerError",
                    ErrorCode::DatabaseError.default_message().to_string(),
                    None,
                    ErrorCode::DatabaseError,
                )
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    "JSON extraction error: {:?}",
                    e
                );
                (
                    e.status(),
                    "BadRequest",
                    e.body_text(),
                    None,
                    ErrorCode::JsonExtraction,
                )
            }
            AppError::ValidationError(e) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Validation error: {:?}",
                    e
                );
                (
                    StatusCode::BAD_REQUEST,
                    "BadRequest",
                    ErrorCode::ValidationError.default_message().to_string(),
                    Some(serde_json::to_value(&e).unwrap_or(serde_json::json!(null))),
                    ErrorCode::ValidationError,
                )
            }
            AppError::UuidError(e) => {
                tracing::warn!(
                    error_code = ErrorCode::InvalidUuid.code(),
                    "UUID error: {:?}",
                    e
                );
                (
                    StatusCode::BAD_REQUEST,
                    "BadRequest",
                    ErrorCode::InvalidUuid.default_message().to_string(),
                    None,
                    ErrorCode::InvalidUuid,
                )
            }
            AppError::BadRequest(msg) => {
                tracing::info!("Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    "BadRequest",
                    msg,
                    None,
                    ErrorCode::ValidationError,
                )
            }
            AppError::Unauthorized(msg) => {
                tracing::info!("Unauthorized: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    "Unauthorized",
                    msg,
                    None,
                    ErrorCode::Unauthorized,
                )
            }
            AppError::Forbidden(msg) => {
                tracing::info!("Forbidden: {}", msg);
                (
                    StatusCode::FORBIDDEN,
                    "Forbidden",
                    msg,
                    None,
                    ErrorCode::Forbidden,
                )
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    "NotFound",
                    msg,
                    None,
                    ErrorCode::NotFound,
                )
            }
            AppError::Conflict(msg) => {
                tracing::info!("Conflict: {}", msg);
                (
                    StatusCode::CONFLICT,
                    "Conflict",
                    msg,
                    None,
                    ErrorCode::Conflict,
                )
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    msg
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalServerError",
                    ErrorCode::InternalError.default_message().to_string(),
                    None,
                    ErrorCode::InternalError,
                )
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::error!("Service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "ServiceUnavailable",
                    msg,
                    None,
                    ErrorCode::ServiceUnavailable,
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code.code(),
            error: error_type.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}
