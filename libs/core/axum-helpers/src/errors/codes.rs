//! Type-safe error codes for API responses.
//!
//! Single source of truth for error codes used across the application.
//! Each error code includes:
//! - String representation for client consumption (e.g., "VALIDATION_ERROR")
//! - Integer code for logging and monitoring (e.g., 1001)
//! - Default human-readable message
//!
//! # Example
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! assert_eq!(code.default_message(), "Request validation failed");
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request validation failed
    ValidationError,

    /// Invalid UUID format in path or query parameter
    InvalidUuid,

    /// JSON extraction from request body failed
    JsonExtraction,

    /// Requested resource was not found
    NotFound,

    /// Authentication credentials are missing or invalid
    Unauthorized,

    /// Authenticated user lacks sufficient permissions
    Forbidden,

    /// Request conflicts with current resource state (e.g., duplicate resource)
    Conflict,

    // Server errors (1000s)
    /// An unexpected internal server error occurred
    InternalError,

    /// Service is temporarily unavailable
    ServiceUnavailable,

    // Database errors (2000s)
    /// Database connection or query error
    DatabaseError,

    /// Database query returned no results
    DatabaseNotFound,

    // Migration errors (3000s)
    /// Database migration failed
    MigrationError,

    // Serialization errors (5000s)
    /// JSON (de)serialization failed
    SerdeJsonError,
}

impl ErrorCode {
    /// String identifier sent to clients (SCREAMING_SNAKE_CASE).
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InvalidUuid => "INVALID_UUID",
            ErrorCode::JsonExtraction => "JSON_EXTRACTION",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::DatabaseNotFound => "DATABASE_NOT_FOUND",
            ErrorCode::MigrationError => "MIGRATION_ERROR",
            ErrorCode::SerdeJsonError => "SERDE_JSON_ERROR",
        }
    }

    /// Integer code for logging and monitoring.
    pub fn code(&self) -> i32 {
        match self {
            ErrorCode::ValidationError => 1001,
            ErrorCode::InvalidUuid => 1002,
            ErrorCode::JsonExtraction => 1003,
            ErrorCode::NotFound => 1004,
            ErrorCode::Unauthorized => 1005,
            ErrorCode::Forbidden => 1006,
            ErrorCode::Conflict => 1008,
            ErrorCode::InternalError => 1500,
            ErrorCode::ServiceUnavailable => 1503,
            ErrorCode::DatabaseError => 2003,
            ErrorCode::DatabaseNotFound => 2001,
            ErrorCode::MigrationError => 3001,
            ErrorCode::SerdeJsonError => 5001,
        }
    }

    /// Default human-readable message for this code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "Request validation failed",
            ErrorCode::InvalidUuid => "Invalid UUID format",
            ErrorCode::JsonExtraction => "Invalid JSON in request body",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::Unauthorized => "Authentication required",
            ErrorCode::Forbidden => "Access forbidden",
            ErrorCode::Conflict => "Resource already exists",
            ErrorCode::InternalError => "An unexpected error occurred",
            ErrorCode::ServiceUnavailable => "Service temporarily unavailable",
            ErrorCode::DatabaseError => "A database error occurred",
            ErrorCode::DatabaseNotFound => "Database query returned no results",
            ErrorCode::MigrationError => "Database migration error",
            ErrorCode::SerdeJsonError => "Failed to serialize response",
        }
    }
}
