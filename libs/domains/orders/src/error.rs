use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(Uuid),

    #[error("Unknown product: {0}")]
    UnknownProduct(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type OrderResult<T> = Result<T, OrderError>;

/// Convert OrderError to AppError for standardized error responses
impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            // Also used when an order is outside the caller's visibility
            OrderError::NotFound(id) => AppError::NotFound(format!("Order {} not found", id)),
            OrderError::UnknownProduct(id) => {
                AppError::BadRequest(format!("Unknown product: {}", id))
            }
            OrderError::Validation(msg) => AppError::BadRequest(msg),
            OrderError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
