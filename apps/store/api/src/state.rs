//! Application state management.
//!
//! The shared state handed to route constructors. Cloning is cheap: the
//! database connection is a pooled handle and the JWT auth holds only the
//! signing secret.

use axum_helpers::JwtAuth;
use database::postgres::DatabaseConnection;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL database connection pool
    pub db: DatabaseConnection,
    /// Stateless JWT authentication
    pub jwt_auth: JwtAuth,
}
