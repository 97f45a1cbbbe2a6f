//! Authentication and authorization module.
//!
//! This module provides:
//! - Stateless JWT token creation and verification
//! - Authentication middleware for protected routes
//! - `CurrentUser` / `AdminUser` extractors for handlers
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, jwt_auth_middleware};
//! use core_config::FromEnv;
//!
//! let config = JwtConfig::from_env()?;
//! let auth = JwtAuth::new(&config);
//!
//! let protected = Router::new()
//!     .route("/api/orders", get(handler))
//!     .layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod extractors;
pub mod jwt;
pub mod middleware;

// Re-export commonly used types
pub use config::JwtConfig;
pub use extractors::{AdminUser, CurrentUser};
pub use jwt::{ACCESS_TOKEN_TTL, JwtAuth, JwtClaims};
pub use middleware::{jwt_auth_middleware, optional_jwt_auth_middleware};
