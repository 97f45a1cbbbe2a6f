//! Users Domain
//!
//! This module provides a complete domain implementation for user accounts.
//!
//! # Features
//!
//! - Public registration and login with Argon2 password hashing
//! - JWT access tokens for authenticated requests
//! - Role-based access control (`user` / `admin`)
//! - Admin-gated user management (list/retrieve/update/delete)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business logic, password hashing, validation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, enums
//! └─────────────┘
//! ```

pub mod auth_handlers;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use models::{
    CreateUser, LoginRequest, LoginResponse, RegisterRequest, Role, UpdateUser, User, UserFilter,
    UserResponse,
};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
