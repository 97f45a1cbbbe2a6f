//! Products Domain
//!
//! This module provides a complete domain implementation for the product
//! catalog: anonymous reads with filtering, search, ordering and pagination,
//! admin-gated writes, and an aggregate info view.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business logic, validation
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
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{
//!     handlers,
//!     repository::InMemoryProductRepository,
//!     service::ProductService,
//! };
//!
//! // Create repository and service
//! let repository = InMemoryProductRepository::new();
//! let service = ProductService::new(repository);
//!
//! // Create Axum router
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{ProductError, ProductResult};
pub use models::{
    CreateProduct, Product, ProductFilter, ProductInfo, ProductOrdering, UpdateProduct,
};
pub use postgres::PgProductRepository;
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::ProductService;
