//! Orders Domain
//!
//! This module provides a complete domain implementation for customer
//! orders. Every endpoint requires an authenticated caller; non-admin
//! visibility is scoped to the caller's own orders.
//!
//! The read and write representations intentionally differ: writes accept
//! item lines referencing products by id, while reads embed full product
//! detail and a per-line price snapshot taken when the line was written.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Ownership scoping, product resolution, snapshots
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

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{OrderError, OrderResult};
pub use models::{
    CreateOrder, NewOrder, NewOrderLine, Order, OrderFilter, OrderItem, OrderItemDetail,
    OrderItemInput, OrderResponse, OrderStatus, PatchOrder, UpdateOrder,
};
pub use postgres::PgOrderRepository;
pub use repository::{InMemoryOrderRepository, OrderRepository};
pub use service::{OrderService, Viewer};
