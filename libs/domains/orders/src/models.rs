use axum_helpers::pagination::{DEFAULT_PAGE_SIZE, Pagination};
use chrono::{DateTime, Utc};
use domain_products::Product;
use rust_decimal::Decimal;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Order lifecycle status
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "order_status")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderStatus {
    /// Order has been placed but not yet confirmed
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Order has been confirmed
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    /// Order has been cancelled
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// A persisted order line: references a product and snapshots its price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    /// Unit price captured when the line was written
    pub price_at_order: Decimal,
}

/// Order entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    /// Unique identifier
    pub id: Uuid,
    /// The account that placed the order; always set server-side
    pub user_id: Uuid,
    /// Current status
    pub status: OrderStatus,
    /// Creation timestamp (immutable)
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
    /// Item lines owned by this order
    pub items: Vec<OrderItem>,
}

/// One item line in a write request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderItemInput {
    pub product_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

/// DTO for creating an order.
///
/// There is deliberately no `user` field: the owner always comes from the
/// authenticated principal, and any such field in the body is ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrder {
    #[serde(default)]
    pub status: OrderStatus,
    #[validate(length(min = 1), nested)]
    pub items: Vec<OrderItemInput>,
}

/// DTO for replacing an order (PUT is a full replace)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateOrder {
    pub status: OrderStatus,
    #[validate(length(min = 1), nested)]
    pub items: Vec<OrderItemInput>,
}

/// DTO for partially updating an order (PATCH)
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct PatchOrder {
    pub status: Option<OrderStatus>,
    /// When present, replaces all item lines (with fresh price snapshots)
    #[validate(length(min = 1), nested)]
    pub items: Option<Vec<OrderItemInput>>,
}

/// Resolved input for the repository layer: product references have been
/// validated and the price snapshot taken.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub lines: Vec<NewOrderLine>,
}

#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub product_id: Uuid,
    pub quantity: i32,
    pub price_at_order: Decimal,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

/// Query filters for listing orders.
///
/// All supplied predicates are combined with AND. Unknown query keys are
/// rejected with 400.
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
#[serde(deny_unknown_fields)]
pub struct OrderFilter {
    /// Exact status match
    pub status: Option<OrderStatus>,
    /// Exact creation time match (RFC 3339)
    pub created_at: Option<DateTime<Utc>>,
    /// Created strictly after this instant
    pub created_after: Option<DateTime<Utc>>,
    /// Created strictly before this instant
    pub created_before: Option<DateTime<Utc>>,
    /// 1-based page index
    #[serde(default = "default_page")]
    pub page: u64,
    /// Requested page size (clamped to the server maximum)
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

impl Default for OrderFilter {
    fn default() -> Self {
        Self {
            status: None,
            created_at: None,
            created_after: None,
            created_before: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl OrderFilter {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.page_size)
    }

    /// Whether an order satisfies every supplied predicate (AND semantics).
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(status) = self.status {
            if order.status != status {
                return false;
            }
        }
        if let Some(instant) = self.created_at {
            if order.created_at != instant {
                return false;
            }
        }
        if let Some(bound) = self.created_after {
            if order.created_at <= bound {
                return false;
            }
        }
        if let Some(bound) = self.created_before {
            if order.created_at >= bound {
                return false;
            }
        }
        true
    }
}

/// One item line in a read response, with full product detail embedded
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderItemDetail {
    pub id: Uuid,
    pub product: Product,
    pub quantity: i32,
    pub price_at_order: Decimal,
    pub subtotal: Decimal,
}

/// Read representation of an order: nested item lines with embedded
/// product detail and an order total
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<OrderItemDetail>,
    pub total: Decimal,
}

impl Order {
    /// Build a new order from resolved input
    pub fn new(input: NewOrder) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id: input.user_id,
            status: input.status,
            created_at: now,
            updated_at: now,
            items: input
                .lines
                .into_iter()
                .map(|line| OrderItem {
                    id: Uuid::now_v7(),
                    product_id: line.product_id,
                    quantity: line.quantity,
                    price_at_order: line.price_at_order,
                })
                .collect(),
        }
    }
}
