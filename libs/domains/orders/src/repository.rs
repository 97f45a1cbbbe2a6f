use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{OrderError, OrderResult};
use crate::models::{NewOrder, NewOrderLine, Order, OrderFilter, OrderItem, OrderStatus};

/// Repository trait for Order persistence.
///
/// `owner` on `list` scopes visibility: `Some(user_id)` restricts the
/// result to that user's orders, `None` (staff) sees everything.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Create a new order with its item lines
    async fn create(&self, input: NewOrder) -> OrderResult<Order>;

    /// Get an order by ID (with item lines)
    async fn get_by_id(&self, id: Uuid) -> OrderResult<Option<Order>>;

    /// List orders, optionally scoped to an owner; returns the page slice
    /// and the total number of matches
    async fn list(&self, owner: Option<Uuid>, filter: OrderFilter)
    -> OrderResult<(Vec<Order>, u64)>;

    /// Update an order's status; when `lines` is Some, replace all item
    /// lines with the given resolved lines
    async fn update(
        &self,
        id: Uuid,
        status: OrderStatus,
        lines: Option<Vec<NewOrderLine>>,
    ) -> OrderResult<Order>;

    /// Delete an order (item lines are removed with it)
    async fn delete(&self, id: Uuid) -> OrderResult<bool>;
}

/// In-memory implementation of OrderRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<HashMap<Uuid, Order>>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self {
            orders: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, input: NewOrder) -> OrderResult<Order> {
        let mut orders = self.orders.write().await;

        let order = Order::new(input);
        orders.insert(order.id, order.clone());

        tracing::info!(order_id = %order.id, user_id = %order.user_id, "Created order");
        Ok(order)
    }

    async fn get_by_id(&self, id: Uuid) -> OrderResult<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&id).cloned())
    }

    async fn list(
        &self,
        owner: Option<Uuid>,
        filter: OrderFilter,
    ) -> OrderResult<(Vec<Order>, u64)> {
        let orders = self.orders.read().await;

        let mut result: Vec<Order> = orders
            .values()
            .filter(|o| owner.map_or(true, |user_id| o.user_id == user_id))
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();

        let total = result.len() as u64;

        result.sort_by_key(|o| o.id);

        let pagination = filter.pagination();
        let result: Vec<Order> = result
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit() as usize)
            .collect();

        Ok((result, total))
    }

    async fn update(
        &self,
        id: Uuid,
        status: OrderStatus,
        lines: Option<Vec<NewOrderLine>>,
    ) -> OrderResult<Order> {
        let mut orders = self.orders.write().await;

        let order = orders.get_mut(&id).ok_or(OrderError::NotFound(id))?;

        order.status = status;
        if let Some(lines) = lines {
            order.items = lines
                .into_iter()
                .map(|line| OrderItem {
                    id: Uuid::now_v7(),
                    product_id: line.product_id,
                    quantity: line.quantity,
                    price_at_order: line.price_at_order,
                })
                .collect();
        }
        order.updated_at = Utc::now();

        let updated = order.clone();

        tracing::info!(order_id = %id, "Updated order");
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> OrderResult<bool> {
        let mut orders = self.orders.write().await;

        if orders.remove(&id).is_some() {
            tracing::info!(order_id = %id, "Deleted order");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
