use axum_helpers::pagination::Page;
use domain_products::{Product, ProductRepository};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{OrderError, OrderResult};
use crate::models::{
    CreateOrder, NewOrder, NewOrderLine, Order, OrderFilter, OrderItemDetail, OrderItemInput,
    OrderResponse, PatchOrder, UpdateOrder,
};
use crate::repository::OrderRepository;

/// The caller an order operation runs as. Non-staff viewers only ever see
/// their own orders; rows outside their scope behave as absent.
#[derive(Debug, Clone, Copy)]
pub struct Viewer {
    pub user_id: Uuid,
    pub is_staff: bool,
}

impl Viewer {
    fn can_see(&self, order: &Order) -> bool {
        self.is_staff || order.user_id == self.user_id
    }

    fn list_scope(&self) -> Option<Uuid> {
        if self.is_staff { None } else { Some(self.user_id) }
    }
}

/// Service layer for Order business logic: ownership scoping, product
/// resolution and price snapshots.
pub struct OrderService<R: OrderRepository, P: ProductRepository> {
    orders: Arc<R>,
    products: Arc<P>,
}

impl<R: OrderRepository, P: ProductRepository> Clone for OrderService<R, P> {
    fn clone(&self) -> Self {
        Self {
            orders: self.orders.clone(),
            products: self.products.clone(),
        }
    }
}

impl<R: OrderRepository, P: ProductRepository> OrderService<R, P> {
    pub fn new(orders: R, products: P) -> Self {
        Self {
            orders: Arc::new(orders),
            products: Arc::new(products),
        }
    }

    /// Create an order for the authenticated principal.
    ///
    /// The owner is always `viewer.user_id`; any owner value a client put
    /// in the request body never reaches this function.
    pub async fn create_order(
        &self,
        viewer: Viewer,
        input: CreateOrder,
    ) -> OrderResult<OrderResponse> {
        input
            .validate()
            .map_err(|e| OrderError::Validation(e.to_string()))?;

        let lines = self.resolve_lines(&input.items).await?;

        let order = self
            .orders
            .create(NewOrder {
                user_id: viewer.user_id,
                status: input.status,
                lines,
            })
            .await?;

        self.to_response(order).await
    }

    /// List orders visible to the viewer
    pub async fn list_orders(
        &self,
        viewer: Viewer,
        filter: OrderFilter,
    ) -> OrderResult<Page<OrderResponse>> {
        let pagination = filter.pagination();
        let (orders, total) = self.orders.list(viewer.list_scope(), filter).await?;

        let mut responses = Vec::with_capacity(orders.len());
        for order in orders {
            responses.push(self.to_response(order).await?);
        }

        Ok(Page::new(responses, total, pagination))
    }

    /// Get an order visible to the viewer
    pub async fn get_order(&self, viewer: Viewer, id: Uuid) -> OrderResult<OrderResponse> {
        let order = self.fetch_visible(viewer, id).await?;
        self.to_response(order).await
    }

    /// Replace an order's status and item lines (PUT).
    ///
    /// Replaced lines take fresh price snapshots.
    pub async fn replace_order(
        &self,
        viewer: Viewer,
        id: Uuid,
        input: UpdateOrder,
    ) -> OrderResult<OrderResponse> {
        input
            .validate()
            .map_err(|e| OrderError::Validation(e.to_string()))?;

        self.fetch_visible(viewer, id).await?;

        let lines = self.resolve_lines(&input.items).await?;
        let order = self.orders.update(id, input.status, Some(lines)).await?;

        self.to_response(order).await
    }

    /// Partially update an order (PATCH). Item lines are only rewritten
    /// when the payload carries them; untouched lines keep their snapshots.
    pub async fn patch_order(
        &self,
        viewer: Viewer,
        id: Uuid,
        input: PatchOrder,
    ) -> OrderResult<OrderResponse> {
        input
            .validate()
            .map_err(|e| OrderError::Validation(e.to_string()))?;

        let existing = self.fetch_visible(viewer, id).await?;

        let status = input.status.unwrap_or(existing.status);
        let lines = match input.items {
            Some(ref items) => Some(self.resolve_lines(items).await?),
            None => None,
        };

        let order = self.orders.update(id, status, lines).await?;

        self.to_response(order).await
    }

    /// Delete an order visible to the viewer
    pub async fn delete_order(&self, viewer: Viewer, id: Uuid) -> OrderResult<()> {
        self.fetch_visible(viewer, id).await?;

        let deleted = self.orders.delete(id).await?;
        if !deleted {
            return Err(OrderError::NotFound(id));
        }

        Ok(())
    }

    /// Fetch an order, treating rows outside the viewer's scope as absent
    async fn fetch_visible(&self, viewer: Viewer, id: Uuid) -> OrderResult<Order> {
        let order = self
            .orders
            .get_by_id(id)
            .await?
            .ok_or(OrderError::NotFound(id))?;

        if !viewer.can_see(&order) {
            return Err(OrderError::NotFound(id));
        }

        Ok(order)
    }

    /// Resolve item inputs against the catalog, snapshotting current prices.
    /// A reference to a missing product fails the whole request.
    async fn resolve_lines(&self, items: &[OrderItemInput]) -> OrderResult<Vec<NewOrderLine>> {
        let ids: Vec<Uuid> = items.iter().map(|item| item.product_id).collect();

        let products = self
            .products
            .get_by_ids(&ids)
            .await
            .map_err(|e| OrderError::Internal(format!("Product lookup failed: {}", e)))?;

        let by_id: HashMap<Uuid, Product> = products.into_iter().map(|p| (p.id, p)).collect();

        items
            .iter()
            .map(|item| {
                let product = by_id
                    .get(&item.product_id)
                    .ok_or(OrderError::UnknownProduct(item.product_id))?;

                Ok(NewOrderLine {
                    product_id: product.id,
                    quantity: item.quantity,
                    price_at_order: product.price,
                })
            })
            .collect()
    }

    /// Build the nested read representation, embedding product detail
    async fn to_response(&self, order: Order) -> OrderResult<OrderResponse> {
        let ids: Vec<Uuid> = order.items.iter().map(|item| item.product_id).collect();

        let products = self
            .products
            .get_by_ids(&ids)
            .await
            .map_err(|e| OrderError::Internal(format!("Product lookup failed: {}", e)))?;

        let by_id: HashMap<Uuid, Product> = products.into_iter().map(|p| (p.id, p)).collect();

        let mut items = Vec::with_capacity(order.items.len());
        for item in order.items {
            let product = by_id.get(&item.product_id).cloned().ok_or_else(|| {
                // Items cascade-delete with products, so this only happens on
                // a concurrent product deletion mid-request
                OrderError::Internal(format!(
                    "Product {} missing for order item {}",
                    item.product_id, item.id
                ))
            })?;

            let subtotal = item.price_at_order * Decimal::from(item.quantity);
            items.push(OrderItemDetail {
                id: item.id,
                product,
                quantity: item.quantity,
                price_at_order: item.price_at_order,
                subtotal,
            });
        }

        let total = items.iter().map(|item| item.subtotal).sum();

        Ok(OrderResponse {
            id: order.id,
            user_id: order.user_id,
            status: order.status,
            created_at: order.created_at,
            updated_at: order.updated_at,
            items,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderStatus;
    use crate::repository::InMemoryOrderRepository;
    use domain_products::{CreateProduct, InMemoryProductRepository};

    async fn service_with_product(
        price: Decimal,
    ) -> (
        OrderService<InMemoryOrderRepository, InMemoryProductRepository>,
        Product,
    ) {
        let products = InMemoryProductRepository::new();
        let product = products
            .create(CreateProduct {
                name: "Widget".to_string(),
                description: String::new(),
                price,
                stock: 10,
            })
            .await
            .unwrap();

        let service = OrderService::new(InMemoryOrderRepository::new(), products);
        (service, product)
    }

    fn customer() -> Viewer {
        Viewer {
            user_id: Uuid::now_v7(),
            is_staff: false,
        }
    }

    fn staff() -> Viewer {
        Viewer {
            user_id: Uuid::now_v7(),
            is_staff: true,
        }
    }

    fn order_input(product_id: Uuid, quantity: i32) -> CreateOrder {
        CreateOrder {
            status: OrderStatus::default(),
            items: vec![OrderItemInput {
                product_id,
                quantity,
            }],
        }
    }

    #[tokio::test]
    async fn test_create_order_snapshots_price_and_totals() {
        let (service, product) = service_with_product(Decimal::new(995, 2)).await;
        let viewer = customer();

        let order = service
            .create_order(viewer, order_input(product.id, 3))
            .await
            .unwrap();

        assert_eq!(order.user_id, viewer.user_id);
        assert_eq!(order.items[0].price_at_order, Decimal::new(995, 2));
        assert_eq!(order.items[0].subtotal, Decimal::new(2985, 2));
        assert_eq!(order.total, Decimal::new(2985, 2));
        assert_eq!(order.items[0].product.name, "Widget");
    }

    #[tokio::test]
    async fn test_snapshot_survives_product_price_change() {
        let (service, product) = service_with_product(Decimal::new(500, 2)).await;
        let viewer = customer();

        let order = service
            .create_order(viewer, order_input(product.id, 1))
            .await
            .unwrap();

        // Reprice the product after the order was placed
        service
            .products
            .update(
                product.id,
                domain_products::UpdateProduct {
                    name: Some("Widget".to_string()),
                    description: String::new(),
                    price: Some(Decimal::new(900, 2)),
                    stock: 10,
                },
            )
            .await
            .unwrap();

        let reloaded = service.get_order(viewer, order.id).await.unwrap();
        assert_eq!(reloaded.items[0].price_at_order, Decimal::new(500, 2));
        assert_eq!(reloaded.items[0].product.price, Decimal::new(900, 2));
    }

    #[tokio::test]
    async fn test_unknown_product_rejected_with_its_id() {
        let (service, _product) = service_with_product(Decimal::ONE).await;
        let ghost = Uuid::now_v7();

        let result = service
            .create_order(customer(), order_input(ghost, 1))
            .await;

        assert!(matches!(result, Err(OrderError::UnknownProduct(id)) if id == ghost));
    }

    #[tokio::test]
    async fn test_non_staff_cannot_see_others_orders() {
        let (service, product) = service_with_product(Decimal::ONE).await;
        let alice = customer();
        let bob = customer();

        let order = service
            .create_order(alice, order_input(product.id, 1))
            .await
            .unwrap();

        // Bob gets a 404-shaped error, not a 403: the row is simply not
        // in his view
        let result = service.get_order(bob, order.id).await;
        assert!(matches!(result, Err(OrderError::NotFound(_))));

        // Staff sees everything
        let seen = service.get_order(staff(), order.id).await.unwrap();
        assert_eq!(seen.id, order.id);
    }

    #[tokio::test]
    async fn test_list_scoping() {
        let (service, product) = service_with_product(Decimal::ONE).await;
        let alice = customer();
        let bob = customer();

        service
            .create_order(alice, order_input(product.id, 1))
            .await
            .unwrap();
        service
            .create_order(bob, order_input(product.id, 2))
            .await
            .unwrap();

        let own = service
            .list_orders(alice, OrderFilter::default())
            .await
            .unwrap();
        assert_eq!(own.total, 1);
        assert!(own.items.iter().all(|o| o.user_id == alice.user_id));

        let all = service
            .list_orders(staff(), OrderFilter::default())
            .await
            .unwrap();
        assert_eq!(all.total, 2);
    }

    #[tokio::test]
    async fn test_patch_status_only_keeps_snapshots() {
        let (service, product) = service_with_product(Decimal::new(500, 2)).await;
        let viewer = customer();

        let order = service
            .create_order(viewer, order_input(product.id, 1))
            .await
            .unwrap();
        let original_item_id = order.items[0].id;

        let patched = service
            .patch_order(
                viewer,
                order.id,
                PatchOrder {
                    status: Some(OrderStatus::Confirmed),
                    items: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(patched.status, OrderStatus::Confirmed);
        assert_eq!(patched.items[0].id, original_item_id);
    }

    #[tokio::test]
    async fn test_replace_takes_fresh_snapshots() {
        let (service, product) = service_with_product(Decimal::new(500, 2)).await;
        let viewer = customer();

        let order = service
            .create_order(viewer, order_input(product.id, 1))
            .await
            .unwrap();

        service
            .products
            .update(
                product.id,
                domain_products::UpdateProduct {
                    name: Some("Widget".to_string()),
                    description: String::new(),
                    price: Some(Decimal::new(900, 2)),
                    stock: 10,
                },
            )
            .await
            .unwrap();

        let replaced = service
            .replace_order(
                viewer,
                order.id,
                UpdateOrder {
                    status: OrderStatus::Confirmed,
                    items: vec![OrderItemInput {
                        product_id: product.id,
                        quantity: 2,
                    }],
                },
            )
            .await
            .unwrap();

        assert_eq!(replaced.items[0].price_at_order, Decimal::new(900, 2));
        assert_eq!(replaced.total, Decimal::new(1800, 2));
    }

    #[tokio::test]
    async fn test_delete_scoped_by_ownership() {
        let (service, product) = service_with_product(Decimal::ONE).await;
        let alice = customer();
        let bob = customer();

        let order = service
            .create_order(alice, order_input(product.id, 1))
            .await
            .unwrap();

        let result = service.delete_order(bob, order.id).await;
        assert!(matches!(result, Err(OrderError::NotFound(_))));

        service.delete_order(alice, order.id).await.unwrap();
        let result = service.get_order(alice, order.id).await;
        assert!(matches!(result, Err(OrderError::NotFound(_))));
    }
}
