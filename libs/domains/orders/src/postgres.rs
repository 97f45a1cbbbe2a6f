use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    entity,
    error::{OrderError, OrderResult},
    models::{NewOrder, NewOrderLine, Order, OrderFilter, OrderItem, OrderStatus},
    repository::OrderRepository,
};

fn db_error(e: DbErr) -> OrderError {
    OrderError::Internal(format!("Database error: {}", e))
}

/// PostgreSQL implementation of OrderRepository using SeaORM.
///
/// Order and item rows are written in one transaction so an order is never
/// observable half-written.
#[derive(Clone)]
pub struct PgOrderRepository {
    db: DatabaseConnection,
}

impl PgOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn filter_condition(owner: Option<Uuid>, filter: &OrderFilter) -> Condition {
        let mut condition = Condition::all();

        if let Some(user_id) = owner {
            condition = condition.add(entity::order::Column::UserId.eq(user_id));
        }
        if let Some(status) = filter.status {
            condition = condition.add(entity::order::Column::Status.eq(status));
        }
        if let Some(instant) = filter.created_at {
            condition = condition.add(entity::order::Column::CreatedAt.eq(instant));
        }
        if let Some(bound) = filter.created_after {
            condition = condition.add(entity::order::Column::CreatedAt.gt(bound));
        }
        if let Some(bound) = filter.created_before {
            condition = condition.add(entity::order::Column::CreatedAt.lt(bound));
        }

        condition
    }

    async fn load_items(&self, order_ids: &[Uuid]) -> OrderResult<HashMap<Uuid, Vec<OrderItem>>> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let models = entity::order_item::Entity::find()
            .filter(entity::order_item::Column::OrderId.is_in(order_ids.iter().copied()))
            .order_by_asc(entity::order_item::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        let mut grouped: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        for model in models {
            grouped.entry(model.order_id).or_default().push(OrderItem {
                id: model.id,
                product_id: model.product_id,
                quantity: model.quantity,
                price_at_order: model.price_at_order,
            });
        }

        Ok(grouped)
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, input: NewOrder) -> OrderResult<Order> {
        let order = Order::new(input);

        let txn = self.db.begin().await.map_err(db_error)?;

        entity::order_active_model(&order)
            .insert(&txn)
            .await
            .map_err(db_error)?;

        let items = entity::item_active_models(&order);
        if !items.is_empty() {
            entity::order_item::Entity::insert_many(items)
                .exec(&txn)
                .await
                .map_err(db_error)?;
        }

        txn.commit().await.map_err(db_error)?;

        tracing::info!(order_id = %order.id, user_id = %order.user_id, "Created order");
        Ok(order)
    }

    async fn get_by_id(&self, id: Uuid) -> OrderResult<Option<Order>> {
        let model = entity::order::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?;

        let Some(model) = model else {
            return Ok(None);
        };

        let mut items = self.load_items(&[id]).await?;
        let items = items.remove(&id).unwrap_or_default();

        Ok(Some(entity::into_order(model, items)))
    }

    async fn list(
        &self,
        owner: Option<Uuid>,
        filter: OrderFilter,
    ) -> OrderResult<(Vec<Order>, u64)> {
        let condition = Self::filter_condition(owner, &filter);

        let total = entity::order::Entity::find()
            .filter(condition.clone())
            .count(&self.db)
            .await
            .map_err(db_error)?;

        let pagination = filter.pagination();
        let models = entity::order::Entity::find()
            .filter(condition)
            .order_by_asc(entity::order::Column::Id)
            .limit(pagination.limit())
            .offset(pagination.offset())
            .all(&self.db)
            .await
            .map_err(db_error)?;

        let order_ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let mut items = self.load_items(&order_ids).await?;

        let orders = models
            .into_iter()
            .map(|model| {
                let order_items = items.remove(&model.id).unwrap_or_default();
                entity::into_order(model, order_items)
            })
            .collect();

        Ok((orders, total))
    }

    async fn update(
        &self,
        id: Uuid,
        status: OrderStatus,
        lines: Option<Vec<NewOrderLine>>,
    ) -> OrderResult<Order> {
        let txn = self.db.begin().await.map_err(db_error)?;

        let existing = entity::order::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_error)?
            .ok_or(OrderError::NotFound(id))?;

        let mut active: entity::order::ActiveModel = Default::default();
        active.id = Set(existing.id);
        active.status = Set(status);
        active.updated_at = Set(Utc::now().into());
        active.update(&txn).await.map_err(db_error)?;

        if let Some(lines) = lines {
            entity::order_item::Entity::delete_many()
                .filter(entity::order_item::Column::OrderId.eq(id))
                .exec(&txn)
                .await
                .map_err(db_error)?;

            let items: Vec<entity::order_item::ActiveModel> = lines
                .into_iter()
                .map(|line| entity::order_item::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    order_id: Set(id),
                    product_id: Set(line.product_id),
                    quantity: Set(line.quantity),
                    price_at_order: Set(line.price_at_order),
                })
                .collect();

            if !items.is_empty() {
                entity::order_item::Entity::insert_many(items)
                    .exec(&txn)
                    .await
                    .map_err(db_error)?;
            }
        }

        txn.commit().await.map_err(db_error)?;

        tracing::info!(order_id = %id, "Updated order");

        self.get_by_id(id).await?.ok_or(OrderError::NotFound(id))
    }

    async fn delete(&self, id: Uuid) -> OrderResult<bool> {
        let result = entity::order::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error)?;

        if result.rows_affected > 0 {
            tracing::info!(order_id = %id, "Deleted order");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
