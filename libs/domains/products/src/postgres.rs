use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{ProductError, ProductResult},
    models::{CreateProduct, Product, ProductFilter, ProductInfo, ProductOrdering, UpdateProduct},
    repository::ProductRepository,
};

/// PostgreSQL implementation of ProductRepository using SeaORM
#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Compose the WHERE clause for a filter; every predicate is ANDed.
    fn filter_condition(filter: &ProductFilter) -> Condition {
        let mut condition = Condition::all();

        if let Some(ref name) = filter.name {
            condition = condition.add(entity::Column::Name.eq(name.clone()));
        }
        if let Some(ref sub) = filter.name_contains {
            condition = condition.add(entity::Column::Name.contains(sub.clone()));
        }
        if let Some(price) = filter.price {
            condition = condition.add(entity::Column::Price.eq(price));
        }
        if let Some(bound) = filter.price_gt {
            condition = condition.add(entity::Column::Price.gt(bound));
        }
        if let Some(bound) = filter.price_lt {
            condition = condition.add(entity::Column::Price.lt(bound));
        }
        if let Some(bound) = filter.price_min {
            condition = condition.add(entity::Column::Price.gte(bound));
        }
        if let Some(bound) = filter.price_max {
            condition = condition.add(entity::Column::Price.lte(bound));
        }
        if let Some(ref term) = filter.search {
            let pattern = format!("%{}%", term);
            condition = condition.add(
                Condition::any()
                    .add(Expr::col(entity::Column::Name).ilike(pattern.clone()))
                    .add(Expr::col(entity::Column::Description).ilike(pattern)),
            );
        }

        condition
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let active_model: entity::ActiveModel = input.into();

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| ProductError::Internal(format!("Database error: {}", e)))?;

        tracing::info!(product_id = %model.id, "Created product");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ProductError::Internal(format!("Database error: {}", e)))?;

        Ok(model.map(|m| m.into()))
    }

    async fn get_by_ids(&self, ids: &[Uuid]) -> ProductResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let models = entity::Entity::find()
            .filter(entity::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| ProductError::Internal(format!("Database error: {}", e)))?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn list(&self, filter: ProductFilter) -> ProductResult<(Vec<Product>, u64)> {
        let condition = Self::filter_condition(&filter);

        let total = entity::Entity::find()
            .filter(condition.clone())
            .count(&self.db)
            .await
            .map_err(|e| ProductError::Internal(format!("Database error: {}", e)))?;

        let mut query = entity::Entity::find().filter(condition);

        query = match filter.ordering {
            Some(ProductOrdering::NameAsc) => query.order_by_asc(entity::Column::Name),
            Some(ProductOrdering::NameDesc) => query.order_by_desc(entity::Column::Name),
            Some(ProductOrdering::PriceAsc) => query.order_by_asc(entity::Column::Price),
            Some(ProductOrdering::PriceDesc) => query.order_by_desc(entity::Column::Price),
            // Ids are UUIDv7, so primary-key order is insertion order
            None => query.order_by_asc(entity::Column::Id),
        };

        let pagination = filter.pagination();
        let models = query
            .limit(pagination.limit())
            .offset(pagination.offset())
            .all(&self.db)
            .await
            .map_err(|e| ProductError::Internal(format!("Database error: {}", e)))?;

        Ok((models.into_iter().map(|m| m.into()).collect(), total))
    }

    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ProductError::Internal(format!("Database error: {}", e)))?
            .ok_or(ProductError::NotFound(id))?;

        let mut product: Product = model.into();
        product.apply_update(input);

        let active_model: entity::ActiveModel = product.into();
        let updated = active_model
            .update(&self.db)
            .await
            .map_err(|e| ProductError::Internal(format!("Database error: {}", e)))?;

        tracing::info!(product_id = %id, "Updated product");
        Ok(updated.into())
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let result = entity::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ProductError::Internal(format!("Database error: {}", e)))?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = %id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn info(&self) -> ProductResult<ProductInfo> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ProductError::Internal(format!("Database error: {}", e)))?;

        let products: Vec<Product> = models.into_iter().map(|m| m.into()).collect();
        let count = products.len() as u64;
        let max_price = products.iter().map(|p| p.price).max();

        Ok(ProductInfo {
            products,
            count,
            max_price,
        })
    }
}
