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
    error::{UserError, UserResult},
    models::{User, UserFilter},
    repository::UserRepository,
};

/// PostgreSQL implementation of UserRepository using SeaORM
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn filter_condition(filter: &UserFilter) -> Condition {
        let mut condition = Condition::all();

        if let Some(ref email) = filter.email {
            condition = condition.add(Expr::col(entity::Column::Email).ilike(format!("%{}%", email)));
        }
        if let Some(ref role) = filter.role {
            // roles is a JSONB array of strings
            condition = condition.add(Expr::cust_with_values(
                "roles @> ?",
                [serde_json::json!([role])],
            ));
        }

        condition
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let exists = self.email_exists(&user.email).await?;
        if exists {
            return Err(UserError::DuplicateEmail(user.email));
        }

        let email = user.email.clone();
        let active_model: entity::ActiveModel = user.into();

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        tracing::info!(user_id = %model.id, email = %email, "Created user");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        Ok(model.map(|m| m.into()))
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let model = entity::Entity::find()
            .filter(Expr::col(entity::Column::Email).ilike(email.to_string()))
            .one(&self.db)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        Ok(model.map(|m| m.into()))
    }

    async fn list(&self, filter: UserFilter) -> UserResult<(Vec<User>, u64)> {
        let condition = Self::filter_condition(&filter);

        let total = entity::Entity::find()
            .filter(condition.clone())
            .count(&self.db)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        let pagination = filter.pagination();
        let models = entity::Entity::find()
            .filter(condition)
            .order_by_asc(entity::Column::Id)
            .limit(pagination.limit())
            .offset(pagination.offset())
            .all(&self.db)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        Ok((models.into_iter().map(|m| m.into()).collect(), total))
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let id = user.id;

        let exists = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?
            .is_some();

        if !exists {
            return Err(UserError::NotFound(id));
        }

        let email_taken = entity::Entity::find()
            .filter(Expr::col(entity::Column::Email).ilike(user.email.clone()))
            .filter(entity::Column::Id.ne(id))
            .one(&self.db)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?
            .is_some();

        if email_taken {
            return Err(UserError::DuplicateEmail(user.email));
        }

        let active_model: entity::ActiveModel = user.into();
        let updated = active_model
            .update(&self.db)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        tracing::info!(user_id = %id, "Updated user");
        Ok(updated.into())
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let result = entity::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        if result.rows_affected > 0 {
            tracing::info!(user_id = %id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn email_exists(&self, email: &str) -> UserResult<bool> {
        let exists = entity::Entity::find()
            .filter(Expr::col(entity::Column::Email).ilike(email.to_string()))
            .one(&self.db)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?
            .is_some();

        Ok(exists)
    }
}
