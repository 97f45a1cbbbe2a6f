use crate::models::Role;
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sea-ORM Entity for the users table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub roles: Json, // JSONB array of role names
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// Conversion from Sea-ORM Model to domain User
impl From<Model> for crate::models::User {
    fn from(model: Model) -> Self {
        let role_names: Vec<String> = serde_json::from_value(model.roles.clone()).unwrap_or_default();
        let mut roles: Vec<Role> = role_names.iter().filter_map(|r| r.parse().ok()).collect();
        if roles.is_empty() {
            roles = vec![Role::User];
        }

        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            password_hash: model.password_hash,
            roles,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

// Conversion from domain User to a fully-set ActiveModel (insert/update)
impl From<crate::models::User> for ActiveModel {
    fn from(user: crate::models::User) -> Self {
        let roles_json =
            serde_json::to_value(user.role_strings()).unwrap_or_else(|_| serde_json::json!(["user"]));

        ActiveModel {
            id: Set(user.id),
            email: Set(user.email),
            name: Set(user.name),
            password_hash: Set(user.password_hash),
            roles: Set(roles_json),
            created_at: Set(user.created_at.into()),
            updated_at: Set(user.updated_at.into()),
        }
    }
}
