use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sea-ORM Entity for the products table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub stock: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// Conversion from Sea-ORM Model to domain Product
impl From<Model> for crate::models::Product {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            stock: model.stock,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

// Conversion from domain CreateProduct to Sea-ORM ActiveModel
impl From<crate::models::CreateProduct> for ActiveModel {
    fn from(input: crate::models::CreateProduct) -> Self {
        ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            stock: Set(input.stock),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(chrono::Utc::now().into()),
        }
    }
}

// Conversion from domain Product back to a fully-set ActiveModel (for updates)
impl From<crate::models::Product> for ActiveModel {
    fn from(product: crate::models::Product) -> Self {
        ActiveModel {
            id: Set(product.id),
            name: Set(product.name),
            description: Set(product.description),
            price: Set(product.price),
            stock: Set(product.stock),
            created_at: Set(product.created_at.into()),
            updated_at: Set(product.updated_at.into()),
        }
    }
}
