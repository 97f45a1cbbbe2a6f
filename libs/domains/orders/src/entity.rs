//! Sea-ORM entities for the orders and order_items tables.
//!
//! `order_items` rows are owned exclusively by their order (cascade
//! delete); the product reference does not imply ownership.

pub mod order {
    use crate::models::OrderStatus;
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "orders")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub user_id: Uuid,
        pub status: OrderStatus,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::order_item::Entity")]
        OrderItems,
    }

    impl Related<super::order_item::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::OrderItems.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod order_item {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "order_items")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub order_id: Uuid,
        pub product_id: Uuid,
        pub quantity: i32,
        #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
        pub price_at_order: Decimal,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::order::Entity",
            from = "Column::OrderId",
            to = "super::order::Column::Id"
        )]
        Order,
        #[sea_orm(
            belongs_to = "domain_products::entity::Entity",
            from = "Column::ProductId",
            to = "domain_products::entity::Column::Id"
        )]
        Product,
    }

    impl Related<super::order::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Order.def()
        }
    }

    impl Related<domain_products::entity::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Product.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

use crate::models::{Order, OrderItem};
use sea_orm::ActiveValue::Set;

// Assemble a domain Order from its row and item rows
pub fn into_order(model: order::Model, items: Vec<OrderItem>) -> Order {
    Order {
        id: model.id,
        user_id: model.user_id,
        status: model.status,
        created_at: model.created_at.into(),
        updated_at: model.updated_at.into(),
        items,
    }
}

// ActiveModel builders for inserts; ids and timestamps come from the domain
// model so in-memory and SQL backends agree on values
pub fn order_active_model(order: &Order) -> order::ActiveModel {
    order::ActiveModel {
        id: Set(order.id),
        user_id: Set(order.user_id),
        status: Set(order.status),
        created_at: Set(order.created_at.into()),
        updated_at: Set(order.updated_at.into()),
    }
}

pub fn item_active_models(order: &Order) -> Vec<order_item::ActiveModel> {
    order
        .items
        .iter()
        .map(|item| order_item::ActiveModel {
            id: Set(item.id),
            order_id: Set(order.id),
            product_id: Set(item.product_id),
            quantity: Set(item.quantity),
            price_at_order: Set(item.price_at_order),
        })
        .collect()
}
