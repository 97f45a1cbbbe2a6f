//! Integration tests for the Orders domain
//!
//! These use real PostgreSQL via testcontainers to verify the transactional
//! create/replace paths, cascade deletion of item lines, and visibility
//! scoping at the SQL layer.

use domain_orders::*;
use domain_products::{CreateProduct, PgProductRepository, ProductRepository};
use rust_decimal::Decimal;
use test_utils::{TestDataBuilder, TestDatabase};
use uuid::Uuid;

async fn seed_product(db: &TestDatabase, name: &str, price: i64) -> domain_products::Product {
    let repo = PgProductRepository::new(db.connection());
    repo.create(CreateProduct {
        name: name.to_string(),
        description: String::new(),
        price: Decimal::from(price),
        stock: 10,
    })
    .await
    .unwrap()
}

fn new_order(user_id: Uuid, product_id: Uuid, quantity: i32, price: i64) -> NewOrder {
    NewOrder {
        user_id,
        status: OrderStatus::Pending,
        lines: vec![NewOrderLine {
            product_id,
            quantity,
            price_at_order: Decimal::from(price),
        }],
    }
}

#[tokio::test]
async fn test_create_order_with_items_round_trips() {
    let db = TestDatabase::new().await;
    let repo = PgOrderRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("pg_order_create");

    let user_id = db.create_test_user(builder.user_id()).await;
    let product = seed_product(&db, &builder.name("product", "main"), 42).await;

    let created = repo
        .create(new_order(user_id, product.id, 3, 42))
        .await
        .unwrap();

    let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.user_id, user_id);
    assert_eq!(fetched.status, OrderStatus::Pending);
    assert_eq!(fetched.items.len(), 1);
    assert_eq!(fetched.items[0].quantity, 3);
    assert_eq!(fetched.items[0].price_at_order, Decimal::from(42));
}

#[tokio::test]
async fn test_list_scopes_to_owner() {
    let db = TestDatabase::new().await;
    let repo = PgOrderRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("pg_order_scope");

    let alice = db.create_test_user(builder.user_id()).await;
    let bob = db.create_test_user(Uuid::now_v7()).await;
    let product = seed_product(&db, &builder.name("product", "main"), 10).await;

    repo.create(new_order(alice, product.id, 1, 10)).await.unwrap();
    repo.create(new_order(alice, product.id, 2, 10)).await.unwrap();
    repo.create(new_order(bob, product.id, 3, 10)).await.unwrap();

    let (own, total) = repo
        .list(Some(alice), OrderFilter::default())
        .await
        .unwrap();
    assert_eq!(total, 2);
    assert!(own.iter().all(|o| o.user_id == alice));

    let (_, total_all) = repo.list(None, OrderFilter::default()).await.unwrap();
    assert!(total_all >= 3);
}

#[tokio::test]
async fn test_status_filter() {
    let db = TestDatabase::new().await;
    let repo = PgOrderRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("pg_order_status");

    let user_id = db.create_test_user(builder.user_id()).await;
    let product = seed_product(&db, &builder.name("product", "main"), 10).await;

    let order = repo.create(new_order(user_id, product.id, 1, 10)).await.unwrap();
    repo.update(order.id, OrderStatus::Confirmed, None).await.unwrap();
    repo.create(new_order(user_id, product.id, 1, 10)).await.unwrap();

    let (confirmed, total) = repo
        .list(
            Some(user_id),
            OrderFilter {
                status: Some(OrderStatus::Confirmed),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(total, 1);
    assert_eq!(confirmed[0].id, order.id);
}

#[tokio::test]
async fn test_update_replaces_item_lines_atomically() {
    let db = TestDatabase::new().await;
    let repo = PgOrderRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("pg_order_replace");

    let user_id = db.create_test_user(builder.user_id()).await;
    let first = seed_product(&db, &builder.name("product", "first"), 10).await;
    let second = seed_product(&db, &builder.name("product", "second"), 20).await;

    let order = repo.create(new_order(user_id, first.id, 1, 10)).await.unwrap();

    let updated = repo
        .update(
            order.id,
            OrderStatus::Confirmed,
            Some(vec![NewOrderLine {
                product_id: second.id,
                quantity: 5,
                price_at_order: Decimal::from(20),
            }]),
        )
        .await
        .unwrap();

    assert_eq!(updated.status, OrderStatus::Confirmed);
    assert_eq!(updated.items.len(), 1);
    assert_eq!(updated.items[0].product_id, second.id);
    assert_eq!(updated.items[0].quantity, 5);
}

#[tokio::test]
async fn test_delete_removes_order_and_lines() {
    let db = TestDatabase::new().await;
    let repo = PgOrderRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("pg_order_delete");

    let user_id = db.create_test_user(builder.user_id()).await;
    let product = seed_product(&db, &builder.name("product", "main"), 10).await;

    let order = repo.create(new_order(user_id, product.id, 1, 10)).await.unwrap();

    assert!(repo.delete(order.id).await.unwrap());
    assert!(repo.get_by_id(order.id).await.unwrap().is_none());
    assert!(!repo.delete(order.id).await.unwrap());
}

#[tokio::test]
async fn test_update_missing_order_is_not_found() {
    let db = TestDatabase::new().await;
    let repo = PgOrderRepository::new(db.connection());

    let result = repo
        .update(Uuid::now_v7(), OrderStatus::Confirmed, None)
        .await;

    assert!(matches!(result, Err(OrderError::NotFound(_))));
}
