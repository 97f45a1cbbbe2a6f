//! Handler tests for the Orders domain
//!
//! These drive the order router over the in-memory repositories and verify
//! the externally observable contract: ownership is forced server-side,
//! visibility is scoped, and the read representation nests product detail.
//!
//! Authentication middleware is not part of the domain router; tests inject
//! verified claims the same way the middleware does, via request extensions.

use axum::Extension;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_helpers::JwtClaims;
use domain_orders::*;
use domain_products::{CreateProduct, InMemoryProductRepository, Product, ProductRepository};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

type TestService = OrderService<InMemoryOrderRepository, InMemoryProductRepository>;

async fn setup() -> (TestService, Product) {
    let products = InMemoryProductRepository::new();
    let product = products
        .create(CreateProduct {
            name: "Widget".to_string(),
            description: "A widget".to_string(),
            price: Decimal::new(999, 2), // 9.99
            stock: 10,
        })
        .await
        .unwrap();

    let service = OrderService::new(InMemoryOrderRepository::new(), products);
    (service, product)
}

fn claims(user_id: Uuid, roles: &[&str]) -> JwtClaims {
    JwtClaims {
        sub: user_id.to_string(),
        email: "tester@example.com".to_string(),
        name: "Tester".to_string(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        exp: i64::MAX,
        iat: 0,
        jti: Uuid::new_v4().to_string(),
    }
}

fn app_as(service: &TestService, user_id: Uuid, roles: &[&str]) -> Router {
    handlers::router(service.clone()).layer(Extension(claims(user_id, roles)))
}

fn unauthenticated_app(service: &TestService) -> Router {
    handlers::router(service.clone())
}

async fn json_body(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[tokio::test]
async fn test_all_routes_require_authentication() {
    let (service, product) = setup().await;
    let app = unauthenticated_app(&service);

    let response = app.clone().oneshot(request("GET", "/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(request(
            "POST",
            "/",
            Some(json!({"items": [{"product_id": product.id, "quantity": 1}]})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_order_forces_owner_from_identity() {
    let (service, product) = setup().await;
    let alice = Uuid::now_v7();
    let mallory = Uuid::now_v7();

    // The body claims someone else placed the order; the claim is ignored
    let response = app_as(&service, alice, &["user"])
        .oneshot(request(
            "POST",
            "/",
            Some(json!({
                "user_id": mallory,
                "user": mallory,
                "items": [{"product_id": product.id, "quantity": 2}]
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let order = json_body(response.into_body()).await;
    assert_eq!(order["user_id"], alice.to_string().as_str());
}

#[tokio::test]
async fn test_read_shape_nests_product_and_totals() {
    let (service, product) = setup().await;
    let alice = Uuid::now_v7();
    let app = app_as(&service, alice, &["user"]);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/",
            Some(json!({"items": [{"product_id": product.id, "quantity": 3}]})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let order = json_body(response.into_body()).await;
    assert_eq!(order["status"], "pending");
    assert_eq!(order["items"][0]["product"]["name"], "Widget");
    assert_eq!(order["items"][0]["price_at_order"], "9.99");
    assert_eq!(order["items"][0]["subtotal"], "29.97");
    assert_eq!(order["total"], "29.97");

    // The same shape comes back on retrieve
    let id = order["id"].as_str().unwrap();
    let response = app
        .oneshot(request("GET", &format!("/{}", id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let fetched = json_body(response.into_body()).await;
    assert_eq!(fetched["items"][0]["product"]["id"], product.id.to_string().as_str());
}

#[tokio::test]
async fn test_create_with_unknown_product_is_400_naming_it() {
    let (service, _product) = setup().await;
    let ghost = Uuid::now_v7();

    let response = app_as(&service, Uuid::now_v7(), &["user"])
        .oneshot(request(
            "POST",
            "/",
            Some(json!({"items": [{"product_id": ghost, "quantity": 1}]})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response.into_body()).await;
    assert!(
        body["message"].as_str().unwrap().contains(&ghost.to_string()),
        "error should name the offending product id, got: {body}"
    );
}

#[tokio::test]
async fn test_create_with_zero_quantity_is_400() {
    let (service, product) = setup().await;

    let response = app_as(&service, Uuid::now_v7(), &["user"])
        .oneshot(request(
            "POST",
            "/",
            Some(json!({"items": [{"product_id": product.id, "quantity": 0}]})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_is_ownership_scoped_unless_admin() {
    let (service, product) = setup().await;
    let alice = Uuid::now_v7();
    let bob = Uuid::now_v7();
    let admin = Uuid::now_v7();

    for user in [alice, bob] {
        let response = app_as(&service, user, &["user"])
            .oneshot(request(
                "POST",
                "/",
                Some(json!({"items": [{"product_id": product.id, "quantity": 1}]})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app_as(&service, alice, &["user"])
        .oneshot(request("GET", "/", None))
        .await
        .unwrap();
    let body = json_body(response.into_body()).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["user_id"], alice.to_string().as_str());

    let response = app_as(&service, admin, &["admin"])
        .oneshot(request("GET", "/", None))
        .await
        .unwrap();
    let body = json_body(response.into_body()).await;
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn test_foreign_order_behaves_as_absent() {
    let (service, product) = setup().await;
    let alice = Uuid::now_v7();
    let bob = Uuid::now_v7();

    let response = app_as(&service, alice, &["user"])
        .oneshot(request(
            "POST",
            "/",
            Some(json!({"items": [{"product_id": product.id, "quantity": 1}]})),
        ))
        .await
        .unwrap();
    let order = json_body(response.into_body()).await;
    let id = order["id"].as_str().unwrap().to_string();

    for method in ["GET", "DELETE"] {
        let response = app_as(&service, bob, &["user"])
            .oneshot(request(method, &format!("/{}", id), None))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::NOT_FOUND,
            "{method} on a foreign order should look like a missing row"
        );
    }

    // Admin retrieval still works
    let response = app_as(&service, Uuid::now_v7(), &["admin"])
        .oneshot(request("GET", &format!("/{}", id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_status_filter_exact_match() {
    let (service, product) = setup().await;
    let alice = Uuid::now_v7();
    let app = app_as(&service, alice, &["user"]);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/",
            Some(json!({"items": [{"product_id": product.id, "quantity": 1}]})),
        ))
        .await
        .unwrap();
    let order = json_body(response.into_body()).await;
    let id = order["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(request(
            "PATCH",
            &format!("/{}", id),
            Some(json!({"status": "confirmed"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(request("GET", "/?status=confirmed", None))
        .await
        .unwrap();
    let body = json_body(response.into_body()).await;
    assert_eq!(body["total"], 1);

    let response = app
        .oneshot(request("GET", "/?status=pending", None))
        .await
        .unwrap();
    let body = json_body(response.into_body()).await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_unknown_filter_key_is_rejected() {
    let (service, _product) = setup().await;

    let response = app_as(&service, Uuid::now_v7(), &["user"])
        .oneshot(request("GET", "/?status_contains=pend", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_put_replaces_lines() {
    let (service, product) = setup().await;
    let alice = Uuid::now_v7();
    let app = app_as(&service, alice, &["user"]);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/",
            Some(json!({"items": [{"product_id": product.id, "quantity": 1}]})),
        ))
        .await
        .unwrap();
    let order = json_body(response.into_body()).await;
    let id = order["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(request(
            "PUT",
            &format!("/{}", id),
            Some(json!({
                "status": "confirmed",
                "items": [{"product_id": product.id, "quantity": 4}]
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated = json_body(response.into_body()).await;
    assert_eq!(updated["status"], "confirmed");
    assert_eq!(updated["items"][0]["quantity"], 4);
    assert_eq!(updated["total"], "39.96");
}

#[tokio::test]
async fn test_delete_then_get_is_404() {
    let (service, product) = setup().await;
    let alice = Uuid::now_v7();
    let app = app_as(&service, alice, &["user"]);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/",
            Some(json!({"items": [{"product_id": product.id, "quantity": 1}]})),
        ))
        .await
        .unwrap();
    let order = json_body(response.into_body()).await;
    let id = order["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(request("DELETE", &format!("/{}", id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(request("GET", &format!("/{}", id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
