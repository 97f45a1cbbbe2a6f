//! HTTP handlers for the Products API
//!
//! Reads are open to anonymous callers; mutating verbs require the admin
//! role (401 without an identity, 403 with a non-admin identity).

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AdminUser, AuditEvent, AuditOutcome, Page, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    extract_ip_from_headers, extract_user_agent,
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product, ProductFilter, ProductInfo, UpdateProduct};
use crate::repository::ProductRepository;
use crate::service::ProductService;

pub const TAG: &str = "Products";

/// OpenAPI documentation for the Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        product_info,
        get_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(Product, CreateProduct, UpdateProduct, ProductFilter, ProductInfo),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Create the products router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/info", get(product_info))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(shared_service)
}

/// List products with optional filters, search, ordering and pagination
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(ProductFilter),
    responses(
        (status = 200, description = "Page of products", body = Page<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(filter): Query<ProductFilter>,
) -> ProductResult<Json<Page<Product>>> {
    let page = service.list_products(filter).await?;
    Ok(Json(page))
}

/// Create a new product (admin only)
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created successfully", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    AdminUser(admin): AdminUser,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(input).await?;

    AuditEvent::new(
        Some(admin.id.to_string()),
        "product.create",
        Some(format!("product:{}", product.id)),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .with_details(json!({
        "name": product.name,
        "price": product.price,
    }))
    .log();

    Ok((StatusCode::CREATED, Json(product)))
}

/// Aggregate catalog view: all products with count and max price
#[utoipa::path(
    get,
    path = "/info",
    tag = TAG,
    responses(
        (status = 200, description = "Catalog aggregate", body = ProductInfo),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn product_info<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<Json<ProductInfo>> {
    let info = service.product_info().await?;
    Ok(Json(info))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<Product>> {
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

/// Replace a product (admin only; PUT is a full replace)
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated successfully", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    AdminUser(_admin): AdminUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<Json<Product>> {
    let product = service.update_product(id, input).await?;
    Ok(Json(product))
}

/// Delete a product (admin only)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    AdminUser(admin): AdminUser,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
) -> ProductResult<impl IntoResponse> {
    service.delete_product(id).await?;

    AuditEvent::new(
        Some(admin.id.to_string()),
        "product.delete",
        Some(format!("product:{}", id)),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .log();

    Ok(StatusCode::NO_CONTENT)
}
