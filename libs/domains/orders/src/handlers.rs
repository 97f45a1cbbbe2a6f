//! HTTP handlers for the Orders API
//!
//! Every route requires an authenticated caller. Non-admin callers only
//! ever observe their own orders; rows outside their scope yield 404.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AuditEvent, AuditOutcome, CurrentUser, Page, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse, UnauthorizedResponse,
    },
    extract_ip_from_headers, extract_user_agent,
};
use domain_products::ProductRepository;
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::OrderResult;
use crate::models::{
    CreateOrder, OrderFilter, OrderItemDetail, OrderResponse, PatchOrder, UpdateOrder,
};
use crate::repository::OrderRepository;
use crate::service::{OrderService, Viewer};

pub const TAG: &str = "Orders";

/// OpenAPI documentation for the Orders API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_orders,
        create_order,
        get_order,
        replace_order,
        patch_order,
        delete_order,
    ),
    components(
        schemas(OrderResponse, OrderItemDetail, CreateOrder, UpdateOrder, PatchOrder, OrderFilter),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Order endpoints (authenticated, ownership-scoped)")
    )
)]
pub struct ApiDoc;

fn viewer(user: &CurrentUser) -> Viewer {
    Viewer {
        user_id: user.id,
        is_staff: user.is_admin(),
    }
}

/// Create the orders router with all HTTP endpoints
pub fn router<R, P>(service: OrderService<R, P>) -> Router
where
    R: OrderRepository + 'static,
    P: ProductRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route(
            "/{id}",
            get(get_order)
                .put(replace_order)
                .patch(patch_order)
                .delete(delete_order),
        )
        .with_state(shared_service)
}

/// List orders visible to the caller
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(OrderFilter),
    responses(
        (status = 200, description = "Page of orders", body = Page<OrderResponse>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_orders<R: OrderRepository, P: ProductRepository>(
    State(service): State<Arc<OrderService<R, P>>>,
    user: CurrentUser,
    Query(filter): Query<OrderFilter>,
) -> OrderResult<Json<Page<OrderResponse>>> {
    let page = service.list_orders(viewer(&user), filter).await?;
    Ok(Json(page))
}

/// Create an order owned by the caller.
///
/// The owner is taken from the verified identity; any owner field in the
/// request body is ignored.
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateOrder,
    responses(
        (status = 201, description = "Order created successfully", body = OrderResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_order<R: OrderRepository, P: ProductRepository>(
    State(service): State<Arc<OrderService<R, P>>>,
    user: CurrentUser,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateOrder>,
) -> OrderResult<impl IntoResponse> {
    let order = service.create_order(viewer(&user), input).await?;

    AuditEvent::new(
        Some(user.id.to_string()),
        "order.create",
        Some(format!("order:{}", order.id)),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .with_details(json!({
        "status": order.status.to_string(),
        "items": order.items.len(),
        "total": order.total,
    }))
    .log();

    Ok((StatusCode::CREATED, Json(order)))
}

/// Get an order by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_order<R: OrderRepository, P: ProductRepository>(
    State(service): State<Arc<OrderService<R, P>>>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
) -> OrderResult<Json<OrderResponse>> {
    let order = service.get_order(viewer(&user), id).await?;
    Ok(Json(order))
}

/// Replace an order (PUT is a full replace; lines take fresh snapshots)
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrder,
    responses(
        (status = 200, description = "Order updated successfully", body = OrderResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn replace_order<R: OrderRepository, P: ProductRepository>(
    State(service): State<Arc<OrderService<R, P>>>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateOrder>,
) -> OrderResult<Json<OrderResponse>> {
    let order = service.replace_order(viewer(&user), id, input).await?;
    Ok(Json(order))
}

/// Partially update an order (PATCH)
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = PatchOrder,
    responses(
        (status = 200, description = "Order updated successfully", body = OrderResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn patch_order<R: OrderRepository, P: ProductRepository>(
    State(service): State<Arc<OrderService<R, P>>>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<PatchOrder>,
) -> OrderResult<Json<OrderResponse>> {
    let order = service.patch_order(viewer(&user), id, input).await?;
    Ok(Json(order))
}

/// Delete an order
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 204, description = "Order deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_order<R: OrderRepository, P: ProductRepository>(
    State(service): State<Arc<OrderService<R, P>>>,
    user: CurrentUser,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
) -> OrderResult<impl IntoResponse> {
    service.delete_order(viewer(&user), id).await?;

    AuditEvent::new(
        Some(user.id.to_string()),
        "order.delete",
        Some(format!("order:{}", id)),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .log();

    Ok(StatusCode::NO_CONTENT)
}
