//! HTTP handlers for user management (admin only)
//!
//! Account creation is public via the auth routes; everything here requires
//! the admin role.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AdminUser, Page, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{UpdateUser, UserFilter, UserResponse};
use crate::repository::UserRepository;
use crate::service::UserService;

pub const TAG: &str = "Users";

/// OpenAPI documentation for the Users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, get_user, update_user, delete_user),
    components(
        schemas(UserResponse, UpdateUser, UserFilter),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "User management endpoints (admin)")
    )
)]
pub struct ApiDoc;

/// Create the users router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .with_state(shared_service)
}

/// List users with optional filters (admin only)
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(UserFilter),
    responses(
        (status = 200, description = "Page of users", body = Page<UserResponse>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    AdminUser(_admin): AdminUser,
    Query(filter): Query<UserFilter>,
) -> UserResult<Json<Page<UserResponse>>> {
    let page = service.list_users(filter).await?;
    Ok(Json(page))
}

/// Get a user by ID (admin only)
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    AdminUser(_admin): AdminUser,
    UuidPath(id): UuidPath,
) -> UserResult<Json<UserResponse>> {
    let user = service.get_user(id).await?;
    Ok(Json(user))
}

/// Update a user (admin only)
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated successfully", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    AdminUser(_admin): AdminUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> UserResult<Json<UserResponse>> {
    let user = service.update_user(id, input).await?;
    Ok(Json(user))
}

/// Delete a user (admin only)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    AdminUser(_admin): AdminUser,
    UuidPath(id): UuidPath,
) -> UserResult<impl IntoResponse> {
    service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
