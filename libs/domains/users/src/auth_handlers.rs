//! Authentication endpoints: register, login, current principal.
//!
//! Register and login are public; `/me` reads the verified claims placed in
//! request extensions by the auth middleware.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AuditEvent, AuditOutcome, CurrentUser, JwtAuth, ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
        UnauthorizedResponse,
    },
    extract_ip_from_headers, extract_user_agent,
};
use utoipa::OpenApi;

use crate::error::{UserError, UserResult};
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, UserResponse};
use crate::repository::UserRepository;
use crate::service::UserService;

pub const TAG: &str = "Auth";

/// OpenAPI documentation for the Auth API
#[derive(OpenApi)]
#[openapi(
    paths(register, login, me),
    components(
        schemas(RegisterRequest, LoginRequest, LoginResponse, UserResponse),
        responses(
            BadRequestValidationResponse,
            UnauthorizedResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Registration and login endpoints")
    )
)]
pub struct ApiDoc;

/// Application state for auth handlers
#[derive(Clone)]
pub struct AuthState<R: UserRepository> {
    pub service: UserService<R>,
    pub jwt_auth: JwtAuth,
}

/// Create the auth router
pub fn router<R: UserRepository + Clone + 'static>(state: AuthState<R>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .with_state(state)
}

fn issue_token<R: UserRepository>(
    state: &AuthState<R>,
    user: &UserResponse,
) -> UserResult<LoginResponse> {
    let access_token = state
        .jwt_auth
        .create_access_token(&user.id.to_string(), &user.email, &user.name, &user.roles)
        .map_err(|e| {
            tracing::error!("Failed to create access token: {:?}", e);
            UserError::Internal("Failed to create token".to_string())
        })?;

    Ok(LoginResponse {
        user: user.clone(),
        access_token,
        token_type: "Bearer".to_string(),
    })
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/register",
    tag = TAG,
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = LoginResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register<R: UserRepository + Clone>(
    State(state): State<AuthState<R>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> UserResult<impl IntoResponse> {
    let user = state.service.register(input).await?;

    AuditEvent::new(
        Some(user.id.to_string()),
        "user.register",
        Some(format!("user:{}", user.id)),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .log();

    let response = issue_token(&state, &user)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with email/password
#[utoipa::path(
    post,
    path = "/login",
    tag = TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<R: UserRepository + Clone>(
    State(state): State<AuthState<R>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Json<LoginResponse>> {
    let verified = state
        .service
        .verify_credentials(&input.email, &input.password)
        .await;

    let user: UserResponse = match verified {
        Ok(user) => user.into(),
        Err(err) => {
            AuditEvent::new(
                None,
                "user.login",
                Some(format!("email:{}", input.email)),
                AuditOutcome::Failure,
            )
            .with_ip(extract_ip_from_headers(&headers))
            .with_user_agent(extract_user_agent(&headers))
            .log();

            return Err(err);
        }
    };

    AuditEvent::new(
        Some(user.id.to_string()),
        "user.login",
        Some(format!("user:{}", user.id)),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .log();

    let response = issue_token(&state, &user)?;
    Ok(Json(response))
}

/// Return the authenticated principal
#[utoipa::path(
    get,
    path = "/me",
    tag = TAG,
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn me<R: UserRepository + Clone>(
    State(state): State<AuthState<R>>,
    user: CurrentUser,
) -> UserResult<Json<UserResponse>> {
    let user = state.service.get_user(user.id).await?;
    Ok(Json(user))
}
