use axum::{Router, middleware};
use axum_helpers::jwt_auth_middleware;
use domain_users::{PgUserRepository, UserService, handlers};

/// User management routes: authentication required, admin role enforced
/// by the handlers.
pub fn router(state: &crate::state::AppState) -> Router {
    let repository = PgUserRepository::new(state.db.clone());
    let service = UserService::new(repository);

    handlers::router(service).layer(middleware::from_fn_with_state(
        state.jwt_auth.clone(),
        jwt_auth_middleware,
    ))
}
