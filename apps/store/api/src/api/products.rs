use axum::{Router, middleware};
use axum_helpers::optional_jwt_auth_middleware;
use domain_products::{PgProductRepository, ProductService, handlers};

/// Product routes: anonymous reads, admin-gated writes.
///
/// Auth is optional here so anonymous list/retrieve/info pass through;
/// the write handlers demand an admin identity via extractors.
pub fn router(state: &crate::state::AppState) -> Router {
    let repository = PgProductRepository::new(state.db.clone());
    let service = ProductService::new(repository);

    handlers::router(service).layer(middleware::from_fn_with_state(
        state.jwt_auth.clone(),
        optional_jwt_auth_middleware,
    ))
}
