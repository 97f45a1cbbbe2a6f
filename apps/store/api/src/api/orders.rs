use axum::{Router, middleware};
use axum_helpers::jwt_auth_middleware;
use domain_orders::{OrderService, PgOrderRepository, handlers};
use domain_products::PgProductRepository;

/// Order routes: authentication required, visibility scoped by ownership.
pub fn router(state: &crate::state::AppState) -> Router {
    let orders = PgOrderRepository::new(state.db.clone());
    let products = PgProductRepository::new(state.db.clone());
    let service = OrderService::new(orders, products);

    handlers::router(service).layer(middleware::from_fn_with_state(
        state.jwt_auth.clone(),
        jwt_auth_middleware,
    ))
}
