use axum::Router;

pub mod auth;
pub mod health;
pub mod orders;
pub mod products;
pub mod users;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix is added by the `create_router` helper.
///
/// Each resource mounts an explicit verb→handler table built by its domain
/// crate; authentication middleware is layered per resource so the
/// permission policy is visible in one place:
/// - `/products`: optional auth (anonymous reads, admin writes)
/// - `/orders`: required auth (ownership-scoped)
/// - `/users`: required auth (admin management)
/// - `/auth`: optional auth (public register/login, `/me` needs a token)
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new()
        .nest("/auth", auth::router(state))
        .nest("/users", users::router(state))
        .nest("/products", products::router(state))
        .nest("/orders", orders::router(state))
}

/// Creates a router with the /ready endpoint that performs actual health checks.
///
/// This router has state applied and can be merged with the stateless app
/// router from `create_router`.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
