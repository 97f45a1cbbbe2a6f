use axum::{Router, middleware};
use axum_helpers::optional_jwt_auth_middleware;
use domain_users::auth_handlers::{self, AuthState};
use domain_users::{PgUserRepository, UserService};

/// Auth routes: public register/login; `/me` reads the optional identity.
pub fn router(state: &crate::state::AppState) -> Router {
    let repository = PgUserRepository::new(state.db.clone());
    let service = UserService::new(repository);

    let auth_state = AuthState {
        service,
        jwt_auth: state.jwt_auth.clone(),
    };

    auth_handlers::router(auth_state).layer(middleware::from_fn_with_state(
        state.jwt_auth.clone(),
        optional_jwt_auth_middleware,
    ))
}
