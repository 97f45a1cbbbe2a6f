use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    // Connect to PostgreSQL with retry for transient startup failures
    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    // Apply migrations explicitly at startup; this also registers the
    // initial admin account and demo catalog
    database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name)
        .await
        .map_err(|e| eyre::eyre!("Migration failed: {}", e))?;

    // Initialize stateless JWT authentication
    let jwt_auth = axum_helpers::JwtAuth::new(&config.jwt);

    // Initialize the application state
    let state = AppState {
        config,
        db,
        jwt_auth,
    };

    // Build router with API routes (pass reference, not ownership!)
    let api_routes = api::routes(&state);

    // create_router adds docs/middleware to our composed routes
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;

    // Merge health endpoints into the app
    // - /health: liveness check with app name/version
    // - /ready: readiness check with an actual db health check
    let app = router
        .merge(health_router(state.config.app.clone()))
        .merge(api::ready_router(state.clone()));

    info!("Starting storefront API with graceful shutdown (30s timeout)");

    // Production-ready server with graceful shutdown and cleanup
    // State moves here for cleanup
    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30), // 30s graceful shutdown timeout
        async move {
            info!("Shutting down: closing database connection");

            match state.db.close().await {
                Ok(_) => info!("PostgreSQL connection closed successfully"),
                Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Storefront API shutdown complete");
    Ok(())
}
