use axum_helpers::JwtConfig;
use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use database::postgres::PostgresConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the core libraries
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub jwt: JwtConfig,
    pub server: ServerConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // Required - will fail if not set
        let jwt = JwtConfig::from_env()?; // Required - will fail if not set
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080

        Ok(Self {
            app: app_info!(),
            database,
            jwt,
            server,
            environment,
        })
    }
}
