//! JWT configuration.
//!
//! Implements the `FromEnv` trait from `core_config`, following the same
//! pattern as `PostgresConfig` and `ServerConfig`.

use core_config::{ConfigError, FromEnv, env_required};

/// JWT authentication configuration.
///
/// Loaded from environment variables:
/// - `JWT_SECRET` (required) - Must be at least 32 characters
///
/// # Example
///
/// ```ignore
/// use axum_helpers::JwtConfig;
/// use core_config::FromEnv;
///
/// // From environment variables
/// let config = JwtConfig::from_env()?;
///
/// // Manual construction (for testing)
/// let config = JwtConfig::new("my-super-secret-key-that-is-at-least-32-chars");
/// ```
#[derive(Clone, Debug)]
pub struct JwtConfig {
    /// JWT signing secret (minimum 32 characters)
    pub secret: String,
}

impl JwtConfig {
    /// Create a new JwtConfig with the given secret.
    ///
    /// # Panics
    /// Panics if the secret is less than 32 characters.
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        assert!(
            secret.len() >= 32,
            "JWT secret must be at least 32 characters"
        );
        Self { secret }
    }
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;

        if secret.len() < 32 {
            return Err(ConfigError::ParseError {
                key: "JWT_SECRET".to_string(),
                details: format!(
                    "must be at least 32 characters for security (got {}). Generate one with: openssl rand -base64 32",
                    secret.len()
                ),
            });
        }

        Ok(Self { secret })
    }
}
