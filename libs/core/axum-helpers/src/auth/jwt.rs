use super::config::JwtConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access token time-to-live in seconds (15 minutes)
pub const ACCESS_TOKEN_TTL: i64 = 900;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,        // Subject (user ID)
    pub email: String,      // User email
    pub name: String,       // User name
    pub roles: Vec<String>, // User roles
    pub exp: i64,           // Expiration time
    pub iat: i64,           // Issued at
    pub jti: String,        // JWT ID
}

/// Stateless JWT authentication.
///
/// Tokens are HS256-signed and verified from the signature alone; there is
/// no server-side session state.
#[derive(Clone)]
pub struct JwtAuth {
    secret: String,
}

impl JwtAuth {
    /// Create a new JWT auth instance.
    ///
    /// # Example
    /// ```ignore
    /// use axum_helpers::{JwtAuth, JwtConfig};
    /// use core_config::FromEnv;
    ///
    /// let config = JwtConfig::from_env()?;
    /// let jwt_auth = JwtAuth::new(&config);
    /// ```
    pub fn new(config: &JwtConfig) -> Self {
        tracing::info!("JWT auth initialized");
        Self {
            secret: config.secret.clone(),
        }
    }

    /// Create an access token (15 min)
    pub fn create_access_token(
        &self,
        user_id: &str,
        email: &str,
        name: &str,
        roles: &[String],
    ) -> eyre::Result<String> {
        self.create_token(user_id, email, name, roles, ACCESS_TOKEN_TTL)
    }

    /// Create a JWT token with the specified TTL
    fn create_token(
        &self,
        user_id: &str,
        email: &str,
        name: &str,
        roles: &[String],
        ttl_seconds: i64,
    ) -> eyre::Result<String> {
        let now = Utc::now();
        let exp = (now + Duration::seconds(ttl_seconds)).timestamp();
        let iat = now.timestamp();
        let jti = Uuid::new_v4().to_string();

        let claims = JwtClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            roles: roles.to_vec(),
            exp,
            iat,
            jti,
        };

        let header = Header {
            alg: jsonwebtoken::Algorithm::HS256,
            ..Default::default()
        };

        let token = encode(
            &header,
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Verify JWT token signature and decode claims
    pub fn verify_token(&self, token: &str) -> eyre::Result<JwtClaims> {
        let token_data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("test-secret-that-is-long-enough-123456"))
    }

    #[test]
    fn test_token_round_trip() {
        let auth = test_auth();
        let user_id = Uuid::now_v7().to_string();
        let roles = vec!["user".to_string(), "admin".to_string()];

        let token = auth
            .create_access_token(&user_id, "a@example.com", "Ada", &roles)
            .unwrap();
        let claims = auth.verify_token(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.roles, roles);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let auth = test_auth();
        assert!(auth.verify_token("not-a-jwt").is_err());
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let auth = test_auth();
        let other = JwtAuth::new(&JwtConfig::new("another-secret-that-is-long-enough-12"));

        let token = other
            .create_access_token("id", "a@example.com", "Ada", &[])
            .unwrap();

        assert!(auth.verify_token(&token).is_err());
    }
}
