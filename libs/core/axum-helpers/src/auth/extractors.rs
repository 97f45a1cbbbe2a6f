//! Identity extractors for request handlers.
//!
//! These consume the [`JwtClaims`] placed into request extensions by the
//! authentication middleware. Using an extractor (rather than re-parsing the
//! token) keeps the authorization decision at the handler signature:
//! `CurrentUser` demands an authenticated caller, `AdminUser` additionally
//! demands the admin role.

use super::jwt::JwtClaims;
use crate::errors::AppError;
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// Role string that grants elevated (staff) permissions.
pub const ADMIN_ROLE: &str = "admin";

/// The authenticated caller, extracted from verified JWT claims.
///
/// Rejects with 401 when the request carries no verified identity (no
/// token, or the auth middleware was not applied to the route).
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == ADMIN_ROLE)
    }

    fn from_claims(claims: &JwtClaims) -> Result<Self, Response> {
        let id = Uuid::parse_str(&claims.sub).map_err(|_| {
            tracing::warn!(sub = %claims.sub, "JWT subject is not a valid UUID");
            AppError::Unauthorized("Invalid token".to_string()).into_response()
        })?;

        Ok(Self {
            id,
            email: claims.email.clone(),
            name: claims.name.clone(),
            roles: claims.roles.clone(),
        })
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts.extensions.get::<JwtClaims>().ok_or_else(|| {
            AppError::Unauthorized("Authentication required".to_string()).into_response()
        })?;

        Self::from_claims(claims)
    }
}

/// An authenticated caller holding the admin role.
///
/// Rejects with 401 when no identity is present and 403 when the identity
/// is valid but lacks the admin role; the two failures are deliberately
/// distinct status codes.
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            return Err(
                AppError::Forbidden("Admin privileges required".to_string()).into_response(),
            );
        }

        Ok(AdminUser(user))
    }
}
