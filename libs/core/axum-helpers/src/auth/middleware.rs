use super::jwt::JwtAuth;
use crate::errors::AppError;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Extract a bearer token from the Authorization header
fn extract_token_from_request(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer ").map(|s| s.to_string()))
}

/// JWT authentication middleware.
///
/// Validates the bearer token from the Authorization header, checking
/// signature and expiry. Inserts [`super::JwtClaims`] into request
/// extensions on success; responds 401 otherwise.
///
/// # Example
///
/// ```ignore
/// use axum::Router;
/// use axum::routing::get;
/// use axum_helpers::{JwtAuth, jwt_auth_middleware};
///
/// let protected_routes = Router::new()
///     .route("/api/orders", get(list_orders))
///     .layer(axum::middleware::from_fn_with_state(
///         auth.clone(),
///         jwt_auth_middleware
///     ));
/// ```
pub async fn jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = match extract_token_from_request(&headers) {
        Some(t) => t,
        None => {
            tracing::debug!("No bearer token in Authorization header");
            return Err(
                AppError::Unauthorized("Authentication required".to_string()).into_response(),
            );
        }
    };

    let claims = match auth.verify_token(&token) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!("JWT verification failed: {}", e);
            return Err(AppError::Unauthorized("Invalid token".to_string()).into_response());
        }
    };

    // Token is valid - insert claims into request extensions
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Optional JWT authentication middleware.
///
/// Like [`jwt_auth_middleware`] but does not fail when no token is present.
/// Useful for routes where anonymous reads are allowed but write handlers
/// still demand an identity via extractors.
pub async fn optional_jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_token_from_request(&headers) {
        if let Ok(claims) = auth.verify_token(&token) {
            request.extensions_mut().insert(claims);
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_token_from_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(
            extract_token_from_request(&headers),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn test_extract_token_missing_or_malformed() {
        let headers = HeaderMap::new();
        assert_eq!(extract_token_from_request(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(extract_token_from_request(&headers), None);
    }
}
