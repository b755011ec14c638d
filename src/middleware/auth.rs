use axum::http::{header, HeaderMap};

use crate::auth::validate_jwt;
use crate::config::SecurityConfig;
use crate::database::models::User;
use crate::database::store::Store;
use crate::error::ApiError;

/// Resolve the caller of this request or fail.
///
/// The bearer token's subject must still name an existing user; a valid token for a
/// deleted account is rejected the same way as a bad token.
pub async fn require_user(
    store: &dyn Store,
    security: &SecurityConfig,
    headers: &HeaderMap,
) -> Result<User, ApiError> {
    let token = extract_jwt_from_headers(headers).map_err(ApiError::unauthorized)?;

    let claims = validate_jwt(&token, security).map_err(|e| {
        tracing::warn!("Rejected bearer token: {}", e);
        ApiError::unauthorized("Invalid or expired token")
    })?;

    match store.find_user(&claims.sub).await? {
        Some(user) => Ok(user),
        None => {
            tracing::warn!("Token subject '{}' no longer exists", claims.sub);
            Err(ApiError::unauthorized("Invalid or expired token"))
        }
    }
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
