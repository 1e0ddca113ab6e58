use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::{self, Claims};
use crate::config;
use crate::error::ApiError;

/// Verified token identity attached to the request once the credential
/// checks out. Carries only what the account resolver needs.
#[derive(Clone, Debug)]
pub struct TokenIdentity {
    pub account_id: Uuid,
    pub issued_at: DateTime<Utc>,
}

impl From<Claims> for TokenIdentity {
    fn from(claims: Claims) -> Self {
        Self {
            account_id: claims.sub,
            issued_at: claims.issued_at(),
        }
    }
}

/// Bearer-credential verification middleware. The first stage of the access
/// guard: extracts the token, verifies signature and expiry, and attaches
/// the token identity for the account resolver.
pub async fn authenticate(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let token =
        extract_bearer_token(request.headers()).map_err(ApiError::unauthorized)?;

    let secret = &config::config().security.jwt_secret;
    let claims = auth::verify_token(&token, secret).map_err(|err| {
        tracing::warn!("Token verification failed: {}", err);
        ApiError::unauthorized("Invalid or expired token. Please log in again.")
    })?;

    request.extensions_mut().insert(TokenIdentity::from(claims));

    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| "You are not logged in. Please provide a bearer token.".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return Err("Authorization header must use Bearer token format".to_string());
    };

    if token.trim().is_empty() {
        return Err("Empty bearer token".to_string());
    }

    Ok(token.to_string())
}
