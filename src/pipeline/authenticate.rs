// Authentication stage: bearer credential verification

use axum::http::{header, HeaderMap};
use thiserror::Error;

use crate::auth;
use crate::config::SecurityConfig;

/// Failures of the authentication stage. All translate to 401; the variants
/// are kept apart for logging and tests.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// No Authorization header on the request.
    #[error("Missing Authorization header")]
    Missing,

    /// Header present but not in `Bearer <token>` shape.
    #[error("Format is Authorization: Bearer [token]")]
    Malformed,

    /// Token failed signature or expiry verification.
    #[error("Invalid or expired bearer token")]
    Invalid,
}

/// Verify the bearer credential on a protected request and return the
/// subject claim for the request context.
pub fn verify_bearer(security: &SecurityConfig, headers: &HeaderMap) -> Result<String, AuthError> {
    let token = extract_bearer(headers)?;

    let claims = auth::verify(security, token).map_err(|err| {
        tracing::warn!("bearer token rejected: {}", err);
        AuthError::Invalid
    })?;

    Ok(claims.sub)
}

/// Extract the token from the Authorization header.
fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::Missing)?;

    let value = value.to_str().map_err(|_| AuthError::Malformed)?;

    let token = value.strip_prefix("Bearer ").ok_or(AuthError::Malformed)?;
    if token.trim().is_empty() {
        return Err(AuthError::Malformed);
    }

    Ok(token)
}
