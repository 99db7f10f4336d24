use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{header, request::Parts},
};

use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{Claims, verify_token};

/// Extractor that requires a valid bearer token and exposes its claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn subject(&self) -> &str {
        &self.0.sub
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = match bearer_claims(parts, state)? {
            Some(claims) => claims,
            None => return Err(AppError::unauthorized("Missing authorization header")),
        };

        Ok(AuthUser(claims))
    }
}

/// The identity a request runs as: an authenticated subject, or an
/// anonymous per-IP bucket. Used by endpoints that accept unauthenticated
/// callers but still need a key for quota accounting.
///
/// A present-but-invalid token is rejected outright rather than downgraded
/// to anonymous.
#[derive(Debug, Clone)]
pub enum Caller {
    User(Claims),
    Anonymous(String),
}

impl Caller {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Caller::User(_))
    }

    /// Bucket key for quota accounting.
    pub fn throttle_key(&self) -> String {
        match self {
            Caller::User(claims) => format!("user:{}", claims.sub),
            Caller::Anonymous(bucket) => format!("anon:{bucket}"),
        }
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_claims(parts, state)? {
            Some(claims) => Ok(Caller::User(claims)),
            None => Ok(Caller::Anonymous(client_bucket(parts))),
        }
    }
}

/// Verify the Authorization header if one is present.
///
/// Returns `Ok(None)` when the header is absent, and an error when it is
/// present but malformed or carries an invalid token.
fn bearer_claims(parts: &Parts, state: &AppState) -> Result<Option<Claims>, AppError> {
    let auth_header = match parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    {
        Some(value) => value,
        None => return Ok(None),
    };

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

    verify_token(token, &state.jwt_config).map(Some)
}

/// Best-effort client address for anonymous quota bucketing: the usual
/// proxy headers first, then the peer address of the connection itself, so
/// direct callers do not all collapse into one shared bucket.
fn client_bucket(parts: &Parts) -> String {
    let from_header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    from_header("x-forwarded-for")
        .or_else(|| from_header("x-real-ip"))
        .or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|info| info.0.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}
