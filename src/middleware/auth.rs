use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde::Serialize;

use crate::auth::{cookie::token_from_headers, Claims, TokenService};
use crate::error::ApiError;

/// Shared state for both session guards.
#[derive(Clone, Debug)]
pub struct SessionGuard {
    pub tokens: TokenService,
    pub cookie_secure: bool,
}

impl SessionGuard {
    pub fn new(tokens: TokenService, cookie_secure: bool) -> Self {
        Self {
            tokens,
            cookie_secure,
        }
    }

    pub fn from_config() -> Self {
        Self::new(
            crate::auth::tokens().clone(),
            crate::config::config().security.cookie_secure,
        )
    }
}

/// Authenticated admin context extracted from a verified session token
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthAdmin {
    pub id: i64,
    pub username: String,
    pub name: String,
    #[serde(skip)]
    pub issued_at: i64,
    #[serde(skip)]
    pub expires_at: i64,
}

impl From<Claims> for AuthAdmin {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            username: claims.username,
            name: claims.name,
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }
}

/// JSON API guard: a valid token from the session cookie or a Bearer header,
/// otherwise 401 in the error envelope.
pub async fn require_admin_session(
    State(guard): State<SessionGuard>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = token_from_headers(request.headers())
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    let claims = guard.tokens.verify(&token).map_err(|e| {
        tracing::debug!("Rejected admin API token: {}", e);
        ApiError::unauthorized("Invalid or expired session")
    })?;

    request.extensions_mut().insert(AuthAdmin::from(claims));
    Ok(next.run(request).await)
}
