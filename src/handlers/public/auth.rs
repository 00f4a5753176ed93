// handlers/public/auth.rs - POST /api/admin/auth/login and /logout
//
// Login is the only way to obtain a session. The token goes out twice: as the
// HttpOnly `admin_token` cookie for the browser and in the body for API
// clients that prefer a Bearer header.

use axum::{
    extract::ConnectInfo,
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::CookieJar;
use serde_json::json;
use std::net::SocketAddr;

use crate::auth::cookie::{removal_cookie, session_cookie};
use crate::auth::tokens;
use crate::config::config;
use crate::error::ApiError;
use crate::handlers::pool;
use crate::middleware::{ApiJson, ApiResponse};
use crate::services::{AuthService, LoginContext, LoginOutcome, LoginRequest};

/// POST /api/admin/auth/login - check credentials, set the session cookie
///
/// Success: `{success: true, admin: {id, username, name}, token}`.
/// Bad credentials: 401 `{success: false, error}`. Either way one login log
/// row is written.
pub async fn login_post(
    jar: CookieJar,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Response, ApiError> {
    let context = LoginContext::from_request(&headers, peer.map(|ConnectInfo(addr)| addr));
    let service = AuthService::new(pool()?, tokens().clone());

    match service.login(request, &context).await? {
        LoginOutcome::Authenticated { admin, token } => {
            let max_age = tokens().ttl().num_seconds();
            let cookie = session_cookie(token.clone(), max_age, config().security.cookie_secure);
            Ok((
                jar.add(cookie),
                Json(json!({
                    "success": true,
                    "admin": admin,
                    "token": token,
                    "message": "Login successful"
                })),
            )
                .into_response())
        }
        LoginOutcome::Rejected => Err(ApiError::unauthorized("Invalid username or password")),
    }
}

/// POST /api/admin/auth/logout - drop the session cookie
///
/// Tokens are not revoked server-side; a copied Bearer token stays valid until it expires.
pub async fn logout_post(jar: CookieJar) -> impl IntoResponse {
    (
        jar.add(removal_cookie(config().security.cookie_secure)),
        ApiResponse::message_only("Logged out"),
    )
}
