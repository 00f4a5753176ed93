use axum::http::HeaderMap;
use serde::Deserialize;
use sqlx::PgPool;
use std::net::SocketAddr;

use crate::auth::password::verify_password;
use crate::auth::{AdminIdentity, TokenService};
use crate::database::models::LoginStatus;
use crate::database::{AdminRepository, LoginLogRepository};
use crate::error::ApiError;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Where a login attempt came from, for the audit trail.
#[derive(Debug, Clone)]
pub struct LoginContext {
    pub ip_address: String,
    pub user_agent: Option<String>,
}

impl LoginContext {
    pub fn from_request(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        Self {
            ip_address: client_ip(headers, peer),
            user_agent: headers
                .get(axum::http::header::USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        }
    }
}

#[derive(Debug)]
pub enum LoginOutcome {
    Authenticated { admin: AdminIdentity, token: String },
    Rejected,
}

/// Client address: first `X-Forwarded-For` hop, then `X-Real-IP`, then the socket peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|ip| !ip.is_empty())
        })
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

pub struct AuthService {
    admins: AdminRepository,
    logs: LoginLogRepository,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(pool: PgPool, tokens: TokenService) -> Self {
        Self {
            admins: AdminRepository::new(pool.clone()),
            logs: LoginLogRepository::new(pool),
            tokens,
        }
    }

    /// Check credentials and issue a session token.
    ///
    /// Every attempt that reaches the credential check writes exactly one login log
    /// row. Unknown usernames are logged against admin id 0.
    pub async fn login(&self, request: LoginRequest, context: &LoginContext) -> Result<LoginOutcome, ApiError> {
        let username = request.username.as_deref().map(str::trim).unwrap_or_default();
        let password = request.password.as_deref().unwrap_or_default();
        if username.is_empty() || password.is_empty() {
            return Err(ApiError::bad_request("Username and password are required"));
        }

        let admin = match self.admins.find_by_username(username).await? {
            Some(admin) if admin.is_active => admin,
            Some(admin) => {
                tracing::warn!("Login rejected for inactive admin '{}' from {}", username, context.ip_address);
                self.log(admin.id, context, LoginStatus::Failed).await?;
                return Ok(LoginOutcome::Rejected);
            }
            None => {
                tracing::warn!("Login rejected for unknown admin '{}' from {}", username, context.ip_address);
                self.log(0, context, LoginStatus::Failed).await?;
                return Ok(LoginOutcome::Rejected);
            }
        };

        let matches = verify_password(password, &admin.password).await.map_err(|e| {
            tracing::error!("Password verification failed: {}", e);
            ApiError::internal_server_error("Failed to verify credentials")
        })?;
        if !matches {
            tracing::warn!("Wrong password for admin '{}' from {}", username, context.ip_address);
            self.log(admin.id, context, LoginStatus::Failed).await?;
            return Ok(LoginOutcome::Rejected);
        }

        let identity = admin.identity();
        let token = self.tokens.issue(&identity)?;
        self.admins.record_login(admin.id, &context.ip_address).await?;
        self.log(admin.id, context, LoginStatus::Success).await?;

        tracing::info!("Admin '{}' logged in from {}", identity.username, context.ip_address);
        Ok(LoginOutcome::Authenticated { admin: identity, token })
    }

    async fn log(&self, admin_id: i64, context: &LoginContext, status: LoginStatus) -> Result<(), ApiError> {
        self.logs
            .record(admin_id, &context.ip_address, context.user_agent.as_deref(), status)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn forwarded_for_wins() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));
        assert_eq!(client_ip(&headers, None), "203.0.113.7");
    }

    #[test]
    fn real_ip_then_peer() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));
        assert_eq!(client_ip(&headers, None), "198.51.100.2");

        let peer: SocketAddr = "192.0.2.10:5123".parse().unwrap();
        assert_eq!(client_ip(&HeaderMap::new(), Some(peer)), "192.0.2.10");
        assert_eq!(client_ip(&HeaderMap::new(), None), "unknown");
    }

    #[test]
    fn context_captures_user_agent() {
        let mut headers = HeaderMap::new();
        headers.insert("user-agent", HeaderValue::from_static("curl/8.0"));
        let context = LoginContext::from_request(&headers, None);
        assert_eq!(context.user_agent.as_deref(), Some("curl/8.0"));
    }
}
