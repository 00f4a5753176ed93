// handlers/protected/auth.rs - GET /api/admin/auth/session

use axum::Extension;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::middleware::{ApiResponse, ApiResult, AuthAdmin};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub admin: AuthAdmin,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// GET /api/admin/auth/session - who the current token belongs to and when it lapses
pub async fn session_get(Extension(admin): Extension<AuthAdmin>) -> ApiResult<SessionInfo> {
    let issued_at = DateTime::<Utc>::from_timestamp(admin.issued_at, 0);
    let expires_at = DateTime::<Utc>::from_timestamp(admin.expires_at, 0);
    Ok(ApiResponse::success(SessionInfo {
        admin,
        issued_at,
        expires_at,
    }))
}
