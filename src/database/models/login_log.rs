use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginStatus {
    Success,
    Failed,
}

impl LoginStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginStatus::Success => "success",
            LoginStatus::Failed => "failed",
        }
    }
}

/// One login attempt. `admin_id` is 0 when the username matched no admin.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LoginLog {
    pub id: i64,
    pub admin_id: i64,
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub status: String,
    pub login_at: DateTime<Utc>,
}
