use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::auth::AdminIdentity;

/// Full `admins` row, password hash included. Never serialized to clients.
#[derive(Debug, Clone, FromRow)]
pub struct AdminRow {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub name: String,
    pub last_login: Option<DateTime<Utc>>,
    pub login_count: i64,
    pub ip_address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub last_login: Option<DateTime<Utc>>,
    pub login_count: i64,
    pub ip_address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<AdminRow> for Admin {
    fn from(row: AdminRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            name: row.name,
            last_login: row.last_login,
            login_count: row.login_count,
            ip_address: row.ip_address,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

impl AdminRow {
    pub fn identity(&self) -> AdminIdentity {
        AdminIdentity {
            id: self.id,
            username: self.username.clone(),
            name: self.name.clone(),
        }
    }
}
