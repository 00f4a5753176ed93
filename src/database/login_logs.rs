use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{LoginLog, LoginStatus};
use crate::filter::Pagination;
use crate::types::Paginated;

/// Append-only login audit trail.
pub struct LoginLogRepository {
    pool: PgPool,
}

impl LoginLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn record(
        &self,
        admin_id: i64,
        ip_address: &str,
        user_agent: Option<&str>,
        status: LoginStatus,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO admin_login_logs (admin_id, ip_address, user_agent, status) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(admin_id)
        .bind(ip_address)
        .bind(user_agent)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Newest first.
    pub async fn list(&self, pagination: Pagination) -> Result<Paginated<LoginLog>, DatabaseError> {
        let items = sqlx::query_as::<_, LoginLog>(
            "SELECT id, admin_id, ip_address, user_agent, status, login_at \
             FROM admin_login_logs \
             ORDER BY login_at DESC, id DESC \
             LIMIT $1 OFFSET $2",
        )
        .bind(pagination.limit)
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin_login_logs")
            .fetch_one(&self.pool)
            .await?;

        Ok(Paginated::new(items, total, pagination.page, pagination.limit))
    }

    pub async fn count_since(&self, status: LoginStatus, since: DateTime<Utc>) -> Result<i64, DatabaseError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM admin_login_logs WHERE status = $1 AND login_at >= $2",
        )
        .bind(status.as_str())
        .bind(since)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
