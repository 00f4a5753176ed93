use sqlx::PgPool;

use crate::database::manager::{DatabaseError, UNIQUE_VIOLATION};
use crate::database::models::AdminRow;

const ADMIN_COLUMNS: &str =
    "id, username, password, name, last_login, login_count, ip_address, is_active, created_at";

pub struct AdminRepository {
    pool: PgPool,
}

impl AdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<AdminRow>, DatabaseError> {
        let row = sqlx::query_as::<_, AdminRow>(&format!(
            "SELECT {} FROM admins WHERE username = $1",
            ADMIN_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Stamp a successful login on the admin row.
    pub async fn record_login(&self, id: i64, ip_address: &str) -> Result<(), DatabaseError> {
        sqlx::query(
            "UPDATE admins SET last_login = NOW(), login_count = login_count + 1, ip_address = $2 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(ip_address)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<AdminRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, AdminRow>(&format!(
            "SELECT {} FROM admins ORDER BY id ASC",
            ADMIN_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// `password_hash` must already be a bcrypt hash.
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        name: &str,
    ) -> Result<AdminRow, DatabaseError> {
        sqlx::query_as::<_, AdminRow>(&format!(
            "INSERT INTO admins (username, password, name) VALUES ($1, $2, $3) RETURNING {}",
            ADMIN_COLUMNS
        ))
        .bind(username)
        .bind(password_hash)
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let err = DatabaseError::from(e);
            if err.sqlstate().as_deref() == Some(UNIQUE_VIOLATION) {
                DatabaseError::Conflict(format!("Admin '{}' already exists", username))
            } else {
                err
            }
        })
    }

    pub async fn set_active(&self, username: &str, is_active: bool) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE admins SET is_active = $2 WHERE username = $1")
            .bind(username)
            .bind(is_active)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Admin '{}' not found", username)));
        }
        Ok(())
    }
}
