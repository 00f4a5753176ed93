use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{HistoryEntry, ValidatedHistory};

const HISTORY_COLUMNS: &str = "id, year, date, description, created_at";

pub struct HistoryRepository {
    pool: PgPool,
}

impl HistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Every entry, newest year first, then by date text descending.
    pub async fn list(&self) -> Result<Vec<HistoryEntry>, DatabaseError> {
        let rows = sqlx::query_as::<_, HistoryEntry>(&format!(
            "SELECT {} FROM history ORDER BY year DESC, date DESC, id ASC",
            HISTORY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn create(&self, entry: ValidatedHistory) -> Result<HistoryEntry, DatabaseError> {
        let row = sqlx::query_as::<_, HistoryEntry>(&format!(
            "INSERT INTO history (year, date, description) VALUES ($1, $2, $3) RETURNING {}",
            HISTORY_COLUMNS
        ))
        .bind(entry.year)
        .bind(&entry.date)
        .bind(&entry.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&self, id: i64, entry: ValidatedHistory) -> Result<HistoryEntry, DatabaseError> {
        sqlx::query_as::<_, HistoryEntry>(&format!(
            "UPDATE history SET year = $2, date = $3, description = $4 WHERE id = $1 RETURNING {}",
            HISTORY_COLUMNS
        ))
        .bind(id)
        .bind(entry.year)
        .bind(&entry.date)
        .bind(&entry.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("History entry {} not found", id)))
    }

    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM history WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("History entry {} not found", id)));
        }
        Ok(())
    }
}
