use sqlx::PgPool;

use crate::database::manager::{DatabaseError, FOREIGN_KEY_VIOLATION};
use crate::database::models::{Category, CategorySummary, CategoryWithCount};

pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active categories for the public filter tabs.
    pub async fn list_active(&self) -> Result<Vec<CategorySummary>, DatabaseError> {
        let rows = sqlx::query_as::<_, CategorySummary>(
            "SELECT id, name FROM work_categories WHERE is_active = TRUE ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, DatabaseError> {
        let rows = sqlx::query_as::<_, CategoryWithCount>(
            "SELECT c.id, c.name, c.is_active, c.created_at, COUNT(w.id) AS work_count \
             FROM work_categories c \
             LEFT JOIN works w ON w.category_id = c.id \
             GROUP BY c.id \
             ORDER BY c.id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn create(&self, name: &str, is_active: bool) -> Result<Category, DatabaseError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO work_categories (name, is_active) VALUES ($1, $2) \
             RETURNING id, name, is_active, created_at",
        )
        .bind(name)
        .bind(is_active)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Created category {} ({})", category.id, category.name);
        Ok(category)
    }

    pub async fn update(
        &self,
        id: i64,
        name: Option<String>,
        is_active: Option<bool>,
    ) -> Result<Category, DatabaseError> {
        sqlx::query_as::<_, Category>(
            "UPDATE work_categories SET \
                 name = COALESCE($2, name), \
                 is_active = COALESCE($3, is_active) \
             WHERE id = $1 \
             RETURNING id, name, is_active, created_at",
        )
        .bind(id)
        .bind(name)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("Category {} not found", id)))
    }

    /// Delete a category that no work references.
    ///
    /// The category row is locked before counting, so a work inserted concurrently
    /// either lands before the count (and blocks the delete) or fails its foreign key.
    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<i64> =
            sqlx::query_scalar("SELECT id FROM work_categories WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(DatabaseError::NotFound(format!("Category {} not found", id)));
        }

        let in_use: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM works WHERE category_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if in_use > 0 {
            return Err(Self::in_use(id, in_use));
        }

        sqlx::query("DELETE FROM work_categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                let err = DatabaseError::from(e);
                if err.sqlstate().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
                    Self::in_use(id, 1)
                } else {
                    err
                }
            })?;

        tx.commit().await?;
        tracing::info!("Deleted category {}", id);
        Ok(())
    }

    fn in_use(id: i64, works: i64) -> DatabaseError {
        DatabaseError::Conflict(format!(
            "Category {} is used by {} work(s) and cannot be deleted",
            id, works
        ))
    }

    pub async fn count(&self) -> Result<i64, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM work_categories")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
