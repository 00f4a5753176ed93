use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::database::manager::{DatabaseError, FOREIGN_KEY_VIOLATION};
use crate::database::models::work::{ValidatedWork, WorkChanges};
use crate::database::models::{Work, WorkNavItem, WorkNavigation, WorkRow};
use crate::database::query_builder::{fetch_all_as, fetch_count};
use crate::filter::filter::WORK_SELECT;
use crate::filter::{Filter, Pagination, Visibility, WorkFilter};
use crate::types::Paginated;

/// Aggregates shown on the admin dashboard.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct WorkStats {
    pub total: i64,
    pub active: i64,
    pub total_views: i64,
}

pub struct WorkRepository {
    pool: PgPool,
}

impl WorkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One page of works plus the total matching count.
    pub async fn list(
        &self,
        filter: WorkFilter,
        pagination: Pagination,
        current_year: i32,
    ) -> Result<Paginated<Work>, DatabaseError> {
        let listing = Filter::works(filter, current_year).paginate(pagination);
        let sql = listing
            .to_sql()
            .map_err(|e| DatabaseError::QueryError(e.to_string()))?;

        let rows: Vec<WorkRow> = fetch_all_as(&self.pool, &sql).await?;
        let total = fetch_count(&self.pool, &listing.to_count_sql()).await?;

        let items = rows.into_iter().map(Work::from).collect();
        Ok(Paginated::new(items, total, pagination.page, pagination.limit))
    }

    /// Newest active works in listing order.
    pub async fn recents(&self, limit: i64, current_year: i32) -> Result<Vec<Work>, DatabaseError> {
        let page = self
            .list(WorkFilter::public(), Pagination::new(1, limit), current_year)
            .await?;
        Ok(page.items)
    }

    pub async fn find(&self, id: i64, visibility: Visibility) -> Result<Work, DatabaseError> {
        let active_only = visibility == Visibility::ActiveOnly;
        let row: Option<WorkRow> = sqlx::query_as(&format!(
            "SELECT {} FROM works w LEFT JOIN work_categories c ON c.id = w.category_id \
             WHERE w.id = $1 AND (w.is_active = TRUE OR NOT $2)",
            WORK_SELECT
        ))
        .bind(id)
        .bind(active_only)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Work::from)
            .ok_or_else(|| DatabaseError::NotFound(format!("Work {} not found", id)))
    }

    /// Public detail read: bumps `view_count` and returns the row in one statement,
    /// so the returned count already includes this view.
    pub async fn view(&self, id: i64) -> Result<Work, DatabaseError> {
        let row: Option<WorkRow> = sqlx::query_as(&format!(
            "WITH w AS ( \
                 UPDATE works SET view_count = view_count + 1 \
                 WHERE id = $1 AND is_active = TRUE \
                 RETURNING * \
             ) \
             SELECT {} FROM w LEFT JOIN work_categories c ON c.id = w.category_id",
            WORK_SELECT
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Work::from)
            .ok_or_else(|| DatabaseError::NotFound(format!("Work {} not found", id)))
    }

    /// Closest active neighbours by id.
    pub async fn navigation(&self, id: i64) -> Result<WorkNavigation, DatabaseError> {
        let prev: Option<WorkNavItem> = sqlx::query_as(
            "SELECT id, title, thumbnail_image FROM works \
             WHERE is_active = TRUE AND id < $1 ORDER BY id DESC LIMIT 1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let next: Option<WorkNavItem> = sqlx::query_as(
            "SELECT id, title, thumbnail_image FROM works \
             WHERE is_active = TRUE AND id > $1 ORDER BY id ASC LIMIT 1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(WorkNavigation { prev, next })
    }

    pub async fn create(&self, work: ValidatedWork) -> Result<Work, DatabaseError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO works \
                 (title, category_id, description, event_date, thumbnail_image, content_images, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id",
        )
        .bind(&work.title)
        .bind(work.category_id)
        .bind(&work.description)
        .bind(work.event_date)
        .bind(&work.thumbnail_image)
        .bind(crate::database::models::work::encode_content_images(&work.content_images))
        .bind(work.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Self::map_category_reference(e, work.category_id))?;

        tracing::info!("Created work {} ({})", id, work.title);
        self.find(id, Visibility::All).await
    }

    /// Partial update. `None` fields keep their stored value; `description` and
    /// `thumbnail_image` are written whenever present, so `Some(None)` clears them.
    pub async fn update(&self, id: i64, changes: WorkChanges) -> Result<Work, DatabaseError> {
        let category_id = changes.category_id;
        let set_description = changes.description.is_some();
        let set_thumbnail = changes.thumbnail_image.is_some();
        let updated: Option<i64> = sqlx::query_scalar(
            "UPDATE works SET \
                 title = COALESCE($2, title), \
                 category_id = COALESCE($3, category_id), \
                 description = CASE WHEN $9 THEN $4 ELSE description END, \
                 event_date = COALESCE($5, event_date), \
                 thumbnail_image = CASE WHEN $10 THEN $6 ELSE thumbnail_image END, \
                 content_images = COALESCE($7, content_images), \
                 is_active = COALESCE($8, is_active), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING id",
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.category_id)
        .bind(changes.description.flatten())
        .bind(changes.event_date)
        .bind(changes.thumbnail_image.flatten())
        .bind(changes.content_images)
        .bind(changes.is_active)
        .bind(set_description)
        .bind(set_thumbnail)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::map_category_reference(e, category_id.unwrap_or_default()))?;

        match updated {
            Some(id) => self.find(id, Visibility::All).await,
            None => Err(DatabaseError::NotFound(format!("Work {} not found", id))),
        }
    }

    /// Soft delete. Repeating it on an already inactive work succeeds and keeps
    /// the original deactivation time in `updated_at`.
    pub async fn soft_delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE works SET \
                 updated_at = CASE WHEN is_active THEN NOW() ELSE updated_at END, \
                 is_active = FALSE \
             WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Work {} not found", id)));
        }
        Ok(())
    }

    /// Inactive works deactivated before `cutoff`.
    pub async fn count_inactive_before(&self, cutoff: DateTime<Utc>) -> Result<i64, DatabaseError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM works WHERE is_active = FALSE AND updated_at < $1",
        )
        .bind(cutoff)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Hard-delete inactive works deactivated before `cutoff`.
    pub async fn purge_inactive_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM works WHERE is_active = FALSE AND updated_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn stats(&self) -> Result<WorkStats, DatabaseError> {
        let stats: WorkStats = sqlx::query_as(
            "SELECT COUNT(*) AS total, \
                    COUNT(*) FILTER (WHERE is_active) AS active, \
                    COALESCE(SUM(view_count), 0)::bigint AS total_views \
             FROM works",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }

    fn map_category_reference(err: sqlx::Error, category_id: i64) -> DatabaseError {
        let err = DatabaseError::from(err);
        if err.sqlstate().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
            DatabaseError::InvalidReference(format!("Category {} does not exist", category_id))
        } else {
            err
        }
    }
}
