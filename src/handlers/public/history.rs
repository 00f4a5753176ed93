// handlers/public/history.rs - company timeline

use crate::database::models::history::group_by_year;
use crate::database::models::HistoryYear;
use crate::database::HistoryRepository;
use crate::handlers::pool;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/history - entries grouped by year, newest year first
pub async fn history_get() -> ApiResult<Vec<HistoryYear>> {
    let entries = HistoryRepository::new(pool()?).list().await?;
    Ok(ApiResponse::success(group_by_year(entries)))
}
