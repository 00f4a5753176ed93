// handlers/protected/history.rs - admin CRUD for timeline entries

use axum::extract::Path;
use serde_json::{json, Value};

use crate::database::models::{HistoryEntry, HistoryInput};
use crate::database::HistoryRepository;
use crate::handlers::{parse_id, pool};
use crate::middleware::{ApiJson, ApiResponse, ApiResult};

/// GET /api/admin/history - flat list in timeline order
pub async fn history_get() -> ApiResult<Vec<HistoryEntry>> {
    let entries = HistoryRepository::new(pool()?).list().await?;
    Ok(ApiResponse::success(entries))
}

/// POST /api/admin/history - `year` is derived from `date`
pub async fn history_post(ApiJson(body): ApiJson<HistoryInput>) -> ApiResult<HistoryEntry> {
    let entry = HistoryRepository::new(pool()?).create(body.validate()?).await?;
    Ok(ApiResponse::created(entry).with_message("History entry created"))
}

/// PUT /api/admin/history/:id - replaces date and description
pub async fn history_put(Path(id): Path<String>, ApiJson(body): ApiJson<HistoryInput>) -> ApiResult<HistoryEntry> {
    let id = parse_id(&id, "id")?;
    let entry = HistoryRepository::new(pool()?).update(id, body.validate()?).await?;
    Ok(ApiResponse::success(entry).with_message("History entry updated"))
}

/// DELETE /api/admin/history/:id
pub async fn history_delete(Path(id): Path<String>) -> ApiResult<Value> {
    let id = parse_id(&id, "id")?;
    HistoryRepository::new(pool()?).delete(id).await?;
    Ok(ApiResponse::success(json!({ "id": id })).with_message("History entry deleted"))
}
