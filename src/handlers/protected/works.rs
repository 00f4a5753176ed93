// handlers/protected/works.rs - admin CRUD for portfolio works
//
// The admin listing sees inactive rows too and supports `search`. Delete is
// soft: the row stays with is_active = false and can be restored with
// PUT {isActive: true}.

use axum::{
    extract::{Path, Query},
    Extension,
};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::config::config;
use crate::database::models::{NewWork, Work, WorkPatch};
use crate::database::WorkRepository;
use crate::filter::{ListParams, Visibility};
use crate::handlers::{current_year, parse_id, pool};
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthAdmin};
use crate::types::Paginated;

/// GET /api/admin/works - every work, with `search` over title and description
pub async fn works_get(Query(params): Query<HashMap<String, String>>) -> ApiResult<Paginated<Work>> {
    let listing = &config().listing;
    let params = ListParams::new(&params);
    let pagination = params.pagination(listing.admin_page_size, listing.max_limit)?;
    let filter = params.admin_filter()?;

    let page = WorkRepository::new(pool()?)
        .list(filter, pagination, current_year())
        .await?;
    Ok(ApiResponse::success(page))
}

/// POST /api/admin/works - create a work
pub async fn works_post(
    Extension(admin): Extension<AuthAdmin>,
    ApiJson(body): ApiJson<NewWork>,
) -> ApiResult<Work> {
    let work = WorkRepository::new(pool()?).create(body.validate()?).await?;
    tracing::info!("Admin '{}' created work {}", admin.username, work.id);
    Ok(ApiResponse::created(work).with_message("Work created"))
}

/// GET /api/admin/works/:id - single work regardless of visibility; no view counted
pub async fn work_get(Path(id): Path<String>) -> ApiResult<Work> {
    let id = parse_id(&id, "id")?;
    let work = WorkRepository::new(pool()?).find(id, Visibility::All).await?;
    Ok(ApiResponse::success(work))
}

/// PUT /api/admin/works/:id - partial update
pub async fn work_put(
    Extension(admin): Extension<AuthAdmin>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<WorkPatch>,
) -> ApiResult<Work> {
    let id = parse_id(&id, "id")?;
    let work = WorkRepository::new(pool()?).update(id, body.validate()?).await?;
    tracing::info!("Admin '{}' updated work {}", admin.username, id);
    Ok(ApiResponse::success(work).with_message("Work updated"))
}

/// DELETE /api/admin/works/:id - soft delete; repeating it is harmless
pub async fn work_delete(
    Extension(admin): Extension<AuthAdmin>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&id, "id")?;
    WorkRepository::new(pool()?).soft_delete(id).await?;
    tracing::info!("Admin '{}' deactivated work {}", admin.username, id);
    Ok(ApiResponse::success(json!({ "id": id, "isActive": false })).with_message("Work deleted"))
}
