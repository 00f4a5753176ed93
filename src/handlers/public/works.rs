// handlers/public/works.rs - visitor-facing portfolio listing and detail

use axum::extract::{Path, Query};
use std::collections::HashMap;

use crate::config::config;
use crate::database::models::{Work, WorkDetail};
use crate::database::WorkRepository;
use crate::filter::ListParams;
use crate::handlers::{current_year, parse_id, pool};
use crate::middleware::{ApiResponse, ApiResult};
use crate::types::Paginated;

/// GET /api/works - active works, newest first
///
/// Query: `page`, `limit`, `categoryId` (`all` = every category), `year`
/// (`recent` | `previous`).
pub async fn works_get(Query(params): Query<HashMap<String, String>>) -> ApiResult<Paginated<Work>> {
    let listing = &config().listing;
    let params = ListParams::new(&params);
    let pagination = params.pagination(listing.public_page_size, listing.max_limit)?;
    let filter = params.public_filter()?;

    let page = WorkRepository::new(pool()?)
        .list(filter, pagination, current_year())
        .await?;
    Ok(ApiResponse::success(page))
}

/// GET /api/works/recents - newest active works for the home page
pub async fn works_recents_get(Query(params): Query<HashMap<String, String>>) -> ApiResult<Vec<Work>> {
    let listing = &config().listing;
    let limit = ListParams::new(&params).limit(listing.recents_size, listing.max_limit)?;

    let works = WorkRepository::new(pool()?)
        .recents(limit, current_year())
        .await?;
    Ok(ApiResponse::success(works))
}

/// GET /api/works/:id - detail view; counts as one view
pub async fn work_get(Path(id): Path<String>) -> ApiResult<WorkDetail> {
    let id = parse_id(&id, "id")?;
    let repo = WorkRepository::new(pool()?);

    let work = repo.view(id).await?;
    let navigation = repo.navigation(id).await?;
    Ok(ApiResponse::success(WorkDetail { work, navigation }))
}
