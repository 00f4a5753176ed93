// handlers/protected/dashboard.rs - admin overview and login audit trail

use axum::extract::Query;
use chrono::{Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::config::config;
use crate::database::models::{LoginLog, LoginStatus};
use crate::database::{CategoryRepository, LoginLogRepository, WorkRepository};
use crate::filter::ListParams;
use crate::handlers::pool;
use crate::middleware::{ApiResponse, ApiResult};
use crate::types::Paginated;

/// Window for the "recent logins" figure.
const RECENT_LOGIN_DAYS: i64 = 7;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_works: i64,
    pub active_works: i64,
    pub total_categories: i64,
    pub total_views: i64,
    pub recent_logins: i64,
}

/// GET /api/admin/dashboard - headline counts
pub async fn dashboard_get() -> ApiResult<DashboardStats> {
    let pool = pool()?;
    let works = WorkRepository::new(pool.clone()).stats().await?;
    let total_categories = CategoryRepository::new(pool.clone()).count().await?;
    let recent_logins = LoginLogRepository::new(pool)
        .count_since(LoginStatus::Success, Utc::now() - Duration::days(RECENT_LOGIN_DAYS))
        .await?;

    Ok(ApiResponse::success(DashboardStats {
        total_works: works.total,
        active_works: works.active,
        total_categories,
        total_views: works.total_views,
        recent_logins,
    }))
}

/// GET /api/admin/login-logs - newest attempts first
pub async fn login_logs_get(Query(params): Query<HashMap<String, String>>) -> ApiResult<Paginated<LoginLog>> {
    let listing = &config().listing;
    let pagination = ListParams::new(&params).pagination(listing.admin_page_size, listing.max_limit)?;
    let logs = LoginLogRepository::new(pool()?).list(pagination).await?;
    Ok(ApiResponse::success(logs))
}
