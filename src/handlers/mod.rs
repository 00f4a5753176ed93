// handlers/mod.rs - HTTP handler tree
//
// public/     - visitor-facing portfolio API, admin login/logout, admin shell pages
// protected/  - admin JSON API, mounted behind require_admin_session
// ops.rs      - service info and health probe
//
// Handlers stay thin: parse the request, call a repository or service, wrap the
// result in ApiResponse. Every failure flows through ApiError.

use chrono::Datelike;
use sqlx::PgPool;

use crate::database::DatabaseManager;
use crate::error::ApiError;

pub mod ops;
pub mod protected;
pub mod public;

/// Shared pool handle for building repositories.
pub(crate) fn pool() -> Result<PgPool, ApiError> {
    Ok(DatabaseManager::pool()?.clone())
}

/// Calendar year used by the `year=recent|previous` filters.
pub(crate) fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Numeric path id; anything else is a 400 in the error envelope rather than
/// axum's plain-text path rejection.
pub(crate) fn parse_id(raw: &str, field: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::invalid_field(field, format!("Invalid {}: {}", field, raw)))
}
