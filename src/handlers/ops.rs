// handlers/ops.rs - service info and health probe

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::DatabaseManager;

/// GET / - service name, version and the top-level route map
pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Studio API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Portfolio and admin backend for the studio website",
            "endpoints": {
                "public": ["/api/works", "/api/works/recents", "/api/works/:id", "/api/categories", "/api/history"],
                "auth": ["/api/admin/auth/login", "/api/admin/auth/logout", "/api/admin/auth/session"],
                "admin": ["/api/admin/works", "/api/admin/categories", "/api/admin/history", "/api/admin/upload", "/api/admin/dashboard", "/api/admin/login-logs"],
                "pages": ["/admin", "/admin/login"]
            }
        }
    }))
}

/// GET /health - 200 when the database answers, 503 otherwise
pub async fn health() -> impl IntoResponse {
    match DatabaseManager::health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": { "status": "ok", "database": "ok" } })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            let detail = if crate::is_production!() {
                Value::Null
            } else {
                Value::String(e.to_string())
            };
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "Database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "detail": detail
                })),
            )
        }
    }
}

/// Fallback for unmatched routes, in the error envelope
pub async fn not_found(uri: axum::http::Uri) -> crate::error::ApiError {
    crate::error::ApiError::not_found(format!("No route for {}", uri.path()))
}
