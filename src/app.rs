//! Router assembly.
//!
//! Route groups are built separately and merged, then the global layers are
//! applied outermost-last: page guard, request id propagation, request
//! logging, request id generation, tracing, body limit, CORS.

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::path::Path;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::{config, AppConfig, UploadBackend};
use crate::handlers::{ops, protected, public};
use crate::middleware::logging::{log_request, propagate_request_id_layer, request_id_layer};
use crate::middleware::{admin_page_guard, require_admin_session, SessionGuard};

/// Room for multipart boundaries and headers on top of the file ceiling.
const MULTIPART_HEADROOM: usize = 64 * 1024;

pub fn app() -> Router {
    let config = config();
    let guard = SessionGuard::from_config();

    let mut router = Router::new()
        .route("/", get(ops::root))
        .route("/health", get(ops::health))
        .merge(public_api_routes())
        .merge(admin_api_routes(config).route_layer(middleware::from_fn_with_state(
            guard.clone(),
            require_admin_session,
        )))
        .merge(admin_page_routes(config));

    if let Some(base) = local_upload_mount(config) {
        router = router.nest_service(&base, ServeDir::new(&config.upload.local_dir));
    }

    let mut router = router
        .fallback(ops::not_found)
        .layer(middleware::from_fn_with_state(guard, admin_page_guard))
        .layer(propagate_request_id_layer());
    if config.api.enable_request_logging {
        router = router.layer(middleware::from_fn(log_request));
    }

    router
        .layer(request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(configure_cors(config))
}

fn public_api_routes() -> Router {
    Router::new()
        .route("/api/works", get(public::works_get))
        .route("/api/works/recents", get(public::works_recents_get))
        .route("/api/works/:id", get(public::work_get))
        .route("/api/categories", get(public::categories_get))
        .route("/api/history", get(public::history_get))
        .route("/api/admin/auth/login", post(public::login_post))
        .route("/api/admin/auth/logout", post(public::logout_post))
}

/// Everything here sits behind the API session guard.
fn admin_api_routes(config: &AppConfig) -> Router {
    let upload = &config.upload;

    Router::new()
        .route("/api/admin/auth/session", get(protected::session_get))
        .route("/api/admin/dashboard", get(protected::dashboard_get))
        .route("/api/admin/login-logs", get(protected::login_logs_get))
        .route(
            "/api/admin/works",
            get(protected::works_get).post(protected::works_post),
        )
        .route(
            "/api/admin/works/:id",
            get(protected::work_get)
                .put(protected::work_put)
                .delete(protected::work_delete),
        )
        .route(
            "/api/admin/categories",
            get(protected::categories_get).post(protected::categories_post),
        )
        .route(
            "/api/admin/categories/:id",
            axum::routing::put(protected::category_put).delete(protected::category_delete),
        )
        .route(
            "/api/admin/history",
            get(protected::history_get).post(protected::history_post),
        )
        .route(
            "/api/admin/history/:id",
            axum::routing::put(protected::history_put).delete(protected::history_delete),
        )
        .merge(
            Router::new()
                .route("/api/admin/upload/thumbnail", post(protected::upload_thumbnail_post))
                .layer(DefaultBodyLimit::max(upload.thumbnail_max_bytes + MULTIPART_HEADROOM)),
        )
        .merge(
            Router::new()
                .route("/api/admin/upload/content", post(protected::upload_content_post))
                .layer(DefaultBodyLimit::max(upload.content_max_bytes + MULTIPART_HEADROOM)),
        )
}

/// Built admin UI when present on disk, the built-in shell otherwise.
fn admin_page_routes(config: &AppConfig) -> Router {
    let dir = Path::new(&config.server.admin_ui_dir);
    if dir.is_dir() {
        tracing::info!("Serving admin UI from {}", dir.display());
        let index = ServeFile::new(dir.join("index.html"));
        Router::new().nest_service("/admin", ServeDir::new(dir).fallback(index))
    } else {
        tracing::debug!("No admin UI at {}, using built-in shell", dir.display());
        Router::new()
            .route("/admin", get(public::admin_shell))
            .route("/admin/*path", get(public::admin_shell))
    }
}

/// Mount point for locally stored uploads, if they are served by this process.
fn local_upload_mount(config: &AppConfig) -> Option<String> {
    if config.upload.backend != UploadBackend::Local {
        return None;
    }
    let base = config.upload.public_base_url.trim_end_matches('/');
    (base.starts_with('/') && base.len() > 1).then(|| base.to_string())
}

fn configure_cors(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{get, post_json, send, session_token};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;

    #[test]
    fn uploads_mount_only_for_local_backend() {
        let mut config = AppConfig::development();
        assert_eq!(local_upload_mount(&config).as_deref(), Some("/uploads"));

        config.upload.public_base_url = "/media/".to_string();
        assert_eq!(local_upload_mount(&config).as_deref(), Some("/media"));

        config.upload.public_base_url = "https://cdn.example.com".to_string();
        assert_eq!(local_upload_mount(&config), None);

        config.upload.public_base_url = "/uploads".to_string();
        config.upload.backend = UploadBackend::Remote;
        assert_eq!(local_upload_mount(&config), None);
    }

    #[tokio::test]
    async fn root_describes_service() {
        let response = send(app(), get("/")).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["success"], true);
        assert_eq!(response.body["data"]["name"], "Studio API");
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let response = send(app(), get("/api/nope")).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body["success"], false);
        assert_eq!(response.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn admin_api_requires_session() {
        let response = send(app(), get("/api/admin/works")).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body["success"], false);
    }

    #[tokio::test]
    async fn session_endpoint_reports_token_owner() {
        let request = Request::builder()
            .uri("/api/admin/auth/session")
            .header("authorization", format!("Bearer {}", session_token()))
            .body(Body::empty())
            .unwrap();
        let response = send(app(), request).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["data"]["admin"]["username"], "curator");
        assert!(response.body["data"]["expiresAt"].is_string());
    }

    #[tokio::test]
    async fn admin_pages_redirect_to_login() {
        let response = send(app(), get("/admin/works?page=2")).await;
        assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers["location"],
            "/admin/login?redirect=%2Fadmin%2Fworks%3Fpage%3D2"
        );
    }

    #[tokio::test]
    async fn login_requires_both_fields() {
        let response = send(app(), post_json("/api/admin/auth/login", &json!({ "username": "curator" }))).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["success"], false);
    }

    #[tokio::test]
    async fn logout_clears_cookie() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/admin/auth/logout")
            .body(Body::empty())
            .unwrap();
        let response = send(app(), request).await;
        assert_eq!(response.status, StatusCode::OK);
        let cookie = response.headers["set-cookie"].to_str().unwrap();
        assert!(cookie.starts_with("admin_token="));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn malformed_work_id_is_400() {
        let response = send(app(), get("/api/works/abc")).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["success"], false);
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let response = send(app(), get("/")).await;
        assert!(response.headers.contains_key("x-request-id"));
    }
}
