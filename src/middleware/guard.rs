//! Page guard for the server-rendered admin area.
//!
//! Runs on every request before routing. Paths outside `/admin` are untouched.
//! Inside it, a missing or invalid `admin_token` cookie sends the browser to the
//! login page with the original target in `redirect`, and a valid cookie on the
//! login page sends it on to the dashboard.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::auth::{AuthAdmin, SessionGuard};
use crate::auth::cookie::{cookie_token, removal_cookie};
use crate::auth::{Claims, TokenService};

pub const ADMIN_PREFIX: &str = "/admin";
pub const LOGIN_PATH: &str = "/admin/login";
pub const DASHBOARD_PATH: &str = "/admin/dashboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Not an admin page.
    Bypass,
    /// Serve the page; carries the verified claims when there are any.
    PassThrough(Option<Claims>),
    RedirectToDashboard,
    RedirectToLogin { redirect: String, clear_cookie: bool },
}

pub fn is_protected(path: &str) -> bool {
    path == ADMIN_PREFIX || path.starts_with("/admin/")
}

fn is_login_page(path: &str) -> bool {
    path == LOGIN_PATH || path.starts_with("/admin/login/")
}

/// Pure routing decision for one request.
pub fn decide(path: &str, query: Option<&str>, token: Option<&str>, tokens: &TokenService) -> GuardDecision {
    if !is_protected(path) {
        return GuardDecision::Bypass;
    }

    let verified = token.map(|t| tokens.verify(t));

    if is_login_page(path) {
        return match verified {
            Some(Ok(_)) => GuardDecision::RedirectToDashboard,
            _ => GuardDecision::PassThrough(None),
        };
    }

    match verified {
        Some(Ok(claims)) => GuardDecision::PassThrough(Some(claims)),
        Some(Err(e)) => {
            tracing::debug!("Invalid admin cookie on {}: {}", path, e);
            GuardDecision::RedirectToLogin {
                redirect: original_target(path, query),
                clear_cookie: true,
            }
        }
        None => GuardDecision::RedirectToLogin {
            redirect: original_target(path, query),
            clear_cookie: false,
        },
    }
}

fn original_target(path: &str, query: Option<&str>) -> String {
    match query.filter(|q| !q.is_empty()) {
        Some(q) => format!("{}?{}", path, q),
        None => path.to_string(),
    }
}

/// Login URL that returns to `redirect` after signing in.
pub fn login_location(redirect: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(redirect.as_bytes()).collect();
    format!("{}?redirect={}", LOGIN_PATH, encoded)
}

pub async fn admin_page_guard(State(guard): State<SessionGuard>, mut request: Request, next: Next) -> Response {
    let token = cookie_token(request.headers());
    let decision = decide(
        request.uri().path(),
        request.uri().query(),
        token.as_deref(),
        &guard.tokens,
    );

    match decision {
        GuardDecision::Bypass => next.run(request).await,
        GuardDecision::PassThrough(claims) => {
            if let Some(claims) = claims {
                request.extensions_mut().insert(AuthAdmin::from(claims));
            }
            next.run(request).await
        }
        GuardDecision::RedirectToDashboard => Redirect::temporary(DASHBOARD_PATH).into_response(),
        GuardDecision::RedirectToLogin { redirect, clear_cookie } => {
            let mut response = Redirect::temporary(&login_location(&redirect)).into_response();
            if clear_cookie {
                if let Ok(value) = HeaderValue::from_str(&removal_cookie(guard.cookie_secure).to_string()) {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
            }
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AdminIdentity;
    use axum::{
        body::Body,
        http::StatusCode,
        middleware,
        routing::get,
        Router,
    };
    use chrono::Duration;
    use tower::ServiceExt;

    fn tokens() -> TokenService {
        TokenService::new("test-secret", Duration::hours(1))
    }

    fn identity() -> AdminIdentity {
        AdminIdentity {
            id: 3,
            username: "curator".to_string(),
            name: "Curator".to_string(),
        }
    }

    #[test]
    fn unprotected_paths_bypass() {
        assert_eq!(decide("/api/works", None, None, &tokens()), GuardDecision::Bypass);
        assert_eq!(decide("/administrator", None, None, &tokens()), GuardDecision::Bypass);
    }

    #[test]
    fn missing_cookie_redirects_with_original_target() {
        assert_eq!(
            decide("/admin/works", Some("page=2"), None, &tokens()),
            GuardDecision::RedirectToLogin {
                redirect: "/admin/works?page=2".to_string(),
                clear_cookie: false,
            }
        );
    }

    #[test]
    fn invalid_cookie_redirects_and_clears() {
        assert_eq!(
            decide("/admin", None, Some("garbage"), &tokens()),
            GuardDecision::RedirectToLogin {
                redirect: "/admin".to_string(),
                clear_cookie: true,
            }
        );
    }

    #[test]
    fn expired_cookie_is_invalid() {
        let service = tokens();
        let expired = service.issue_with_ttl(&identity(), Duration::seconds(-5)).unwrap();
        assert!(matches!(
            decide("/admin/dashboard", None, Some(&expired), &service),
            GuardDecision::RedirectToLogin { clear_cookie: true, .. }
        ));
    }

    #[test]
    fn login_page_with_valid_cookie_goes_to_dashboard() {
        let service = tokens();
        let token = service.issue(&identity()).unwrap();
        assert_eq!(decide(LOGIN_PATH, None, Some(&token), &service), GuardDecision::RedirectToDashboard);
        assert_eq!(decide(LOGIN_PATH, None, Some("stale"), &service), GuardDecision::PassThrough(None));
        assert_eq!(decide(LOGIN_PATH, None, None, &service), GuardDecision::PassThrough(None));
    }

    #[test]
    fn valid_cookie_passes_with_claims() {
        let service = tokens();
        let token = service.issue(&identity()).unwrap();
        match decide("/admin/works/7", None, Some(&token), &service) {
            GuardDecision::PassThrough(Some(claims)) => assert_eq!(claims.username, "curator"),
            other => panic!("unexpected decision: {:?}", other),
        }
    }

    #[test]
    fn login_location_encodes_redirect() {
        assert_eq!(
            login_location("/admin/works?page=2"),
            "/admin/login?redirect=%2Fadmin%2Fworks%3Fpage%3D2"
        );
    }

    fn app(guard: SessionGuard) -> Router {
        Router::new()
            .route("/admin/*rest", get(|| async { "admin page" }))
            .route("/", get(|| async { "home" }))
            .layer(middleware::from_fn_with_state(guard, admin_page_guard))
    }

    #[tokio::test]
    async fn redirect_response_clears_invalid_cookie() {
        let guard = SessionGuard::new(tokens(), true);
        let response = app(guard)
            .oneshot(
                Request::builder()
                    .uri("/admin/works")
                    .header(header::COOKIE, "admin_token=forged")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/admin/login?redirect=%2Fadmin%2Fworks"
        );
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.starts_with("admin_token="));
        assert!(set_cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn public_routes_are_untouched() {
        let response = app(SessionGuard::new(tokens(), false))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
