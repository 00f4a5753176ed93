mod common;

use anyhow::Result;
use reqwest::{header, StatusCode};
use serde_json::json;

async fn failed_attempts(pool: &sqlx::PgPool, admin_id: i64) -> Result<i64> {
    let count = sqlx::query_scalar(
        "SELECT COUNT(*) FROM admin_login_logs WHERE admin_id = $1 AND status = 'failed'",
    )
    .bind(admin_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

#[tokio::test]
async fn login_rejects_missing_fields() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = common::client()
        .post(server.url("/api/admin/auth/login"))
        .json(&json!({ "username": "someone" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = common::client()
        .post(server.url("/api/admin/auth/login"))
        .header(header::CONTENT_TYPE, "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], false);
    Ok(())
}

#[tokio::test]
async fn successful_login_sets_cookie_and_returns_token() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_available(server).await? {
        return Ok(());
    }
    let pool = common::seed_pool().await?;
    let (admin_id, username) = common::seed_admin(&pool, "s3cret-pass").await?;

    let res = common::client()
        .post(server.url("/api/admin/auth/login"))
        .json(&json!({ "username": username, "password": "s3cret-pass" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let cookie = res.headers()[header::SET_COOKIE].to_str()?.to_string();
    assert!(cookie.starts_with("admin_token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["admin"]["id"], admin_id);
    assert_eq!(body["admin"]["username"], username.as_str());
    let token = body["token"].as_str().unwrap_or_default().to_string();

    let claims = studio_api::auth::TokenService::new(common::TEST_JWT_SECRET, chrono::Duration::hours(1))
        .verify(&token)?;
    assert_eq!(claims.id, admin_id);
    assert_eq!(claims.username, username);

    let login_count: i64 = sqlx::query_scalar("SELECT login_count FROM admins WHERE id = $1")
        .bind(admin_id)
        .fetch_one(&pool)
        .await?;
    assert_eq!(login_count, 1);
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_401_with_one_failed_log_row() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_available(server).await? {
        return Ok(());
    }
    let pool = common::seed_pool().await?;
    let (admin_id, username) = common::seed_admin(&pool, "right-password").await?;
    let before = failed_attempts(&pool, admin_id).await?;

    let res = common::client()
        .post(server.url("/api/admin/auth/login"))
        .json(&json!({ "username": username, "password": "wrong-password" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().get(header::SET_COOKIE).is_none());
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());

    assert_eq!(failed_attempts(&pool, admin_id).await?, before + 1);
    Ok(())
}

#[tokio::test]
async fn deactivated_admin_cannot_log_in() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_available(server).await? {
        return Ok(());
    }
    let pool = common::seed_pool().await?;
    let (_, username) = common::seed_admin(&pool, "pass-word").await?;
    studio_api::database::AdminRepository::new(pool.clone())
        .set_active(&username, false)
        .await?;

    let res = common::client()
        .post(server.url("/api/admin/auth/login"))
        .json(&json!({ "username": username, "password": "pass-word" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn login_logs_and_dashboard_reflect_activity() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_available(server).await? {
        return Ok(());
    }
    let pool = common::seed_pool().await?;
    let token = common::admin_token(server, &pool).await?;

    let res = common::client()
        .get(server.url("/api/admin/dashboard"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body["data"]["recentLogins"].as_i64().unwrap_or_default() >= 1);
    assert!(body["data"]["totalWorks"].is_i64());

    let res = common::client()
        .get(server.url("/api/admin/login-logs?limit=5"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["currentPage"], 1);
    let items = body["data"]["items"].as_array().cloned().unwrap_or_default();
    assert!(!items.is_empty() && items.len() <= 5);
    Ok(())
}
