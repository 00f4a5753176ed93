mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn referenced_category_cannot_be_deleted() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_available(server).await? {
        return Ok(());
    }
    let pool = common::seed_pool().await?;
    let token = common::admin_token(server, &pool).await?;
    let category = common::create_category(server, &token).await?;
    let work = common::create_work(server, &token, category, "2020-05-05").await?;

    // A soft-deleted work still references its category
    common::client()
        .delete(server.url(&format!("/api/admin/works/{}", work)))
        .bearer_auth(&token)
        .send()
        .await?;

    let res = common::client()
        .delete(server.url(&format!("/api/admin/categories/{}", category)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "CONFLICT");

    let res = common::client()
        .get(server.url("/api/admin/categories"))
        .bearer_auth(&token)
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    let listed = body["data"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .find(|c| c["id"] == category)
        .expect("category still present");
    assert_eq!(listed["workCount"], 1);
    Ok(())
}

#[tokio::test]
async fn unused_category_lifecycle() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_available(server).await? {
        return Ok(());
    }
    let pool = common::seed_pool().await?;
    let token = common::admin_token(server, &pool).await?;
    let category = common::create_category(server, &token).await?;

    let res = common::client()
        .put(server.url(&format!("/api/admin/categories/{}", category)))
        .bearer_auth(&token)
        .json(&json!({ "name": "  Motion  ", "isActive": false }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["name"], "Motion");
    assert_eq!(body["data"]["isActive"], false);

    // Inactive categories drop out of the public tabs
    let body = common::client()
        .get(server.url("/api/categories"))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let public_ids: Vec<i64> = body["data"]
        .as_array()
        .map(|cs| cs.iter().filter_map(|c| c["id"].as_i64()).collect())
        .unwrap_or_default();
    assert!(!public_ids.contains(&category));

    let url = server.url(&format!("/api/admin/categories/{}", category));
    let res = common::client().delete(&url).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let res = common::client().delete(&url).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn blank_category_name_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_available(server).await? {
        return Ok(());
    }
    let pool = common::seed_pool().await?;
    let token = common::admin_token(server, &pool).await?;

    let res = common::client()
        .post(server.url("/api/admin/categories"))
        .bearer_auth(&token)
        .json(&json!({ "name": "   " }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert!(body["fieldErrors"]["name"].is_string());
    Ok(())
}
