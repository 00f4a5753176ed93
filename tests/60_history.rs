mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn history_entry_lifecycle() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_available(server).await? {
        return Ok(());
    }
    let pool = common::seed_pool().await?;
    let token = common::admin_token(server, &pool).await?;
    let description = common::unique("Opened studio");

    let res = common::client()
        .post(server.url("/api/admin/history"))
        .bearer_auth(&token)
        .json(&json!({ "date": "1987.05", "description": description, "year": 2001 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<Value>().await?;
    let id = body["data"]["id"].as_i64().unwrap_or_default();
    assert_eq!(body["data"]["year"], 1987);

    let timeline = common::client()
        .get(server.url("/api/history"))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let group = timeline["data"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .find(|g| g["year"] == 1987)
        .expect("1987 group present");
    assert!(group["entries"]
        .as_array()
        .map(|es| es.iter().any(|e| e["id"] == id))
        .unwrap_or(false));

    let res = common::client()
        .put(server.url(&format!("/api/admin/history/{}", id)))
        .bearer_auth(&token)
        .json(&json!({ "date": "1988.01", "description": "Moved studio" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["year"], 1988);
    assert_eq!(body["data"]["description"], "Moved studio");

    let url = server.url(&format!("/api/admin/history/{}", id));
    let res = common::client().delete(&url).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let res = common::client().delete(&url).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn history_requires_a_year_in_the_date() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_available(server).await? {
        return Ok(());
    }
    let pool = common::seed_pool().await?;
    let token = common::admin_token(server, &pool).await?;

    for payload in [
        json!({ "description": "No date" }),
        json!({ "date": "spring", "description": "No digits" }),
        json!({ "date": "2020.01" }),
    ] {
        let res = common::client()
            .post(server.url("/api/admin/history"))
            .bearer_auth(&token)
            .json(&payload)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "payload {}", payload);
    }
    Ok(())
}
