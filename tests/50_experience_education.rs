mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{TestServer, AUTH_HEADER};

async fn with_profile() -> Result<(TestServer, String)> {
    let server = common::spawn_app().await?;
    let token = server.register("Ada", "ada@example.com", "engine42").await?;
    server.save_profile(&token, json!({ "status": "Developer", "skills": "rust" })).await?;
    Ok((server, token))
}

async fn put(server: &TestServer, token: &str, path: &str, body: Value) -> Result<reqwest::Response> {
    Ok(server
        .client
        .put(server.url(path))
        .header(AUTH_HEADER, token)
        .json(&body)
        .send()
        .await?)
}

async fn delete(server: &TestServer, token: &str, path: &str) -> Result<reqwest::Response> {
    Ok(server
        .client
        .delete(server.url(path))
        .header(AUTH_HEADER, token)
        .send()
        .await?)
}

#[tokio::test]
async fn newest_experience_comes_first() -> Result<()> {
    let (server, token) = with_profile().await?;

    let first = json!({ "title": "Intern", "company": "Acme", "from": "2019-06-01", "to": "2019-09-01" });
    let second = json!({ "title": "Engineer", "company": "Acme", "from": "2020-01-01", "current": true });

    let res = put(&server, &token, "/api/profile/experience", first).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let res = put(&server, &token, "/api/profile/experience", second).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let profile = res.json::<Value>().await?;
    let titles: Vec<_> = profile["experience"]
        .as_array()
        .map(|items| items.iter().map(|e| e["title"].clone()).collect())
        .unwrap_or_default();
    assert_eq!(titles, vec![json!("Engineer"), json!("Intern")]);
    assert_eq!(profile["experience"][0]["current"], true);
    assert!(profile["experience"][0].get("to").is_none());
    Ok(())
}

#[tokio::test]
async fn remove_experience_by_id() -> Result<()> {
    let (server, token) = with_profile().await?;

    let body = json!({ "title": "Engineer", "company": "Acme", "from": "2020-01-01" });
    let profile = put(&server, &token, "/api/profile/experience", body.clone()).await?.json::<Value>().await?;
    let keep = put(&server, &token, "/api/profile/experience", body).await?.json::<Value>().await?;
    let target = profile["experience"][0]["id"].as_str().unwrap_or_default().to_string();

    let res = delete(&server, &token, &format!("/api/profile/experience/{}", target)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let after = res.json::<Value>().await?;

    let remaining = after["experience"].as_array().cloned().unwrap_or_default();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["id"], keep["experience"][0]["id"]);
    Ok(())
}

#[tokio::test]
async fn unknown_item_id_leaves_list_alone() -> Result<()> {
    let (server, token) = with_profile().await?;
    let body = json!({ "title": "Engineer", "company": "Acme", "from": "2020-01-01" });
    put(&server, &token, "/api/profile/experience", body).await?;

    for id in ["00000000-0000-0000-0000-000000000000", "garbage"] {
        let res = delete(&server, &token, &format!("/api/profile/experience/{}", id)).await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(res.json::<Value>().await?, json!({ "msg": "Experience not found" }));
    }

    let res = delete(&server, &token, "/api/profile/education/garbage").await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?, json!({ "msg": "Education not found" }));

    let me = server
        .client
        .get(server.url("/api/profile/me"))
        .header(AUTH_HEADER, &token)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(me["experience"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn experience_requires_fields() -> Result<()> {
    let (server, token) = with_profile().await?;

    let res = put(&server, &token, "/api/profile/experience", json!({ "from": "yesterday" })).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<Value>().await?;
    let params: Vec<_> = body["errors"]
        .as_array()
        .map(|errors| errors.iter().map(|e| e["param"].clone()).collect())
        .unwrap_or_default();
    assert_eq!(params, vec![json!("title"), json!("company"), json!("from")]);
    Ok(())
}

#[tokio::test]
async fn education_round_trip() -> Result<()> {
    let (server, token) = with_profile().await?;

    let res = put(
        &server,
        &token,
        "/api/profile/education",
        json!({
            "school": "University of London",
            "degree": "BSc",
            "fieldofstudy": "Mathematics",
            "from": "1833-01-01T00:00:00Z"
        }),
    )
    .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let profile = res.json::<Value>().await?;
    assert_eq!(profile["education"][0]["from"], "1833-01-01");

    let id = profile["education"][0]["id"].as_str().unwrap_or_default().to_string();
    let res = delete(&server, &token, &format!("/api/profile/education/{}", id)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["education"], json!([]));
    Ok(())
}

#[tokio::test]
async fn list_items_need_a_profile() -> Result<()> {
    let server = common::spawn_app().await?;
    let token = server.register("Ada", "ada@example.com", "engine42").await?;

    let res = put(
        &server,
        &token,
        "/api/profile/experience",
        json!({ "title": "Engineer", "company": "Acme", "from": "2020-01-01" }),
    )
    .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?, json!({ "msg": "Profile not found" }));
    Ok(())
}

#[tokio::test]
async fn list_routes_require_token() -> Result<()> {
    let server = common::spawn_app().await?;

    let res = server
        .client
        .put(server.url("/api/profile/education"))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
