mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn slugs_are_unique_per_owner() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let (token, _) = common::register_user(&server.base_url, "slugs").await?;

    let first = common::create_lane(&server.base_url, &token, "Summer Trip!").await?;
    assert_eq!(first["slug"], json!("summer-trip"));

    let second = common::create_lane(&server.base_url, &token, "Summer Trip!").await?;
    assert_eq!(second["slug"], json!("summer-trip-1"));

    // A different owner starts from the plain slug again
    let (other_token, _) = common::register_user(&server.base_url, "slugs-other").await?;
    let other = common::create_lane(&server.base_url, &other_token, "Summer Trip!").await?;
    assert_eq!(other["slug"], json!("summer-trip"));

    Ok(())
}

#[tokio::test]
async fn updating_with_the_same_title_keeps_the_slug() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let (token, _) = common::register_user(&server.base_url, "samename").await?;
    let client = reqwest::Client::new();

    let lane = common::create_lane(&server.base_url, &token, "Ski Week").await?;
    let lane_id = lane["id"].as_str().unwrap();
    let slug = lane["slug"].as_str().unwrap().to_string();

    let res = client
        .put(format!("{}/lanes/{}", server.base_url, lane_id))
        .bearer_auth(&token)
        .json(&json!({ "title": "Ski Week", "description": "fresh powder" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["slug"], json!(slug));
    assert_eq!(body["data"]["description"], json!("fresh powder"));

    Ok(())
}

#[tokio::test]
async fn foreign_lane_reads_as_not_found_not_forbidden() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let (owner, _) = common::register_user(&server.base_url, "owner").await?;
    let (intruder, _) = common::register_user(&server.base_url, "intruder").await?;
    let client = reqwest::Client::new();

    let lane = common::create_lane(&server.base_url, &owner, "Private").await?;
    let lane_id = lane["id"].as_str().unwrap();

    // Anyone can read the lane, anonymously included
    let res = client
        .get(format!("{}/lanes/{}", server.base_url, lane_id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["title"], json!("Private"));

    let res = client
        .put(format!("{}/lanes/{}", server.base_url, lane_id))
        .bearer_auth(&intruder)
        .json(&json!({ "title": "Hijacked" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(format!("{}/lanes/{}", server.base_url, lane_id))
        .bearer_auth(&intruder)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Without any token the same request is an auth failure instead
    let res = client
        .put(format!("{}/lanes/{}", server.base_url, lane_id))
        .json(&json!({ "title": "Anon" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn list_pagination_clamps_oversized_limits() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/lanes?page=0&limit=5000", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["pagination"]["page"], json!(1));
    assert_eq!(body["data"]["pagination"]["limit"], json!(100));

    Ok(())
}

#[tokio::test]
async fn my_lanes_only_returns_the_callers() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let (token, _) = common::register_user(&server.base_url, "mine").await?;
    let (other, _) = common::register_user(&server.base_url, "theirs").await?;
    let client = reqwest::Client::new();

    common::create_lane(&server.base_url, &token, "Mine A").await?;
    common::create_lane(&server.base_url, &other, "Theirs B").await?;

    let res = client
        .get(format!("{}/lanes/my?limit=100", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    let titles: Vec<&str> = body["data"]["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|l| l["title"].as_str())
        .collect();
    assert!(titles.contains(&"Mine A"));
    assert!(!titles.contains(&"Theirs B"));

    let res = client.get(format!("{}/lanes/my", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn search_matches_title_and_description() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let (token, _) = common::register_user(&server.base_url, "search").await?;
    let client = reqwest::Client::new();

    let marker = uuid::Uuid::new_v4().simple().to_string();
    common::create_lane(&server.base_url, &token, &format!("Hiking {}", marker)).await?;

    let res = client
        .get(format!("{}/lanes?search={}", server.base_url, marker))
        .send()
        .await?;
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["pagination"]["total"], json!(1));

    Ok(())
}
