mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{data_uri, token_for, TestServer, HOST};

#[tokio::test]
async fn replacing_photo_deletes_previous_one() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = token_for(Uuid::new_v4());

    let first = server
        .client
        .put(server.url("/api/profile/photo"))
        .bearer_auth(&token)
        .json(&json!({ "photo": data_uri("ONE") }))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let first_url = first["data"]["profile"]["avatar_url"].as_str().unwrap().to_string();
    assert!(first_url.starts_with(HOST));

    let second = server
        .client
        .put(server.url("/api/profile/photo"))
        .bearer_auth(&token)
        .json(&json!({ "photo": data_uri("TWO") }))
        .send()
        .await?;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(server.media.deletes(), vec![first_url]);
    Ok(())
}

#[tokio::test]
async fn refused_photo_upload_is_a_gateway_error() -> Result<()> {
    let server = TestServer::spawn().await?;
    let broken = data_uri("BROKEN");
    server.media.refuse_upload(&broken);

    let res = server
        .client
        .put(server.url("/api/profile/photo"))
        .bearer_auth(token_for(Uuid::new_v4()))
        .json(&json!({ "photo": broken }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    Ok(())
}

#[tokio::test]
async fn removing_missing_profile_photo_is_not_found() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .client
        .delete(server.url("/api/profile/photo"))
        .bearer_auth(token_for(Uuid::new_v4()))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn deleting_account_removes_posts_and_images() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = token_for(Uuid::new_v4());

    server
        .client
        .put(server.url("/api/profile/photo"))
        .bearer_auth(&token)
        .json(&json!({ "photo": data_uri("ME") }))
        .send()
        .await?;
    server
        .client
        .post(server.url("/api/posts"))
        .bearer_auth(&token)
        .json(&json!({ "title": "one", "content": format!(r#"<img src="{}">"#, data_uri("P1")) }))
        .send()
        .await?;

    let res = server
        .client
        .delete(server.url("/api/profile"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["deleted"].as_array().unwrap().len(), 2);

    let posts = server
        .client
        .get(server.url("/api/posts"))
        .bearer_auth(&token)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert!(posts["data"].as_array().unwrap().is_empty());
    Ok(())
}
