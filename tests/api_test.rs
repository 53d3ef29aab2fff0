//! HTTP boundary tests against a live listener.

mod common;

use std::sync::Arc;

use retrace::api;
use retrace::Engine;
use serde_json::{json, Value};

async fn spawn_server(engine: Arc<Engine>) -> String {
    let app = api::router(engine);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn health_reports_stored_pages() {
    let (engine, _) = common::test_engine().await;
    let base = spawn_server(engine).await;
    let client = reqwest::Client::new();

    let body: Value = client.get(&base).send().await.unwrap().json().await.unwrap();
    assert_eq!(body["stored_pages"], json!(0));
    assert!(body["message"].as_str().unwrap().contains("running"));

    client
        .post(format!("{base}/memorize"))
        .json(&json!({"title": "A", "content": "some content"}))
        .send()
        .await
        .unwrap();

    let body: Value = client.get(&base).send().await.unwrap().json().await.unwrap();
    assert_eq!(body["stored_pages"], json!(1));
}

#[tokio::test]
async fn memorize_then_fetch_page_round_trips() {
    let (engine, _) = common::test_engine().await;
    let base = spawn_server(engine).await;
    let client = reqwest::Client::new();

    let captured = "2026-08-01T10:30:00Z";
    let response = client
        .post(format!("{base}/memorize"))
        .json(&json!({
            "title": "Neural Networks - Wikipedia",
            "content": "A neural network is a series of algorithms.",
            "captured_at": captured,
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let receipt: Value = response.json().await.unwrap();
    assert_eq!(receipt["status"], json!("success"));
    assert_eq!(receipt["title"], json!("Neural Networks - Wikipedia"));
    assert!(receipt["chunk_count"].as_u64().unwrap() >= 1);

    let page_id = receipt["page_id"].as_str().unwrap();
    let page: Value = client
        .get(format!("{base}/pages/{page_id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(page["title"], json!("Neural Networks - Wikipedia"));
    assert_eq!(page["content"], json!("A neural network is a series of algorithms."));
    assert_eq!(page["captured_at"], json!("2026-08-01T10:30:00Z"));
}

#[tokio::test]
async fn memorize_rejects_empty_content() {
    let (engine, _) = common::test_engine().await;
    let base = spawn_server(engine).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/memorize"))
        .json(&json!({"title": "Empty", "content": "   "}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], json!("error"));
}

#[tokio::test]
async fn duplicate_memorize_reports_duplicate_status() {
    let (engine, _) = common::test_engine().await;
    let base = spawn_server(engine).await;
    let client = reqwest::Client::new();

    let request = json!({
        "title": "Dup",
        "content": "captured once",
        "captured_at": "2026-08-01T00:00:00Z",
    });

    let first: Value = client
        .post(format!("{base}/memorize"))
        .json(&request)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let second: Value = client
        .post(format!("{base}/memorize"))
        .json(&request)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(first["status"], json!("success"));
    assert_eq!(second["status"], json!("duplicate"));
    assert_eq!(first["page_id"], second["page_id"]);
}

#[tokio::test]
async fn grounded_chat_answers_from_memorized_page() {
    let (engine, _) = common::test_engine().await;
    let base = spawn_server(engine).await;
    let client = reqwest::Client::new();

    client
        .post(format!("{base}/memorize"))
        .json(&json!({"title": "Sky", "content": "The sky is blue. ".repeat(100)}))
        .send()
        .await
        .unwrap();

    let body: Value = client
        .post(format!("{base}/chat"))
        .json(&json!({"message": "what color is the sky", "mode": "grounded"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], json!("success"));
    assert!(body["response"].as_str().unwrap().contains("blue"));
}

#[tokio::test]
async fn free_chat_works_without_pages() {
    let (engine, _) = common::test_engine().await;
    let base = spawn_server(engine).await;
    let client = reqwest::Client::new();

    let body: Value = client
        .post(format!("{base}/chat"))
        .json(&json!({"message": "hello there", "mode": "free"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], json!("success"));
    assert!(!body["response"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn mode_defaults_to_grounded() {
    let (engine, _) = common::test_engine().await;
    let base = spawn_server(engine).await;
    let client = reqwest::Client::new();

    // No pages ingested and no mode given: grounded behavior reports no
    // relevant history rather than chatting freely.
    let body: Value = client
        .post(format!("{base}/chat"))
        .json(&json!({"message": "what did I read"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(body["response"].as_str().unwrap().contains("couldn't find anything relevant"));
}

#[tokio::test]
async fn pages_listing_supports_filtering() {
    let (engine, _) = common::test_engine().await;
    let base = spawn_server(engine).await;
    let client = reqwest::Client::new();

    for (title, content) in [
        ("Machine Learning - Wikipedia", "ML imitates human learning."),
        ("Gardening Tips", "Water the tomatoes every morning."),
    ] {
        client
            .post(format!("{base}/memorize"))
            .json(&json!({"title": title, "content": content}))
            .send()
            .await
            .unwrap();
    }

    let all: Value = client
        .get(format!("{base}/pages"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all["pages"].as_array().unwrap().len(), 2);

    let filtered: Value = client
        .get(format!("{base}/pages?q=machine"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let pages = filtered["pages"].as_array().unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0]["title"], json!("Machine Learning - Wikipedia"));
}

#[tokio::test]
async fn unknown_page_is_404() {
    let (engine, _) = common::test_engine().await;
    let base = spawn_server(engine).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{base}/pages/00000000-0000-0000-0000-000000000000"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn delete_page_removes_it_from_listing() {
    let (engine, _) = common::test_engine().await;
    let base = spawn_server(engine).await;
    let client = reqwest::Client::new();

    let receipt: Value = client
        .post(format!("{base}/memorize"))
        .json(&json!({"title": "Doomed", "content": "to be deleted"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let page_id = receipt["page_id"].as_str().unwrap();

    let deleted = client
        .delete(format!("{base}/pages/{page_id}"))
        .send()
        .await
        .unwrap();
    assert!(deleted.status().is_success());

    let missing = client
        .get(format!("{base}/pages/{page_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
}

#[tokio::test]
async fn api_configs_and_settings_round_trip() {
    let (engine, _) = common::test_engine().await;
    let base = spawn_server(engine).await;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("{base}/api-configs"))
        .json(&json!({
            "name": "anthropic-main",
            "kind": "anthropic_compatible",
            "model": "claude-sonnet-4-5",
            "api_key": "sk-ant-secret",
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created["name"], json!("anthropic-main"));

    let configs: Value = client
        .get(format!("{base}/api-configs"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let list = configs["configs"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["kind"], json!("anthropic_compatible"));

    client
        .post(format!("{base}/settings"))
        .json(&json!({"active_profile": "anthropic-main", "theme": "dark"}))
        .send()
        .await
        .unwrap();

    let settings: Value = client
        .get(format!("{base}/settings"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(settings["settings"]["active_profile"], json!("anthropic-main"));
    assert_eq!(settings["settings"]["theme"], json!("dark"));
}
