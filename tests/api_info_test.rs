//! Tests for GET /, GET /health and router-level behavior.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::fixtures;
use common::*;
use inksep::assets::AssetLoader;
use inksep::models::AppConfig;
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn test_root_lists_methods() {
    let app = TestApp::new();
    let response = app.get("/").await;
    assert_ok(&response);

    let json: serde_json::Value = response.json();
    assert_eq!(json["name"], "inksep");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert!(!json["features"].as_array().unwrap().is_empty());

    let names: Vec<&str> = json["methods"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["gradient_aware", "median_cut", "watershed", "simulated_process", "octree"]
    );
    for method in json["methods"].as_array().unwrap() {
        assert!(!method["description"].as_str().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_health_with_embedded_table() {
    let app = TestApp::new();
    let response = app.get("/health").await;
    assert_ok(&response);

    let json: serde_json::Value = response.json();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["engine"], "ink-separation");
    assert_eq!(json["pantone_loaded"], true);
}

#[tokio::test]
async fn test_broken_table_degrades_matching() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("pantone.json");
    std::fs::write(&table, "this is not json").unwrap();

    let app = TestApp::with_loader(AssetLoader::new(None, Some(table)), AppConfig::default());

    let json: serde_json::Value = app.get("/health").await.json();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["pantone_loaded"], false);

    // Matching still answers, just without results
    let response = app
        .post_json("/match-pantone", &json!({"colors_hex": ["#C8102E"]}))
        .await;
    assert_ok(&response);
    let json: serde_json::Value = response.json();
    assert_eq!(json["count"], 0);
    assert_eq!(json["matches"], json!([]));

    // And separations that ask for matching still succeed
    let response = app
        .post_json(
            "/process",
            &json!({
                "image_base64": fixtures::data_url(&fixtures::blobs()),
                "separation_method": "median_cut",
                "max_colors": 4,
                "match_pantone": true,
            }),
        )
        .await;
    assert_ok(&response);
    let json: serde_json::Value = response.json();
    assert_eq!(json["pantone_matches"], json!([]));
    assert_eq!(json["metadata"]["pantone_available"], false);
}

#[tokio::test]
async fn test_configured_table_path() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("house-colors.json");
    std::fs::write(&table, r##"[{"pantone": "House Red", "hex": "#C8102E"}]"##).unwrap();

    let config = AppConfig {
        reference_table: Some(table),
        ..AppConfig::default()
    };
    let app = TestApp::with_config(config);

    let json: serde_json::Value = app
        .post_json("/match-pantone", &json!({"colors_hex": ["#C8102E"]}))
        .await
        .json();
    assert_eq!(json["count"], 1);
    assert_eq!(json["matches"][0]["pantone"], "House Red");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = TestApp::new();
    let response = app.get("/api/display").await;
    assert_status(&response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_follows_config() {
    let request = || {
        Request::get("/health")
            .header("Origin", "https://shop.example")
            .body(Body::empty())
            .unwrap()
    };

    let app = TestApp::new();
    let response = app.request(request()).await;
    assert_ok(&response);
    assert_eq!(
        response
            .headers
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );

    let app = TestApp::with_config(AppConfig {
        cors_permissive: false,
        ..AppConfig::default()
    });
    let response = app.request(request()).await;
    assert_ok(&response);
    assert!(response.headers.get("access-control-allow-origin").is_none());
}
