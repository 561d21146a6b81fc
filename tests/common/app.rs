//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use inksep::assets::AssetLoader;
use inksep::models::AppConfig;
use inksep::server::{build_router, create_app_state, create_app_state_with_config, AppState};

/// Test application wrapping the production router
pub struct TestApp {
    router: axum::Router,
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application using embedded assets
    pub fn new() -> Self {
        let asset_loader = Arc::new(AssetLoader::new(None, None));
        let state = create_app_state(asset_loader).expect("Failed to create app state");
        Self::from_state(state)
    }

    /// Create a test application with an explicit configuration
    pub fn with_config(config: AppConfig) -> Self {
        Self::with_loader(AssetLoader::new(None, None), config)
    }

    /// Create a test application with a custom loader and configuration
    pub fn with_loader(loader: AssetLoader, config: AppConfig) -> Self {
        let state =
            create_app_state_with_config(&loader, config).expect("Failed to create app state");
        Self::from_state(state)
    }

    fn from_state(state: AppState) -> Self {
        // Same router as production (minus Swagger UI)
        let router = build_router(state.clone());
        Self { router, state }
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a POST request with a JSON value as body
    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> TestResponse {
        self.post_raw(path, &body.to_string()).await
    }

    /// Make a POST request with a raw body and JSON content type
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::post(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(request).await
    }

    /// Send a request to the router
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}
