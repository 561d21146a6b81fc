//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use ink_separation::{Analysis, ReferenceMatcher, Separator};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api;
use crate::assets::AssetLoader;
use crate::error::ApiError;
use crate::models::AppConfig;
use crate::services::SeparationService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub service: Arc<SeparationService>,
}

/// Create application state from an asset loader.
pub fn create_app_state(asset_loader: Arc<AssetLoader>) -> anyhow::Result<AppState> {
    let config = AppConfig::load_from_assets(&asset_loader);
    create_app_state_with_config(&asset_loader, config)
}

/// Create application state with an explicit configuration.
pub fn create_app_state_with_config(
    asset_loader: &AssetLoader,
    config: AppConfig,
) -> anyhow::Result<AppState> {
    let reference = Arc::new(load_reference_table(asset_loader, &config));
    let separator = Arc::new(Separator::new(reference).with_max_dimension(config.max_dimension));
    let service = Arc::new(SeparationService::new(
        separator,
        config.compare_methods.clone(),
    ));

    Ok(AppState {
        config: Arc::new(config),
        service,
    })
}

/// Load the Pantone table. A missing or malformed table disables
/// matching but never stops the service.
pub fn load_reference_table(asset_loader: &AssetLoader, config: &AppConfig) -> ReferenceMatcher {
    let bytes = match asset_loader.read_reference_table(config.reference_table.as_deref()) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(%e, "Failed to read Pantone table, matching disabled");
            return ReferenceMatcher::empty();
        }
    };
    match ReferenceMatcher::from_json(&bytes) {
        Ok(matcher) => {
            tracing::info!(colors = matcher.len(), "Loaded Pantone table");
            matcher
        }
        Err(e) => {
            tracing::warn!(%e, "Failed to parse Pantone table, matching disabled");
            ReferenceMatcher::empty()
        }
    }
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;
    let cors = state.config.cors_permissive;

    let router = Router::new()
        .route("/", get(api::handle_root))
        .route("/health", get(handle_health))
        .route("/process", post(handle_process))
        .route("/adjust-colors", post(handle_adjust_colors))
        .route("/match-pantone", post(handle_match_pantone))
        .route("/analyze", post(handle_analyze))
        .route("/compare", post(handle_compare))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http());

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

// Wrapper handlers to extract state components for the underlying API handlers

async fn handle_health(State(state): State<AppState>) -> Json<api::HealthResponse> {
    api::handle_health(State(state.service)).await
}

async fn handle_process(
    State(state): State<AppState>,
    payload: Result<Json<api::ProcessRequest>, JsonRejection>,
) -> Result<Json<api::SeparationResponse>, ApiError> {
    api::handle_process(State(state.service), payload).await
}

async fn handle_adjust_colors(
    State(state): State<AppState>,
    payload: Result<Json<api::AdjustRequest>, JsonRejection>,
) -> Result<Json<api::AdjustResponse>, ApiError> {
    api::handle_adjust_colors(State(state.service), payload).await
}

async fn handle_match_pantone(
    State(state): State<AppState>,
    payload: Result<Json<api::MatchRequest>, JsonRejection>,
) -> Result<Json<api::MatchResponse>, ApiError> {
    api::handle_match_pantone(State(state.service), payload).await
}

async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<api::AnalyzeRequest>, JsonRejection>,
) -> Result<Json<Analysis>, ApiError> {
    api::handle_analyze(State(state.service), payload).await
}

async fn handle_compare(
    State(state): State<AppState>,
    payload: Result<Json<api::CompareRequest>, JsonRejection>,
) -> Result<Json<api::CompareResponse>, ApiError> {
    api::handle_compare(State(state.service), payload).await
}
