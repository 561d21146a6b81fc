use axum::{extract::State, Json};
use ink_separation::SeparationMethod;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum::IntoEnumIterator;
use utoipa::ToSchema;

use crate::services::SeparationService;

pub const SERVICE_NAME: &str = "inksep";
pub const ENGINE_NAME: &str = "ink-separation";

const FEATURES: &[&str] = &[
    "Color adjustment tools (curves, levels, HSL, color balance)",
    "Pantone color matching",
    "Manual color selection",
    "Simulated process separation (fixed spot colors for dark garments)",
    "Choke/spread trapping",
    "Minimum dot control",
    "Histogram analysis",
    "Method comparison",
];

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MethodInfo {
    pub name: SeparationMethod,
    pub description: String,
}

/// Service description
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub features: Vec<String>,
    pub methods: Vec<MethodInfo>,
}

impl ServiceInfo {
    pub fn current() -> Self {
        Self {
            name: SERVICE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            features: FEATURES.iter().map(|f| f.to_string()).collect(),
            methods: SeparationMethod::iter()
                .map(|m| MethodInfo {
                    name: m,
                    description: m.description().to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always "healthy" when the server answers
    pub status: String,
    pub engine: String,
    /// Whether a non-empty Pantone table was loaded
    pub pantone_loaded: bool,
}

/// Describe the service, its features and separation methods
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service description", body = ServiceInfo),
    ),
    tag = "Service"
)]
pub async fn handle_root() -> Json<ServiceInfo> {
    Json(ServiceInfo::current())
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    ),
    tag = "Service"
)]
pub async fn handle_health(State(service): State<Arc<SeparationService>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        engine: ENGINE_NAME.to_string(),
        pantone_loaded: service.pantone_loaded(),
    })
}
