use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use ink_separation::{Comparison, ComparisonEntry, SeparationMethod};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::services::SeparationService;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CompareRequest {
    /// Image as a data-URL or bare base64 string
    pub image_base64: String,
    /// Method names to run; the configured list when omitted
    #[serde(default)]
    pub methods: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompareResponse {
    /// Successful runs, best quality first
    pub comparison: Vec<ComparisonEntry>,
    pub best_method: Option<SeparationMethod>,
}

impl From<Comparison> for CompareResponse {
    fn from(c: Comparison) -> Self {
        Self {
            comparison: c.comparisons,
            best_method: c.best_method,
        }
    }
}

impl CompareRequest {
    /// Parse method names, or `None` when the request named none.
    pub fn parse_methods(&self) -> Result<Option<Vec<SeparationMethod>>, ApiError> {
        let Some(names) = &self.methods else {
            return Ok(None);
        };
        names
            .iter()
            .map(|name| {
                name.parse::<SeparationMethod>()
                    .map_err(|_| ApiError::BadRequest(format!("unknown separation method: {name}")))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

/// Compare separation methods
///
/// Each method runs with six colors and an underbase on black fabric.
/// Methods that fail are left out of the ranking.
#[utoipa::path(
    post,
    path = "/compare",
    request_body = CompareRequest,
    responses(
        (status = 200, description = "Methods ranked by quality", body = CompareResponse),
        (status = 400, description = "Undecodable image or unknown method"),
    ),
    tag = "Tools"
)]
pub async fn handle_compare(
    State(service): State<Arc<SeparationService>>,
    payload: Result<Json<CompareRequest>, JsonRejection>,
) -> Result<Json<CompareResponse>, ApiError> {
    let Json(request) = payload?;
    let methods = request.parse_methods()?;
    let comparison = service.compare(request.image_base64, methods).await?;
    tracing::info!(
        runs = comparison.comparisons.len(),
        best = ?comparison.best_method,
        "Comparison finished"
    );
    Ok(Json(comparison.into()))
}
