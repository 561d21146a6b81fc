use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use ink_separation::Analysis;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::services::SeparationService;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// Image as a data-URL or bare base64 string
    pub image_base64: String,
}

/// Suggest a separation method and color count
///
/// Edge density above 30% suggests gradient_aware; otherwise more than 100
/// unique colors suggests simulated_process, and median_cut below that.
#[utoipa::path(
    post,
    path = "/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Image analysis", body = Analysis),
        (status = 400, description = "Undecodable image"),
    ),
    tag = "Tools"
)]
pub async fn handle_analyze(
    State(service): State<Arc<SeparationService>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<Analysis>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(service.analyze(request.image_base64).await?))
}
