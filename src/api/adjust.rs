use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use ink_separation::{ColorAdjustment, Histogram};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::services::SeparationService;

/// Request body for a tone adjustment preview
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AdjustRequest {
    /// Source image as a data-URL or bare base64 string
    pub image_base64: String,
    /// Omitted fields keep their neutral values
    #[serde(default)]
    pub adjustments: ColorAdjustment,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdjustResponse {
    /// Adjusted image as a PNG data-URL
    pub adjusted_image: String,
    /// Per-channel histogram of the adjusted image
    pub histogram: Histogram,
}

/// Apply color adjustments
///
/// Runs levels, curves, brightness/contrast, HSL and color balance over
/// the full-size image and returns it with its histogram.
#[utoipa::path(
    post,
    path = "/adjust-colors",
    request_body = AdjustRequest,
    responses(
        (status = 200, description = "Adjusted image", body = AdjustResponse),
        (status = 400, description = "Undecodable image or invalid adjustment"),
    ),
    tag = "Tools"
)]
pub async fn handle_adjust_colors(
    State(service): State<Arc<SeparationService>>,
    payload: Result<Json<AdjustRequest>, JsonRejection>,
) -> Result<Json<AdjustResponse>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(service.adjust(request).await?))
}
