use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use ink_separation::{InputError, ReferenceMatch, Srgb};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::services::SeparationService;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MatchRequest {
    /// Colors as `#RRGGBB` (the `#` is optional)
    pub colors_hex: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MatchResponse {
    /// One entry per color that has a catalog color within ΔE 20
    pub matches: Vec<ReferenceMatch>,
    pub count: usize,
}

impl MatchRequest {
    pub fn parse_colors(&self) -> Result<Vec<Srgb>, InputError> {
        self.colors_hex
            .iter()
            .map(|hex| {
                hex.parse().map_err(|source| InputError::InvalidColor {
                    field: "colors_hex",
                    value: hex.clone(),
                    source,
                })
            })
            .collect()
    }
}

/// Match colors to the Pantone coated table
///
/// Colors without a catalog entry within ΔE 20 are left out, so `count`
/// may be smaller than the number of colors sent.
#[utoipa::path(
    post,
    path = "/match-pantone",
    request_body = MatchRequest,
    responses(
        (status = 200, description = "Nearest catalog colors", body = MatchResponse),
        (status = 400, description = "Invalid hex color"),
    ),
    tag = "Tools"
)]
pub async fn handle_match_pantone(
    State(service): State<Arc<SeparationService>>,
    payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Json<MatchResponse>, ApiError> {
    let Json(request) = payload?;
    let colors = request.parse_colors()?;
    let matches = service.match_pantone(&colors);
    Ok(Json(MatchResponse {
        count: matches.len(),
        matches,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_colors() {
        let req = MatchRequest {
            colors_hex: vec!["#C8102E".to_string(), "fedd00".to_string()],
        };
        assert_eq!(
            req.parse_colors().unwrap(),
            vec![Srgb::new(0xC8, 0x10, 0x2E), Srgb::new(0xFE, 0xDD, 0x00)]
        );

        let req = MatchRequest {
            colors_hex: vec!["#C8102E".to_string(), "#GGGGGG".to_string()],
        };
        assert!(matches!(
            req.parse_colors(),
            Err(InputError::InvalidColor { field: "colors_hex", .. })
        ));
    }
}
