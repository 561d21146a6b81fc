use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use image::RgbImage;
use ink_separation::{
    BlendMode, Channel, ChannelType, ColorAdjustment, FabricType, Histogram, InkEstimate,
    InkType, InputError, Metadata, ReferenceMatch, SeparationMethod, SeparationRequest,
    SeparationResult, Srgb,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::services::image_codec::{gray_data_url, rgb_data_url, CodecError};
use crate::services::SeparationService;

/// Request body for a full separation
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProcessRequest {
    /// Source artwork as a data-URL or bare base64 string
    pub image_base64: String,
    #[serde(default)]
    pub separation_method: SeparationMethod,
    /// Target number of colors, 2..=20
    #[serde(default = "default_max_colors")]
    pub max_colors: usize,
    #[serde(default = "default_true")]
    pub use_underbase: bool,
    #[serde(default, alias = "highlight_white")]
    pub use_highlight_white: bool,
    /// Mask edge softness, 0..=1
    #[serde(default = "default_softness")]
    pub softness: f32,
    #[serde(default)]
    pub ink_type: InkType,
    #[serde(default)]
    pub fabric_type: FabricType,
    /// Garment color as `#RRGGBB`
    #[serde(default = "default_fabric_color")]
    pub fabric_color: String,
    /// Halftone screen frequency in lines per inch, 20..=85
    #[serde(default = "default_halftone_frequency")]
    pub halftone_frequency: f32,
    /// Channels covering less than this fraction are dropped, 0.001..=0.1
    #[serde(default = "default_min_ink_coverage")]
    pub min_ink_coverage: f32,
    /// Trap in points: positive spreads, negative chokes, -5..=5
    #[serde(default = "default_choke_spread")]
    pub choke_spread: f32,
    /// Smallest printable dot as a mask value, 3..=10
    #[serde(default = "default_min_dot")]
    pub min_dot: u32,
    #[serde(default)]
    pub color_adjustment: Option<ColorAdjustment>,
    /// Use these `#RRGGBB` colors instead of extracting a palette
    #[serde(default)]
    pub custom_colors: Option<Vec<String>>,
    #[serde(default)]
    pub match_pantone: bool,
}

fn default_max_colors() -> usize {
    8
}

fn default_true() -> bool {
    true
}

fn default_softness() -> f32 {
    0.6
}

fn default_fabric_color() -> String {
    "#000000".to_string()
}

fn default_halftone_frequency() -> f32 {
    45.0
}

fn default_min_ink_coverage() -> f32 {
    0.02
}

fn default_choke_spread() -> f32 {
    0.5
}

fn default_min_dot() -> u32 {
    5
}

fn parse_color(field: &'static str, value: &str) -> Result<Srgb, InputError> {
    value.parse().map_err(|source| InputError::InvalidColor {
        field,
        value: value.to_string(),
        source,
    })
}

impl ProcessRequest {
    /// Build the engine request for an already decoded image.
    pub fn to_engine(&self, image: RgbImage) -> Result<SeparationRequest, InputError> {
        let fabric_color = parse_color("fabric_color", &self.fabric_color)?;
        let custom_colors = self
            .custom_colors
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|hex| parse_color("custom_colors", hex))
            .collect::<Result<Vec<_>, _>>()?;
        let min_dot = u8::try_from(self.min_dot).map_err(|_| InputError::OutOfRange {
            field: "min_dot",
            value: f64::from(self.min_dot),
            min: 3.0,
            max: 10.0,
        })?;

        let mut builder = SeparationRequest::builder(image)
            .method(self.separation_method)
            .target_count(self.max_colors)
            .underbase(self.use_underbase)
            .highlight_white(self.use_highlight_white)
            .softness(self.softness)
            .ink_type(self.ink_type)
            .fabric_type(self.fabric_type)
            .fabric_color(fabric_color)
            .custom_colors(custom_colors)
            .halftone_frequency(self.halftone_frequency)
            .min_ink_coverage(self.min_ink_coverage)
            .trap(self.choke_spread)
            .min_dot(min_dot)
            .match_reference(self.match_pantone);
        if let Some(adjustment) = &self.color_adjustment {
            builder = builder.adjustment(adjustment.clone());
        }
        builder.build()
    }
}

/// One printable layer
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChannelResponse {
    pub name: String,
    /// Ink color as `#RRGGBB`
    pub color: String,
    pub pantone: Option<String>,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    /// Grayscale mask as a PNG data-URL (255 = full ink)
    pub image: String,
    pub opacity: f32,
    pub blend_mode: BlendMode,
    pub printable: bool,
    pub order: u32,
    pub ink_volume: f32,
    /// Halftone overlay as a PNG data-URL, for gradient methods
    pub halftone_pattern: Option<String>,
    pub coverage_percent: f64,
    pub locked: bool,
}

impl ChannelResponse {
    pub fn from_channel(channel: &Channel) -> Result<Self, CodecError> {
        Ok(Self {
            name: channel.name.clone(),
            color: channel.hex(),
            pantone: channel.pantone.clone(),
            channel_type: channel.channel_type,
            image: gray_data_url(&channel.mask)?,
            opacity: channel.opacity,
            blend_mode: channel.blend_mode,
            printable: channel.printable,
            order: channel.order,
            ink_volume: channel.ink_volume,
            halftone_pattern: channel.halftone.as_ref().map(gray_data_url).transpose()?,
            coverage_percent: channel.coverage_percent,
            locked: channel.locked,
        })
    }
}

/// Response from a full separation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SeparationResponse {
    /// Channels in print order
    pub channels: Vec<ChannelResponse>,
    /// Composite of all printable channels on the fabric color, PNG data-URL
    pub preview: String,
    pub metadata: Metadata,
    /// Distinct ink colors, first occurrence first
    pub palette: Vec<String>,
    /// Present only when `match_pantone` was requested
    pub pantone_matches: Option<Vec<ReferenceMatch>>,
    pub ink_estimate: InkEstimate,
    /// Quality score, 0..=100
    pub separation_quality: f64,
    pub recommendations: Vec<String>,
    pub histogram: Histogram,
}

impl SeparationResponse {
    pub fn from_result(result: SeparationResult) -> Result<Self, CodecError> {
        let channels = result
            .channels
            .iter()
            .map(ChannelResponse::from_channel)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            channels,
            preview: rgb_data_url(&result.preview)?,
            metadata: result.metadata,
            palette: result.palette.iter().map(|c| c.to_hex()).collect(),
            pantone_matches: result.reference_matches,
            ink_estimate: result.ink_estimate,
            separation_quality: result.quality_score,
            recommendations: result.recommendations,
            histogram: result.histogram,
        })
    }
}

/// Separate an image into printable ink channels
///
/// Returns channel masks, a composite preview, ink usage, a quality score
/// and recommendations.
#[utoipa::path(
    post,
    path = "/process",
    request_body = ProcessRequest,
    responses(
        (status = 200, description = "Separation complete", body = SeparationResponse),
        (status = 400, description = "Undecodable image or out-of-range parameter"),
        (status = 500, description = "Separation failed"),
    ),
    tag = "Separation"
)]
pub async fn handle_process(
    State(service): State<Arc<SeparationService>>,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Json<SeparationResponse>, ApiError> {
    let Json(request) = payload?;
    tracing::info!(
        method = %request.separation_method,
        max_colors = request.max_colors,
        underbase = request.use_underbase,
        match_pantone = request.match_pantone,
        "Separation requested"
    );
    let response = service.process(request).await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn request(json: &str) -> ProcessRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_wire_defaults() {
        let req = request(r#"{"image_base64": "x"}"#);
        assert_eq!(req.separation_method, SeparationMethod::GradientAware);
        assert_eq!(req.max_colors, 8);
        assert!(req.use_underbase);
        assert!(!req.use_highlight_white);
        assert_eq!(req.softness, 0.6);
        assert_eq!(req.fabric_color, "#000000");
        assert_eq!(req.min_dot, 5);
        assert!(!req.match_pantone);
    }

    #[test]
    fn test_highlight_white_alias() {
        let req = request(r#"{"image_base64": "x", "highlight_white": true}"#);
        assert!(req.use_highlight_white);
    }

    #[test]
    fn test_to_engine_maps_fields() {
        let req = request(
            r##"{"image_base64": "x", "separation_method": "median_cut", "max_colors": 4,
                "fabric_color": "#ffffff", "choke_spread": -1.5, "min_dot": 7,
                "custom_colors": ["#FF0000", "00ff00"], "match_pantone": true}"##,
        );
        let engine = req.to_engine(RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]))).unwrap();
        assert_eq!(engine.method, SeparationMethod::MedianCut);
        assert_eq!(engine.target_count, 4);
        assert_eq!(engine.fabric_color, Srgb::WHITE);
        assert_eq!(engine.trap, -1.5);
        assert_eq!(engine.min_dot, 7);
        assert!(engine.match_reference);
        assert_eq!(
            engine.custom_colors,
            Some(vec![Srgb::new(255, 0, 0), Srgb::new(0, 255, 0)])
        );
    }

    #[test]
    fn test_to_engine_rejects_bad_values() {
        let image = RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]));

        let req = request(r#"{"image_base64": "x", "fabric_color": "black"}"#);
        assert!(matches!(
            req.to_engine(image.clone()),
            Err(InputError::InvalidColor { field: "fabric_color", .. })
        ));

        let req = request(r#"{"image_base64": "x", "min_dot": 300}"#);
        assert!(matches!(
            req.to_engine(image.clone()),
            Err(InputError::OutOfRange { field: "min_dot", .. })
        ));

        let req = request(r#"{"image_base64": "x", "max_colors": 1}"#);
        assert!(matches!(
            req.to_engine(image),
            Err(InputError::OutOfRange { field: "max_colors", .. })
        ));
    }
}
