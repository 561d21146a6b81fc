//! Separation output.

use chrono::{DateTime, Utc};
use image::RgbImage;
use serde::{Deserialize, Serialize};

use super::channel::Channel;
use crate::adjust::Histogram;
use crate::color::Srgb;
use crate::extract::SeparationMethod;
use crate::mask::{FabricType, InkType};
use crate::reference::ReferenceMatch;

/// Everything produced by one separation.
#[derive(Debug, Clone)]
pub struct SeparationResult {
    /// Channels in paint order
    pub channels: Vec<Channel>,
    /// Composite of the channels over the fabric color
    pub preview: RgbImage,
    pub metadata: Metadata,
    /// Distinct colors of the non-white channels, first occurrence first
    pub palette: Vec<Srgb>,
    /// Present only when reference matching was requested
    pub reference_matches: Option<Vec<ReferenceMatch>>,
    pub ink_estimate: InkEstimate,
    /// 0..=100
    pub quality_score: f64,
    pub recommendations: Vec<String>,
    /// Histogram of the working (resized, adjusted) image
    pub histogram: Histogram,
}

/// Request echo and channel counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Metadata {
    pub method: SeparationMethod,
    pub total_channels: usize,
    pub color_channels: usize,
    pub white_channels: usize,
    /// Source dimensions before resizing, as `"{height}x{width}"`
    pub image_dimensions: String,
    pub working_width: u32,
    pub working_height: u32,
    pub ink_type: InkType,
    pub fabric_type: FabricType,
    pub choke_spread: f32,
    pub min_dot: u8,
    pub highlight_white: bool,
    pub pantone_matched: bool,
    pub pantone_available: bool,
    pub timestamp: DateTime<Utc>,
}

/// Ink usage estimate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct InkEstimate {
    /// Sum of channel coverage, percent (may exceed 100)
    pub total_coverage: f64,
    pub white_ink_ml: f64,
    pub colored_ink_ml: f64,
    pub estimated_cost: f64,
}
