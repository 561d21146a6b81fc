//! Printable ink layers.

use image::GrayImage;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::color::Srgb;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChannelType {
    Underbase,
    HighlightWhite,
    SpotColor,
    ProcessColor,
    Gradient,
    Halftone,
}

impl ChannelType {
    /// Underbase and highlight white.
    pub fn is_white(self) -> bool {
        matches!(self, ChannelType::Underbase | ChannelType::HighlightWhite)
    }

    /// Spot, process, gradient and halftone.
    pub fn is_color(self) -> bool {
        !self.is_white()
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
}

/// One screen of the print.
///
/// `mask` (and `halftone`, when present) has the working image's
/// dimensions. `coverage_percent` is measured on the final mask.
#[derive(Debug, Clone)]
pub struct Channel {
    pub name: String,
    /// Display color; the matched catalog color when one was found
    pub color: Srgb,
    pub pantone: Option<String>,
    pub channel_type: ChannelType,
    pub mask: GrayImage,
    pub opacity: f32,
    pub blend_mode: BlendMode,
    /// Paint order, contiguous from 0
    pub order: u32,
    pub printable: bool,
    /// Relative ink deposit, 0.5..=1.5
    pub ink_volume: f32,
    pub halftone: Option<GrayImage>,
    pub coverage_percent: f64,
    /// Editor hint only
    pub locked: bool,
}

impl Channel {
    /// A printable, unlocked, fully opaque channel with normal blending.
    /// `order` is assigned when the channel is appended to a result.
    pub fn new(
        name: impl Into<String>,
        color: Srgb,
        channel_type: ChannelType,
        mask: GrayImage,
        coverage_percent: f64,
    ) -> Self {
        Self {
            name: name.into(),
            color,
            pantone: None,
            channel_type,
            mask,
            opacity: 1.0,
            blend_mode: BlendMode::Normal,
            order: 0,
            printable: true,
            ink_volume: 1.0,
            halftone: None,
            coverage_percent,
            locked: false,
        }
    }

    #[inline]
    pub fn hex(&self) -> String {
        self.color.to_hex()
    }
}
