//! The separation orchestrator.

use std::borrow::Cow;
use std::sync::Arc;

use chrono::Utc;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::analyze::{analyze_image, Analysis};
use super::channel::{Channel, ChannelType};
use super::compare::{Comparison, ComparisonEntry, COMPARE_TARGET_COUNT};
use super::composite::composite;
use super::request::SeparationRequest;
use super::result::{Metadata, SeparationResult};
use super::scoring::{color_channel_count, ink_estimate, quality_score, recommendations};
use crate::adjust::{self, ColorAdjustment, Histogram};
use crate::color::{Lab, LabImage, Srgb};
use crate::error::{InputError, SeparationError, Stage};
use crate::extract::{CustomPalette, PaletteExtractor, SeparationMethod};
use crate::mask::{
    apply_min_dot, apply_trap, color_mask, coverage_percent, halftone_screen, underbase_mask,
    InkType, MaskError,
};
use crate::reference::{ReferenceMatch, ReferenceMatcher};

/// Longest side of the working image unless configured otherwise.
pub const DEFAULT_MAX_DIMENSION: u32 = 1200;

const UNDERBASE_NAME: &str = "Underbase White";
const DISCHARGE_UNDERBASE_VOLUME: f32 = 0.8;
const SOFT_EDGE_SOFTNESS: f32 = 0.3;

/// Runs separations against a shared, read-only reference table.
///
/// A `Separator` holds no per-request state and is cheap to clone, so one
/// instance can serve concurrent requests.
///
/// ```
/// use std::sync::Arc;
/// use image::{Rgb, RgbImage};
/// use ink_separation::{ReferenceMatcher, SeparationMethod, SeparationRequest, Separator};
///
/// let separator = Separator::new(Arc::new(ReferenceMatcher::empty()));
/// let image = RgbImage::from_pixel(32, 32, Rgb([0, 0, 0]));
/// let request = SeparationRequest::builder(image)
///     .method(SeparationMethod::MedianCut)
///     .underbase(false)
///     .softness(0.0)
///     .build()
///     .unwrap();
///
/// let result = separator.separate(&request).unwrap();
/// assert_eq!(result.channels.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Separator {
    reference: Arc<ReferenceMatcher>,
    max_dimension: u32,
}

impl Separator {
    pub fn new(reference: Arc<ReferenceMatcher>) -> Self {
        Self {
            reference,
            max_dimension: DEFAULT_MAX_DIMENSION,
        }
    }

    /// Cap the working image's longest side (at least 1).
    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension.max(1);
        self
    }

    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    pub fn reference(&self) -> &ReferenceMatcher {
        &self.reference
    }

    /// Full pipeline: resize, adjust, extract, build channels, composite,
    /// score.
    pub fn separate(&self, request: &SeparationRequest) -> Result<SeparationResult, SeparationError> {
        request.validate()?;
        let (src_w, src_h) = request.image.dimensions();
        info!(
            method = %request.method,
            target = request.target_count,
            width = src_w,
            height = src_h,
            custom = request.custom_colors.is_some(),
            "starting separation"
        );

        let resized = resize_to_fit(&request.image, self.max_dimension);
        let working = match &request.adjustment {
            Some(adj) => Cow::Owned(adjust::apply_adjustments(&resized, adj)),
            None => resized,
        };
        let histogram = Histogram::of(&working);
        let lab = LabImage::from_rgb(&working);
        let min_coverage = f64::from(request.min_ink_coverage) * 100.0;

        let mut channels = Vec::new();
        if request.wants_underbase() {
            if let Some(ch) = self.underbase_channel(&lab, request, min_coverage) {
                channels.push(ch);
            }
        }

        let colors = self.palette(&working, request)?;
        debug!(colors = colors.len(), "palette extracted");

        let built = colors
            .par_iter()
            .enumerate()
            .map(|(i, color)| self.color_channel(i, color, &lab, request, min_coverage))
            .collect::<Result<Vec<_>, MaskError>>()
            .map_err(|e| SeparationError::processing(Stage::ChannelBuild, e))?;
        channels.extend(built.into_iter().flatten());
        for (order, ch) in channels.iter_mut().enumerate() {
            ch.order = order as u32;
        }

        let preview = composite(working.width(), working.height(), request.fabric_color, &channels);
        let estimate = ink_estimate(&channels);
        let quality = quality_score(&channels, &estimate);
        let recommendations = recommendations(&channels, request, &estimate, quality);

        let mut palette: Vec<Srgb> = Vec::new();
        for ch in channels.iter().filter(|c| c.channel_type.is_color()) {
            if !palette.contains(&ch.color) {
                palette.push(ch.color);
            }
        }

        let reference_matches = request
            .match_reference
            .then(|| self.reference.match_palette(&colors));

        let white_channels = channels.iter().filter(|c| c.channel_type.is_white()).count();
        let metadata = Metadata {
            method: request.method,
            total_channels: channels.len(),
            color_channels: color_channel_count(&channels),
            white_channels,
            image_dimensions: format!("{src_h}x{src_w}"),
            working_width: working.width(),
            working_height: working.height(),
            ink_type: request.ink_type,
            fabric_type: request.fabric_type,
            choke_spread: request.trap,
            min_dot: request.min_dot,
            highlight_white: request.highlight_white,
            pantone_matched: request.match_reference,
            pantone_available: !self.reference.is_empty(),
            timestamp: Utc::now(),
        };

        info!(
            channels = channels.len(),
            quality,
            coverage = estimate.total_coverage,
            "separation finished"
        );

        Ok(SeparationResult {
            channels,
            preview,
            metadata,
            palette,
            reference_matches,
            ink_estimate: estimate,
            quality_score: quality,
            recommendations,
            histogram,
        })
    }

    /// Apply tone adjustments and return the result with its histogram.
    pub fn adjust(
        &self,
        image: &RgbImage,
        adjustment: &ColorAdjustment,
    ) -> Result<(RgbImage, Histogram), SeparationError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(InputError::EmptyImage.into());
        }
        adjustment.validate()?;
        Ok(adjust::adjust(image, adjustment))
    }

    /// Nearest catalog match for each color, skipping colors without one.
    pub fn match_reference(&self, colors: &[Srgb]) -> Vec<ReferenceMatch> {
        let labs: Vec<Lab> = colors.iter().map(|&c| Lab::from(c)).collect();
        self.reference.match_palette(&labs)
    }

    pub fn analyze(&self, image: &RgbImage) -> Result<Analysis, SeparationError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(InputError::EmptyImage.into());
        }
        Ok(analyze_image(image))
    }

    /// Run each method with six colors and an underbase on black, ranked
    /// by quality. Methods that fail are logged and left out.
    pub fn compare(
        &self,
        image: &RgbImage,
        methods: &[SeparationMethod],
    ) -> Result<Comparison, SeparationError> {
        let mut entries = Vec::with_capacity(methods.len());
        for &method in methods {
            let request = SeparationRequest::builder(image.clone())
                .method(method)
                .target_count(COMPARE_TARGET_COUNT)
                .underbase(true)
                .fabric_color(Srgb::BLACK)
                .build()?;
            match self.separate(&request) {
                Ok(result) => entries.push(ComparisonEntry {
                    method,
                    channel_count: result.channels.len(),
                    quality_score: result.quality_score,
                    ink_estimate: result.ink_estimate,
                    recommendations: result.recommendations.into_iter().take(2).collect(),
                }),
                Err(err) => warn!(%method, error = %err, "comparison run failed"),
            }
        }
        Ok(Comparison::ranked(entries))
    }

    fn palette(&self, working: &RgbImage, request: &SeparationRequest) -> Result<Vec<Lab>, SeparationError> {
        let extractor: Box<dyn PaletteExtractor> = match &request.custom_colors {
            Some(colors) => Box::new(CustomPalette(colors.iter().map(|&c| Lab::from(c)).collect())),
            None => request.method.extractor(),
        };
        extractor
            .extract(working, request.target_count)
            .map_err(|e| SeparationError::processing(Stage::PaletteExtraction(extractor.name()), e))
    }

    fn underbase_channel(
        &self,
        lab: &LabImage,
        request: &SeparationRequest,
        min_coverage: f64,
    ) -> Option<Channel> {
        let mask = apply_trap(
            &underbase_mask(lab, request.ink_type, request.fabric_type),
            request.trap,
        );
        let coverage = coverage_percent(&mask);
        if coverage < min_coverage {
            debug!(coverage, "dropping underbase below minimum coverage");
            return None;
        }

        let mut ch = Channel::new(UNDERBASE_NAME, Srgb::WHITE, ChannelType::Underbase, mask, coverage);
        if request.ink_type == InkType::Discharge {
            ch.ink_volume = DISCHARGE_UNDERBASE_VOLUME;
        }
        Some(ch)
    }

    fn color_channel(
        &self,
        index: usize,
        color: &Lab,
        lab: &LabImage,
        request: &SeparationRequest,
        min_coverage: f64,
    ) -> Result<Option<Channel>, MaskError> {
        let mut mask = apply_trap(&color_mask(lab, color, request.softness)?, request.trap);
        apply_min_dot(&mut mask, request.min_dot);
        let coverage = coverage_percent(&mask);
        if coverage < min_coverage {
            debug!(index, coverage, "dropping channel below minimum coverage");
            return Ok(None);
        }

        let matched = if request.match_reference {
            self.reference.find_closest(color)
        } else {
            None
        };
        let display = matched
            .as_ref()
            .and_then(|m| m.hex.parse::<Srgb>().ok())
            .unwrap_or_else(|| color.to_srgb());
        let name = match &matched {
            Some(m) => format!("PMS {}", m.pantone),
            None => format!("Color {}", index + 1),
        };

        let channel_type = match request.method {
            SeparationMethod::SimulatedProcess => ChannelType::ProcessColor,
            _ if request.softness > SOFT_EDGE_SOFTNESS => ChannelType::Gradient,
            _ => ChannelType::SpotColor,
        };

        let halftone = request
            .method
            .halftone()
            .then(|| halftone_screen(&mask, request.halftone_frequency));

        let mut ch = Channel::new(name, display, channel_type, mask, coverage);
        ch.pantone = matched.map(|m| m.pantone);
        ch.halftone = halftone;
        Ok(Some(ch))
    }
}

/// Decode an encoded raster, compositing any alpha channel onto white.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, InputError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| InputError::Decode(e.to_string()))?;
    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(InputError::EmptyImage);
    }
    Ok(flatten_onto_white(decoded))
}

fn flatten_onto_white(image: DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.into_rgb8();
    }
    let rgba = image.into_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = u16::from(a);
        let blend = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

/// Downscale so the longest side is at most `max_dimension`. Never
/// upscales.
pub fn resize_to_fit(image: &RgbImage, max_dimension: u32) -> Cow<'_, RgbImage> {
    let (w, h) = image.dimensions();
    let longest = w.max(h);
    if longest <= max_dimension {
        return Cow::Borrowed(image);
    }
    let scale = max_dimension as f64 / longest as f64;
    let new_w = ((w as f64 * scale) as u32).max(1);
    let new_h = ((h as f64 * scale) as u32).max(1);
    debug!(from_w = w, from_h = h, to_w = new_w, to_h = new_h, "resizing working image");
    Cow::Owned(imageops::resize(image, new_w, new_h, FilterType::Triangle))
}
