//! Separation request and its builder.

use image::RgbImage;

use crate::adjust::ColorAdjustment;
use crate::color::Srgb;
use crate::error::InputError;
use crate::extract::{SeparationMethod, MAX_CUSTOM_COLORS};
use crate::mask::{FabricType, InkType};

pub const MIN_TARGET_COUNT: usize = 2;
pub const MAX_TARGET_COUNT: usize = 20;

/// A validated separation job.
///
/// Construct with [`SeparationRequest::builder`]; the builder validates on
/// [`build`](SeparationRequestBuilder::build).
#[derive(Debug, Clone)]
pub struct SeparationRequest {
    pub image: RgbImage,
    pub method: SeparationMethod,
    pub target_count: usize,
    pub use_underbase: bool,
    pub highlight_white: bool,
    /// Mask edge softness, 0.0 (hard) ..= 1.0 (soft)
    pub softness: f32,
    pub ink_type: InkType,
    pub fabric_type: FabricType,
    pub fabric_color: Srgb,
    /// When set, replaces palette extraction.
    pub custom_colors: Option<Vec<Srgb>>,
    pub adjustment: Option<ColorAdjustment>,
    /// Halftone preview screen frequency, 20..=85
    pub halftone_frequency: f32,
    /// Channels below this coverage fraction are dropped, 0.001..=0.1
    pub min_ink_coverage: f32,
    /// Signed trap in pixels: negative chokes, positive spreads
    pub trap: f32,
    /// Minimum printable dot, 3..=10
    pub min_dot: u8,
    pub match_reference: bool,
}

impl SeparationRequest {
    pub fn builder(image: RgbImage) -> SeparationRequestBuilder {
        SeparationRequestBuilder {
            request: SeparationRequest {
                image,
                method: SeparationMethod::default(),
                target_count: 8,
                use_underbase: true,
                highlight_white: false,
                softness: 0.6,
                ink_type: InkType::default(),
                fabric_type: FabricType::default(),
                fabric_color: Srgb::BLACK,
                custom_colors: None,
                adjustment: None,
                halftone_frequency: 45.0,
                min_ink_coverage: 0.02,
                trap: 0.5,
                min_dot: 5,
                match_reference: false,
            },
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        if self.image.width() == 0 || self.image.height() == 0 {
            return Err(InputError::EmptyImage);
        }
        InputError::check_range(
            "max_colors",
            self.target_count as f64,
            MIN_TARGET_COUNT as f64,
            MAX_TARGET_COUNT as f64,
        )?;
        InputError::check_range("softness", self.softness as f64, 0.0, 1.0)?;
        InputError::check_range(
            "halftone_frequency",
            self.halftone_frequency as f64,
            20.0,
            85.0,
        )?;
        InputError::check_range("min_ink_coverage", self.min_ink_coverage as f64, 0.001, 0.1)?;
        InputError::check_range("choke_spread", self.trap as f64, -5.0, 5.0)?;
        InputError::check_range("min_dot", self.min_dot as f64, 3.0, 10.0)?;

        if let Some(colors) = &self.custom_colors {
            if colors.len() > MAX_CUSTOM_COLORS {
                return Err(InputError::TooManyColors {
                    count: colors.len(),
                    max: MAX_CUSTOM_COLORS,
                });
            }
        }
        if let Some(adj) = &self.adjustment {
            adj.validate()?;
        }
        Ok(())
    }

    /// True when an underbase channel should be built.
    pub fn wants_underbase(&self) -> bool {
        self.use_underbase && self.fabric_color != Srgb::WHITE
    }
}

/// Fluent builder for [`SeparationRequest`].
///
/// ```
/// use image::RgbImage;
/// use ink_separation::{SeparationMethod, SeparationRequest};
///
/// let request = SeparationRequest::builder(RgbImage::new(8, 8))
///     .method(SeparationMethod::MedianCut)
///     .target_count(4)
///     .softness(0.0)
///     .build()
///     .unwrap();
/// assert_eq!(request.target_count, 4);
/// ```
#[derive(Debug, Clone)]
pub struct SeparationRequestBuilder {
    request: SeparationRequest,
}

impl SeparationRequestBuilder {
    #[inline]
    pub fn method(mut self, method: SeparationMethod) -> Self {
        self.request.method = method;
        self
    }

    #[inline]
    pub fn target_count(mut self, count: usize) -> Self {
        self.request.target_count = count;
        self
    }

    #[inline]
    pub fn underbase(mut self, enabled: bool) -> Self {
        self.request.use_underbase = enabled;
        self
    }

    #[inline]
    pub fn highlight_white(mut self, enabled: bool) -> Self {
        self.request.highlight_white = enabled;
        self
    }

    #[inline]
    pub fn softness(mut self, softness: f32) -> Self {
        self.request.softness = softness;
        self
    }

    #[inline]
    pub fn ink_type(mut self, ink: InkType) -> Self {
        self.request.ink_type = ink;
        self
    }

    #[inline]
    pub fn fabric_type(mut self, fabric: FabricType) -> Self {
        self.request.fabric_type = fabric;
        self
    }

    #[inline]
    pub fn fabric_color(mut self, color: Srgb) -> Self {
        self.request.fabric_color = color;
        self
    }

    pub fn custom_colors(mut self, colors: Vec<Srgb>) -> Self {
        self.request.custom_colors = (!colors.is_empty()).then_some(colors);
        self
    }

    pub fn adjustment(mut self, adjustment: ColorAdjustment) -> Self {
        self.request.adjustment = Some(adjustment);
        self
    }

    #[inline]
    pub fn halftone_frequency(mut self, frequency: f32) -> Self {
        self.request.halftone_frequency = frequency;
        self
    }

    #[inline]
    pub fn min_ink_coverage(mut self, fraction: f32) -> Self {
        self.request.min_ink_coverage = fraction;
        self
    }

    #[inline]
    pub fn trap(mut self, amount: f32) -> Self {
        self.request.trap = amount;
        self
    }

    #[inline]
    pub fn min_dot(mut self, min_dot: u8) -> Self {
        self.request.min_dot = min_dot;
        self
    }

    #[inline]
    pub fn match_reference(mut self, enabled: bool) -> Self {
        self.request.match_reference = enabled;
        self
    }

    /// Validate and return the request.
    pub fn build(self) -> Result<SeparationRequest, InputError> {
        self.request.validate()?;
        Ok(self.request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> SeparationRequestBuilder {
        SeparationRequest::builder(RgbImage::new(4, 4))
    }

    #[test]
    fn test_defaults() {
        let r = builder().build().unwrap();
        assert_eq!(r.method, SeparationMethod::GradientAware);
        assert_eq!(r.target_count, 8);
        assert!(r.use_underbase && !r.highlight_white);
        assert_eq!(r.softness, 0.6);
        assert_eq!(r.fabric_color, Srgb::BLACK);
        assert_eq!(r.halftone_frequency, 45.0);
        assert_eq!(r.min_ink_coverage, 0.02);
        assert_eq!(r.trap, 0.5);
        assert_eq!(r.min_dot, 5);
        assert!(r.wants_underbase());
    }

    #[test]
    fn test_rejects_out_of_range_fields() {
        assert!(builder().target_count(1).build().is_err());
        assert!(builder().target_count(21).build().is_err());
        assert!(builder().softness(1.1).build().is_err());
        assert!(builder().halftone_frequency(19.0).build().is_err());
        assert!(builder().min_ink_coverage(0.5).build().is_err());
        assert!(builder().trap(-5.5).build().is_err());
        assert!(builder().min_dot(2).build().is_err());
        assert!(builder().min_dot(11).build().is_err());
        assert!(builder().trap(-5.0).min_dot(10).build().is_ok());
    }

    #[test]
    fn test_rejects_empty_image_and_bad_adjustment() {
        let err = SeparationRequest::builder(RgbImage::new(0, 3)).build().unwrap_err();
        assert!(matches!(err, InputError::EmptyImage));

        let adj = ColorAdjustment::new().levels(200, 100, 1.0);
        assert!(matches!(
            builder().adjustment(adj).build(),
            Err(InputError::InvalidLevels { .. })
        ));
    }

    #[test]
    fn test_custom_color_limit() {
        let err = builder()
            .custom_colors(vec![Srgb::WHITE; 21])
            .build()
            .unwrap_err();
        assert!(matches!(err, InputError::TooManyColors { count: 21, max: 20 }));
        assert!(builder().custom_colors(vec![]).build().unwrap().custom_colors.is_none());
    }

    #[test]
    fn test_white_fabric_never_gets_underbase() {
        let r = builder().fabric_color(Srgb::WHITE).build().unwrap();
        assert!(!r.wants_underbase());
    }
}
