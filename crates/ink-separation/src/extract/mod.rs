//! Palette extraction strategies.
//!
//! Every strategy reduces an RGB image to at most `target_count`
//! representative colors in Lab, ordered by importance as the strategy
//! sees it. All strategies implement [`PaletteExtractor`], so the
//! orchestrator never needs to know which one it is driving.
//!
//! | Method | Strategy | Notes |
//! |---|---|---|
//! | `gradient_aware` | [`GradientAware`] | flat regions via median-cut, gradients via mean-shift |
//! | `median_cut` | [`MedianCut`] | deterministic recursive bisection |
//! | `watershed` | [`Watershed`] | flood from flat seeds, one color per region |
//! | `simulated_process` | [`SimulatedProcess`] | fixed 11-ink palette |
//! | `octree` | [`QuantileBinning`] | quantile bins, falls back to median-cut |
//!
//! # Example
//!
//! ```
//! use image::{Rgb, RgbImage};
//! use ink_separation::{PaletteExtractor, SeparationMethod};
//!
//! let img = RgbImage::from_fn(16, 16, |x, _| if x < 8 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) });
//! let colors = SeparationMethod::MedianCut.extractor().extract(&img, 2).unwrap();
//! assert_eq!(colors.len(), 2);
//! ```

mod gradient_aware;
mod mean_shift;
mod median_cut;
mod quantile;
mod simulated;
mod watershed;

pub use gradient_aware::GradientAware;
pub use median_cut::MedianCut;
pub use quantile::QuantileBinning;
pub use simulated::{SimulatedProcess, SIMULATED_PROCESS_INKS};
pub use watershed::Watershed;

pub(crate) use median_cut::median_cut_means;

use image::RgbImage;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;

use crate::color::Lab;
use crate::mask::MaskError;

/// Upper bound on user-supplied palettes.
pub const MAX_CUSTOM_COLORS: usize = 20;

/// Seed for every sampling step, so repeated runs agree.
const SAMPLE_SEED: u64 = 42;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("degenerate input: {0}")]
    Degenerate(String),

    #[error(transparent)]
    Mask(#[from] MaskError),
}

/// A palette extraction strategy.
pub trait PaletteExtractor: Send + Sync {
    /// Wire name of the strategy, used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Reduce `image` to at most `target_count` colors.
    fn extract(&self, image: &RgbImage, target_count: usize) -> Result<Vec<Lab>, ExtractionError>;
}

/// Extraction method selected by a request.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SeparationMethod {
    #[default]
    GradientAware,
    MedianCut,
    Watershed,
    SimulatedProcess,
    Octree,
}

impl SeparationMethod {
    /// The strategy implementing this method.
    pub fn extractor(self) -> Box<dyn PaletteExtractor> {
        match self {
            SeparationMethod::GradientAware => Box::new(GradientAware),
            SeparationMethod::MedianCut => Box::new(MedianCut),
            SeparationMethod::Watershed => Box::new(Watershed),
            SeparationMethod::SimulatedProcess => Box::new(SimulatedProcess),
            SeparationMethod::Octree => Box::new(QuantileBinning),
        }
    }

    /// Whether channels from this method carry a halftone preview.
    pub fn halftone(self) -> bool {
        matches!(
            self,
            SeparationMethod::GradientAware | SeparationMethod::Octree
        )
    }

    pub fn description(self) -> &'static str {
        match self {
            SeparationMethod::GradientAware => {
                "Spot colors for flat regions plus mean-shift modes for smooth gradients"
            }
            SeparationMethod::MedianCut => "Deterministic median-cut quantization",
            SeparationMethod::Watershed => "One color per flat region found by watershed flooding",
            SeparationMethod::SimulatedProcess => {
                "Fixed 11-ink palette for full-color prints on dark garments"
            }
            SeparationMethod::Octree => "Quantile binning along the widest color channel",
        }
    }
}

/// A caller-supplied palette, passed through unchanged.
#[derive(Debug, Clone, Default)]
pub struct CustomPalette(pub Vec<Lab>);

impl PaletteExtractor for CustomPalette {
    fn name(&self) -> &'static str {
        "custom"
    }

    fn extract(&self, _image: &RgbImage, _target_count: usize) -> Result<Vec<Lab>, ExtractionError> {
        Ok(self.0.iter().copied().take(MAX_CUSTOM_COLORS).collect())
    }
}

pub(crate) fn sample_rng() -> StdRng {
    StdRng::seed_from_u64(SAMPLE_SEED)
}

/// Pick at most `max` items without replacement, keeping their original
/// relative order.
pub(crate) fn sample_without_replacement<T: Copy>(items: &[T], max: usize, rng: &mut StdRng) -> Vec<T> {
    if items.len() <= max {
        return items.to_vec();
    }
    let mut picked = rand::seq::index::sample(rng, items.len(), max).into_vec();
    picked.sort_unstable();
    picked.into_iter().map(|i| items[i]).collect()
}

pub(crate) fn rgb_pixels(image: &RgbImage) -> Vec<[u8; 3]> {
    image
        .as_raw()
        .chunks_exact(3)
        .map(|px| [px[0], px[1], px[2]])
        .collect()
}

pub(crate) fn mean_to_lab(mean: [f32; 3]) -> Lab {
    Lab::from_unit_rgb(mean.map(|c| c / 255.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use strum::IntoEnumIterator;

    #[test]
    fn test_method_names_round_trip_through_strum_and_serde() {
        for method in SeparationMethod::iter() {
            let name: &'static str = method.into();
            assert_eq!(name.parse::<SeparationMethod>().unwrap(), method);
            let json = serde_json::to_string(&method).unwrap();
            assert_eq!(json, format!("\"{name}\""));
        }
        assert_eq!(SeparationMethod::default(), SeparationMethod::GradientAware);
        assert!("kmeans".parse::<SeparationMethod>().is_err());
    }

    #[test]
    fn test_extractor_names_match_wire_names() {
        assert_eq!(SeparationMethod::MedianCut.extractor().name(), "median_cut");
        assert_eq!(SeparationMethod::Octree.extractor().name(), "octree");
        assert_eq!(
            SeparationMethod::SimulatedProcess.extractor().name(),
            "simulated_process"
        );
    }

    #[test]
    fn test_halftone_methods() {
        let with: Vec<_> = SeparationMethod::iter().filter(|m| m.halftone()).collect();
        assert_eq!(
            with,
            vec![SeparationMethod::GradientAware, SeparationMethod::Octree]
        );
    }

    #[test]
    fn test_custom_palette_is_truncated() {
        let colors = vec![Lab::new(50.0, 0.0, 0.0); 25];
        let image = RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]));
        let out = CustomPalette(colors).extract(&image, 4).unwrap();
        assert_eq!(out.len(), MAX_CUSTOM_COLORS);
    }

    #[test]
    fn test_sampling_is_reproducible() {
        let items: Vec<u32> = (0..1000).collect();
        let a = sample_without_replacement(&items, 50, &mut sample_rng());
        let b = sample_without_replacement(&items, 50, &mut sample_rng());
        assert_eq!(a, b);
        assert_eq!(a.len(), 50);
        assert!(a.windows(2).all(|w| w[0] < w[1]));

        let few = sample_without_replacement(&items[..10], 50, &mut sample_rng());
        assert_eq!(few.len(), 10);
    }
}
