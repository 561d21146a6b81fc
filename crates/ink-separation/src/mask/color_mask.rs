//! Per-color soft/hard masks.

use image::GrayImage;
use imageproc::filter::bilateral_filter;
use rayon::prelude::*;

use super::{mask_from_raw, MaskError};
use crate::color::{Lab, LabImage};

/// Edge-preserving smoothing applied to every color mask. imageproc
/// measures the window from the centre, so 4 covers 9×9.
const BILATERAL_WINDOW: u32 = 4;
const BILATERAL_SIGMA_COLOR: f32 = 75.0;
const BILATERAL_SIGMA_SPATIAL: f32 = 75.0;

/// How mask intensity falls off with normalized distance `d` from the
/// target color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeFalloff {
    /// `1 / (1 + e^(12(d - 0.4)))`
    Logistic,
    /// smoothstep of `1 - d`
    Smoothstep,
    /// `d < 0.5`
    Hard,
}

impl EdgeFalloff {
    pub fn from_softness(softness: f32) -> Self {
        if softness > 0.7 {
            EdgeFalloff::Logistic
        } else if softness > 0.3 {
            EdgeFalloff::Smoothstep
        } else {
            EdgeFalloff::Hard
        }
    }

    #[inline]
    fn weight(self, d: f32) -> f32 {
        match self {
            EdgeFalloff::Logistic => 1.0 / (1.0 + (12.0 * (d - 0.4)).exp()),
            EdgeFalloff::Smoothstep => {
                let t = (1.0 - d).clamp(0.0, 1.0);
                t * t * (3.0 - 2.0 * t)
            }
            EdgeFalloff::Hard => {
                if d < 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// Build the ink mask for `target`.
///
/// Distances are normalized by the largest distance in the image (or 1
/// when the image is uniform), shaped by the falloff chosen from
/// `softness`, scaled to 0..=255 and bilateral-filtered.
pub fn color_mask(image: &LabImage, target: &Lab, softness: f32) -> Result<GrayImage, MaskError> {
    let distances = image.distances_to(target);
    let max = distances.iter().copied().fold(0.0f32, f32::max);
    let norm = if max > 0.0 { max } else { 1.0 };
    let falloff = EdgeFalloff::from_softness(softness);

    let raw = distances
        .par_iter()
        .map(|&d| (falloff.weight(d / norm) * 255.0) as u8)
        .collect();
    let mask = mask_from_raw(image.width(), image.height(), raw)?;

    Ok(bilateral_filter(
        &mask,
        BILATERAL_WINDOW,
        BILATERAL_SIGMA_COLOR,
        BILATERAL_SIGMA_SPATIAL,
    ))
}
