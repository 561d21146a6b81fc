//! Hybrid extraction that keeps flat spot colors and smooth transitions apart.

use image::{imageops, GrayImage, Luma, Rgb, RgbImage};
use imageproc::edges::canny;
use imageproc::filter::bilateral_filter;
use rayon::prelude::*;
use tracing::debug;

use super::mean_shift::{estimate_bandwidth, mean_shift};
use super::{
    mean_to_lab, median_cut_means, rgb_pixels, sample_rng, sample_without_replacement,
    ExtractionError, PaletteExtractor,
};
use crate::color::Lab;
use crate::mask::binary_dilate;

const SMOOTH_WINDOW: u32 = 4;
const SMOOTH_SIGMA: f32 = 75.0;
const CANNY_LOW: f32 = 30.0;
const CANNY_HIGH: f32 = 100.0;

/// Regions with this many pixels or fewer are ignored.
const MIN_REGION_PIXELS: usize = 100;
const MAX_GRADIENT_SAMPLES: usize = 1000;
const BANDWIDTH_QUANTILE: f32 = 0.3;

/// Colors closer than this (ΔE) to an already chosen color are skipped.
const MIN_SEPARATION: f32 = 20.0;

/// Default strategy.
///
/// Pixels near Canny edges are treated as gradient, the rest as flat.
/// Flat pixels are quantized with median-cut into `max(2, n/2)` colors;
/// gradient pixels are sampled and clustered with mean-shift. The merged
/// list is deduplicated at ΔE 20 and backfilled from a whole-image
/// median-cut when it falls short.
pub struct GradientAware;

impl PaletteExtractor for GradientAware {
    fn name(&self) -> &'static str {
        "gradient_aware"
    }

    fn extract(&self, image: &RgbImage, target_count: usize) -> Result<Vec<Lab>, ExtractionError> {
        let smoothed = smooth(image);
        let edges = binary_dilate(&canny(&imageops::grayscale(image), CANNY_LOW, CANNY_HIGH));

        let mut flat = Vec::new();
        let mut gradient = Vec::new();
        for (px, edge) in smoothed.pixels().zip(edges.pixels()) {
            if edge.0[0] > 0 {
                gradient.push(px.0);
            } else {
                flat.push(px.0);
            }
        }
        debug!(flat = flat.len(), gradient = gradient.len(), "split pixels by edge map");

        let mut candidates = flat_colors(flat, target_count);

        if gradient.len() > MIN_REGION_PIXELS && candidates.len() < target_count {
            let sample: Vec<[f32; 3]> =
                sample_without_replacement(&gradient, MAX_GRADIENT_SAMPLES, &mut sample_rng())
                    .into_iter()
                    .map(|px| px.map(f32::from))
                    .collect();
            let bandwidth = estimate_bandwidth(&sample, BANDWIDTH_QUANTILE);
            if bandwidth > 0.0 {
                let modes = mean_shift(&sample, bandwidth);
                debug!(bandwidth, modes = modes.len(), "mean-shift over gradient pixels");
                let room = target_count - candidates.len();
                candidates.extend(modes.into_iter().take(room).map(mean_to_lab));
            } else {
                debug!("gradient sample has zero bandwidth, skipping mean-shift");
            }
        }

        let mut palette = Vec::with_capacity(target_count);
        push_distinct(&mut palette, candidates);
        if palette.len() < target_count {
            let room = target_count - palette.len();
            let backfill = median_cut_means(rgb_pixels(&smoothed), target_count);
            push_distinct(&mut palette, backfill.into_iter().take(room).map(mean_to_lab));
        }
        palette.truncate(target_count);
        Ok(palette)
    }
}

/// Median-cut colors of the flat pixels, at most `max(2, n/2)`.
///
/// The median-cut tree can have more leaves than requested, so the
/// result is cut to the flat budget.
fn flat_colors(flat: Vec<[u8; 3]>, target_count: usize) -> Vec<Lab> {
    if flat.len() <= MIN_REGION_PIXELS {
        return Vec::new();
    }
    let flat_count = (target_count / 2).max(2);
    median_cut_means(flat, flat_count)
        .into_iter()
        .take(flat_count)
        .map(mean_to_lab)
        .collect()
}

fn push_distinct(palette: &mut Vec<Lab>, colors: impl IntoIterator<Item = Lab>) {
    for color in colors {
        if palette.iter().all(|kept| kept.distance(&color) >= MIN_SEPARATION) {
            palette.push(color);
        }
    }
}

/// Edge-preserving blur of each RGB plane.
fn smooth(image: &RgbImage) -> RgbImage {
    let (w, h) = image.dimensions();
    let planes: Vec<GrayImage> = (0..3usize)
        .into_par_iter()
        .map(|c| {
            let plane = GrayImage::from_fn(w, h, |x, y| Luma([image.get_pixel(x, y).0[c]]));
            bilateral_filter(&plane, SMOOTH_WINDOW, SMOOTH_SIGMA, SMOOTH_SIGMA)
        })
        .collect();

    RgbImage::from_fn(w, h, |x, y| {
        Rgb([
            planes[0].get_pixel(x, y).0[0],
            planes[1].get_pixel(x, y).0[0],
            planes[2].get_pixel(x, y).0[0],
        ])
    })
}
