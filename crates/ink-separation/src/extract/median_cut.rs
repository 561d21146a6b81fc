//! Median-cut quantization.

use image::RgbImage;

use super::{mean_to_lab, rgb_pixels, ExtractionError, PaletteExtractor};
use crate::color::Lab;

/// Recursive bisection of the pixel population.
///
/// Each node is split at its median along the RGB channel with the widest
/// range, to a depth of `⌈log2(target_count)⌉`. Leaves are emitted left to
/// right as their mean color. Fully deterministic.
pub struct MedianCut;

impl PaletteExtractor for MedianCut {
    fn name(&self) -> &'static str {
        "median_cut"
    }

    fn extract(&self, image: &RgbImage, target_count: usize) -> Result<Vec<Lab>, ExtractionError> {
        Ok(median_cut_means(rgb_pixels(image), target_count)
            .into_iter()
            .map(mean_to_lab)
            .take(target_count)
            .collect())
    }
}

/// Leaf means (RGB, 0..=255) of a median-cut over `pixels`.
pub(crate) fn median_cut_means(pixels: Vec<[u8; 3]>, target_count: usize) -> Vec<[f32; 3]> {
    let mut leaves = Vec::new();
    if pixels.is_empty() || target_count == 0 {
        return leaves;
    }
    split(pixels, depth_for(target_count), &mut leaves);
    leaves
}

fn depth_for(target_count: usize) -> u32 {
    let n = target_count.max(1) - 1;
    usize::BITS - n.leading_zeros()
}

fn split(mut bucket: Vec<[u8; 3]>, depth: u32, leaves: &mut Vec<[f32; 3]>) {
    if bucket.is_empty() {
        return;
    }

    let ranges = channel_ranges(&bucket);
    let mut widest = 0;
    for c in 1..3 {
        if ranges[c] > ranges[widest] {
            widest = c;
        }
    }

    if depth == 0 || bucket.len() <= 1 || ranges[widest] == 0 {
        leaves.push(mean(&bucket));
        return;
    }

    bucket.sort_by_key(|px| px[widest]);
    let upper = bucket.split_off(bucket.len() / 2);
    split(bucket, depth - 1, leaves);
    split(upper, depth - 1, leaves);
}

fn channel_ranges(pixels: &[[u8; 3]]) -> [u8; 3] {
    let mut lo = [u8::MAX; 3];
    let mut hi = [u8::MIN; 3];
    for px in pixels {
        for c in 0..3 {
            lo[c] = lo[c].min(px[c]);
            hi[c] = hi[c].max(px[c]);
        }
    }
    [hi[0] - lo[0], hi[1] - lo[1], hi[2] - lo[2]]
}

fn mean(pixels: &[[u8; 3]]) -> [f32; 3] {
    let mut sum = [0u64; 3];
    for px in pixels {
        for c in 0..3 {
            sum[c] += u64::from(px[c]);
        }
    }
    let n = pixels.len() as f64;
    sum.map(|s| (s as f64 / n) as f32)
}
