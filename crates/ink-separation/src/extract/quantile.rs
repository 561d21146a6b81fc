//! Quantile binning (served under the `octree` method name).

use image::RgbImage;
use tracing::debug;

use super::{
    mean_to_lab, rgb_pixels, sample_rng, sample_without_replacement, ExtractionError, MedianCut,
    PaletteExtractor,
};
use crate::color::Lab;

const MAX_SAMPLES: usize = 10_000;

/// Bins a pixel sample into `target_count` quantile bins along the RGB
/// channel with the widest range and returns each nonempty bin's mean.
///
/// When the sample cannot be split into at least one bin of nonzero width
/// the strategy falls back to [`MedianCut`].
pub struct QuantileBinning;

impl PaletteExtractor for QuantileBinning {
    fn name(&self) -> &'static str {
        "octree"
    }

    fn extract(&self, image: &RgbImage, target_count: usize) -> Result<Vec<Lab>, ExtractionError> {
        let pixels = rgb_pixels(image);
        let sample = sample_without_replacement(&pixels, MAX_SAMPLES, &mut sample_rng());

        match quantile_bins(&sample, target_count) {
            Ok(means) => Ok(means.into_iter().map(mean_to_lab).collect()),
            Err(err) => {
                debug!(error = %err, "quantile binning failed, falling back to median-cut");
                MedianCut.extract(image, target_count)
            }
        }
    }
}

fn quantile_bins(sample: &[[u8; 3]], target_count: usize) -> Result<Vec<[f32; 3]>, ExtractionError> {
    if sample.is_empty() || target_count == 0 {
        return Err(ExtractionError::Degenerate("empty sample".into()));
    }

    let channel = widest_channel(sample);
    let mut values: Vec<f32> = sample.iter().map(|px| f32::from(px[channel])).collect();
    values.sort_by(f32::total_cmp);

    let mut edges: Vec<f32> = (0..=target_count)
        .map(|k| quantile(&values, k as f32 / target_count as f32))
        .collect();
    edges.dedup();
    if edges.len() < 2 {
        return Err(ExtractionError::Degenerate(format!(
            "channel {channel} has a single value"
        )));
    }

    let bins = edges.len() - 1;
    let mut sums = vec![[0f64; 3]; bins];
    let mut counts = vec![0usize; bins];
    for px in sample {
        let v = f32::from(px[channel]);
        let bin = edges.partition_point(|e| *e <= v).saturating_sub(1).min(bins - 1);
        for c in 0..3 {
            sums[bin][c] += f64::from(px[c]);
        }
        counts[bin] += 1;
    }

    Ok(sums
        .into_iter()
        .zip(counts)
        .filter(|(_, n)| *n > 0)
        .map(|(sum, n)| sum.map(|s| (s / n as f64) as f32))
        .collect())
}

fn widest_channel(pixels: &[[u8; 3]]) -> usize {
    let mut best = 0;
    let mut best_range = 0;
    for c in 0..3 {
        let (lo, hi) = pixels
            .iter()
            .fold((u8::MAX, u8::MIN), |(lo, hi), px| (lo.min(px[c]), hi.max(px[c])));
        let range = hi.saturating_sub(lo);
        if range > best_range {
            best = c;
            best_range = range;
        }
    }
    best
}

/// Linear-interpolated quantile of sorted `values`.
fn quantile(values: &[f32], q: f32) -> f32 {
    let pos = q * (values.len() - 1) as f32;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f32;
    values[lo] + (values[hi] - values[lo]) * frac
}
