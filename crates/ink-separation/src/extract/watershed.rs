//! Watershed segmentation over the lightness gradient.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use image::RgbImage;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

use super::{ExtractionError, PaletteExtractor};
use crate::color::{Lab, LabImage};

/// Minimum spacing between seeds, and the width of the excluded border.
const SEED_SPACING: u32 = 20;

/// Regions at or below this many pixels contribute no color.
const MIN_REGION_AREA: usize = 100;

/// Floods the lightness gradient from the flattest points of the image and
/// emits the mean color of each sizeable region, in seed order.
pub struct Watershed;

impl PaletteExtractor for Watershed {
    fn name(&self) -> &'static str {
        "watershed"
    }

    fn extract(&self, image: &RgbImage, target_count: usize) -> Result<Vec<Lab>, ExtractionError> {
        let lab = LabImage::from_rgb(image);
        let gradient = gradient_magnitude(&lab);
        let (width, height) = (lab.width(), lab.height());

        let seeds = find_seeds(&gradient, width, height, target_count * 3);
        if seeds.is_empty() {
            return Err(ExtractionError::Degenerate(format!(
                "no watershed seeds in a {width}x{height} image"
            )));
        }

        let labels = flood(&gradient, width, height, &seeds);
        Ok(region_means(&lab, &labels, seeds.len())
            .into_iter()
            .take(target_count)
            .collect())
    }
}

fn gradient_magnitude(lab: &LabImage) -> Vec<f32> {
    let lightness = lab.lightness_u8();
    let gx = horizontal_sobel(&lightness);
    let gy = vertical_sobel(&lightness);
    gx.as_raw()
        .iter()
        .zip(gy.as_raw())
        .map(|(&x, &y)| {
            let (x, y) = (f32::from(x), f32::from(y));
            (x * x + y * y).sqrt()
        })
        .collect()
}

/// Local maxima of the negated gradient, flattest first, spaced more than
/// [`SEED_SPACING`] apart.
fn find_seeds(gradient: &[f32], width: u32, height: u32, max_seeds: usize) -> Vec<usize> {
    let r = SEED_SPACING;
    if width <= 2 * r || height <= 2 * r || max_seeds == 0 {
        return Vec::new();
    }

    let flatness: Vec<f32> = gradient.iter().map(|g| -g).collect();
    let window_max = max_filter(&flatness, width as usize, height as usize, r as usize);

    let mut candidates: Vec<usize> = (r..height - r)
        .flat_map(|y| (r..width - r).map(move |x| (y * width + x) as usize))
        .filter(|&i| flatness[i] >= window_max[i])
        .collect();
    candidates.sort_by(|&a, &b| flatness[b].total_cmp(&flatness[a]));

    let w = width as usize;
    let mut seeds: Vec<usize> = Vec::new();
    for i in candidates {
        let (x, y) = (i % w, i / w);
        let spaced = seeds.iter().all(|&s| {
            let (sx, sy) = (s % w, s / w);
            x.abs_diff(sx).max(y.abs_diff(sy)) > r as usize
        });
        if spaced {
            seeds.push(i);
            if seeds.len() == max_seeds {
                break;
            }
        }
    }
    seeds
}

/// Separable maximum over a `(2r+1)²` window, clipped at the image edge.
fn max_filter(values: &[f32], width: usize, height: usize, r: usize) -> Vec<f32> {
    let mut rows = vec![f32::NEG_INFINITY; values.len()];
    for y in 0..height {
        let row = &values[y * width..(y + 1) * width];
        for x in 0..width {
            let lo = x.saturating_sub(r);
            let hi = (x + r).min(width - 1);
            rows[y * width + x] = row[lo..=hi].iter().copied().fold(f32::NEG_INFINITY, f32::max);
        }
    }

    let mut out = vec![f32::NEG_INFINITY; values.len()];
    for x in 0..width {
        for y in 0..height {
            let lo = y.saturating_sub(r);
            let hi = (y + r).min(height - 1);
            out[y * width + x] = (lo..=hi)
                .map(|yy| rows[yy * width + x])
                .fold(f32::NEG_INFINITY, f32::max);
        }
    }
    out
}

/// Priority-flood on 4-connectivity. Labels are 1-based seed indices.
fn flood(gradient: &[f32], width: u32, height: u32, seeds: &[usize]) -> Vec<u32> {
    let (w, h) = (width as usize, height as usize);
    let mut labels = vec![0u32; w * h];
    // Gradient magnitudes are non-negative, so their bit patterns order
    // the same way as the values. The counter keeps equal levels FIFO.
    let mut queue = BinaryHeap::new();
    let mut counter = 0u64;

    for (n, &i) in seeds.iter().enumerate() {
        labels[i] = n as u32 + 1;
        queue.push(Reverse((gradient[i].to_bits(), counter, i)));
        counter += 1;
    }

    while let Some(Reverse((_, _, i))) = queue.pop() {
        let label = labels[i];
        let (x, y) = (i % w, i / w);
        let neighbours = [
            (x > 0).then(|| i - 1),
            (x + 1 < w).then(|| i + 1),
            (y > 0).then(|| i - w),
            (y + 1 < h).then(|| i + w),
        ];
        for j in neighbours.into_iter().flatten() {
            if labels[j] == 0 {
                labels[j] = label;
                queue.push(Reverse((gradient[j].to_bits(), counter, j)));
                counter += 1;
            }
        }
    }
    labels
}

fn region_means(lab: &LabImage, labels: &[u32], regions: usize) -> Vec<Lab> {
    let mut sums = vec![[0f64; 3]; regions + 1];
    let mut counts = vec![0usize; regions + 1];
    for (px, &label) in lab.pixels().iter().zip(labels) {
        let k = label as usize;
        sums[k][0] += f64::from(px.l);
        sums[k][1] += f64::from(px.a);
        sums[k][2] += f64::from(px.b);
        counts[k] += 1;
    }

    (1..=regions)
        .filter(|&k| counts[k] > MIN_REGION_AREA)
        .map(|k| {
            let n = counts[k] as f64;
            Lab::new(
                (sums[k][0] / n) as f32,
                (sums[k][1] / n) as f32,
                (sums[k][2] / n) as f32,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Srgb;
    use image::Rgb;

    #[test]
    fn test_small_image_is_degenerate() {
        let image = RgbImage::from_pixel(30, 30, Rgb([128, 128, 128]));
        let err = Watershed.extract(&image, 4).unwrap_err();
        assert!(matches!(err, ExtractionError::Degenerate(_)));
    }

    #[test]
    fn test_seeds_are_spaced() {
        let (w, h) = (120u32, 90u32);
        let gradient = vec![0.0; (w * h) as usize];
        let seeds = find_seeds(&gradient, w, h, 100);
        assert!(!seeds.is_empty());
        for (n, &a) in seeds.iter().enumerate() {
            let (ax, ay) = (a % w as usize, a / w as usize);
            assert!(ax >= 20 && ax < 100 && ay >= 20 && ay < 70);
            for &b in &seeds[n + 1..] {
                let (bx, by) = (b % w as usize, b / w as usize);
                assert!(ax.abs_diff(bx).max(ay.abs_diff(by)) > 20);
            }
        }
    }

    #[test]
    fn test_flood_labels_every_pixel() {
        let (w, h) = (50u32, 50u32);
        let gradient: Vec<f32> = (0..w * h).map(|i| (i % 7) as f32).collect();
        let labels = flood(&gradient, w, h, &[0, 2499]);
        assert!(labels.iter().all(|&l| l == 1 || l == 2));
    }

    #[test]
    fn test_two_halves_give_two_colors() {
        let red = Srgb::new(220, 30, 30);
        let blue = Srgb::new(30, 30, 220);
        let image = RgbImage::from_fn(120, 60, |x, _| {
            if x < 60 {
                Rgb::from(red)
            } else {
                Rgb::from(blue)
            }
        });

        let colors = Watershed.extract(&image, 4).unwrap();
        assert!(!colors.is_empty() && colors.len() <= 4);
        let near = |target: Srgb| {
            let t = Lab::from(target);
            colors.iter().any(|c| c.distance(&t) < 5.0)
        };
        assert!(near(red));
        assert!(near(blue));
    }
}
