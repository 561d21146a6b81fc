//! Ordered tone stages.

use image::RgbImage;
use rayon::prelude::*;

use super::histogram::Histogram;
use super::options::ColorAdjustment;
use crate::color::{hsv_to_rgb, rgb_to_hsv};

/// Apply `adj` to a copy of `image`.
///
/// Stages run in fixed order and each one is skipped entirely when its
/// parameters are neutral.
pub fn apply_adjustments(image: &RgbImage, adj: &ColorAdjustment) -> RgbImage {
    let mut out = image.clone();

    if adj.levels_active() {
        apply_lut(&mut out, &levels_lut(adj.input_black, adj.input_white, adj.gamma));
    }
    if let Some(points) = adj.curves.as_deref().filter(|_| adj.curves_active()) {
        apply_lut(&mut out, &curves_lut(points));
    }
    if adj.brightness_contrast_active() {
        apply_lut(&mut out, &brightness_contrast_lut(adj.brightness, adj.contrast));
    }
    if adj.hsl_active() {
        apply_hsl(&mut out, adj.hue, adj.saturation, adj.lightness);
    }
    if adj.balance_active() {
        apply_balance(&mut out, [adj.cyan_red, adj.magenta_green, adj.yellow_blue]);
    }

    out
}

/// Apply adjustments and return the adjusted image with its histogram.
pub fn adjust(image: &RgbImage, adj: &ColorAdjustment) -> (RgbImage, Histogram) {
    let adjusted = apply_adjustments(image, adj);
    let histogram = Histogram::of(&adjusted);
    (adjusted, histogram)
}

fn apply_lut(image: &mut RgbImage, lut: &[u8; 256]) {
    for v in image.iter_mut() {
        *v = lut[*v as usize];
    }
}

fn levels_lut(black: u8, white: u8, gamma: f32) -> [u8; 256] {
    let range = (white as f32 - black as f32).max(1.0);
    let inv_gamma = 1.0 / gamma;
    std::array::from_fn(|i| {
        let t = ((i as f32 - black as f32) / range).clamp(0.0, 1.0);
        (t.powf(inv_gamma) * 255.0) as u8
    })
}

fn curves_lut(points: &[(i32, i32)]) -> [u8; 256] {
    let mut sorted = points.to_vec();
    sorted.sort_by_key(|p| p.0);

    let (first, last) = (sorted[0], sorted[sorted.len() - 1]);
    std::array::from_fn(|i| {
        let x = i as i32;
        let y = if x <= first.0 {
            first.1 as f32
        } else if x >= last.0 {
            last.1 as f32
        } else {
            sorted
                .windows(2)
                .find(|w| w[0].0 <= x && x <= w[1].0)
                .map(|w| {
                    let (x1, y1) = w[0];
                    let (x2, y2) = w[1];
                    let t = if x2 != x1 {
                        (x - x1) as f32 / (x2 - x1) as f32
                    } else {
                        0.0
                    };
                    y1 as f32 + t * (y2 - y1) as f32
                })
                .unwrap_or(last.1 as f32)
        };
        y.clamp(0.0, 255.0) as u8
    })
}

fn brightness_contrast_lut(brightness: f32, contrast: f32) -> [u8; 256] {
    let b = brightness / 100.0;
    let c = contrast / 100.0;
    let factor = (259.0 * (c + 1.0)) / (259.0 - c);
    std::array::from_fn(|i| {
        let v = i as f32 / 255.0 + b;
        let v = factor * (v - 0.5) + 0.5;
        (v * 255.0).clamp(0.0, 255.0) as u8
    })
}

fn apply_hsl(image: &mut RgbImage, hue: f32, saturation: f32, lightness: f32) {
    let sat_factor = 1.0 + saturation / 100.0;
    let light_factor = 1.0 + lightness / 100.0;

    let raw: &mut [u8] = image;
    raw.par_chunks_exact_mut(3).for_each(|px| {
        let (h, s, v) = rgb_to_hsv(
            px[0] as f32 / 255.0,
            px[1] as f32 / 255.0,
            px[2] as f32 / 255.0,
        );
        let h = (h + hue).rem_euclid(360.0);
        let s = (s * sat_factor).clamp(0.0, 1.0);
        let v = (v * light_factor).clamp(0.0, 1.0);
        let (r, g, b) = hsv_to_rgb(h, s, v);
        px[0] = (r * 255.0).round() as u8;
        px[1] = (g * 255.0).round() as u8;
        px[2] = (b * 255.0).round() as u8;
    });
}

fn apply_balance(image: &mut RgbImage, shifts: [f32; 3]) {
    let luts: [[u8; 256]; 3] = shifts.map(|shift| {
        std::array::from_fn(|i| (i as f32 + shift * 2.55).clamp(0.0, 255.0) as u8)
    });
    for px in image.pixels_mut() {
        for (c, lut) in px.0.iter_mut().zip(&luts) {
            *c = lut[*c as usize];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_image() -> RgbImage {
        RgbImage::from_fn(16, 16, |x, y| {
            image::Rgb([(x * 16) as u8, (y * 16) as u8, ((x + y) * 8) as u8])
        })
    }

    #[test]
    fn test_neutral_is_identity() {
        let img = gradient_image();
        let out = apply_adjustments(&img, &ColorAdjustment::default());
        assert_eq!(out, img);
    }

    #[test]
    fn test_levels_remaps_black_and_white() {
        let lut = levels_lut(50, 200, 1.0);
        assert_eq!(lut[0], 0);
        assert_eq!(lut[50], 0);
        assert_eq!(lut[200], 255);
        assert_eq!(lut[255], 255);
        assert!(lut[125] > 120 && lut[125] < 135);
    }

    #[test]
    fn test_gamma_brightens_midtones() {
        let lut = levels_lut(0, 255, 2.0);
        assert!(lut[64] > 64);
        assert_eq!(lut[255], 255);
    }

    #[test]
    fn test_curves_hold_endpoints_flat() {
        let lut = curves_lut(&[(200, 250), (50, 10)]);
        assert_eq!(lut[0], 10);
        assert_eq!(lut[50], 10);
        assert_eq!(lut[200], 250);
        assert_eq!(lut[255], 250);
        assert_eq!(lut[125], 130);
    }

    #[test]
    fn test_brightness_shifts_up() {
        let lut = brightness_contrast_lut(20.0, 0.0);
        assert!((50..=51).contains(&lut[0]));
        assert_eq!(lut[255], 255);
    }

    #[test]
    fn test_contrast_pivots_on_midpoint() {
        let lut = brightness_contrast_lut(0.0, 100.0);
        assert!(lut[64] < 64);
        assert!(lut[192] > 192);
    }

    #[test]
    fn test_hue_rotation_red_to_green() {
        let img = RgbImage::from_pixel(2, 2, image::Rgb([255, 0, 0]));
        let out = apply_adjustments(&img, &ColorAdjustment::new().hsl(120.0, 0.0, 0.0));
        assert_eq!(out.get_pixel(0, 0).0, [0, 255, 0]);
    }

    #[test]
    fn test_desaturate_to_gray() {
        let img = RgbImage::from_pixel(1, 1, image::Rgb([200, 100, 50]));
        let out = apply_adjustments(&img, &ColorAdjustment::new().hsl(0.0, -100.0, 0.0));
        let [r, g, b] = out.get_pixel(0, 0).0;
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn test_color_balance_is_per_channel() {
        let img = RgbImage::from_pixel(1, 1, image::Rgb([100, 100, 100]));
        let adj = ColorAdjustment::new().color_balance(10.0, -10.0, 100.0);
        let out = apply_adjustments(&img, &adj);
        assert_eq!(out.get_pixel(0, 0).0, [125, 74, 255]);
    }

    #[test]
    fn test_adjust_returns_histogram_of_result() {
        let img = RgbImage::from_pixel(3, 3, image::Rgb([10, 10, 10]));
        let (out, hist) = adjust(&img, &ColorAdjustment::new().brightness(100.0));
        assert_eq!(out.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(hist.red[255], 9);
    }
}
