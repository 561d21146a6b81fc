//! 45° sinusoidal halftone preview.

use std::f32::consts::PI;

use image::GrayImage;
use imageproc::filter::gaussian_blur_f32;

const SCREEN_COS: f32 = 0.7071;
const SCREEN_SIN: f32 = 0.7071;
const SOFTEN_SIGMA: f32 = 0.5;

/// Threshold `mask` against a diagonal sine screen.
///
/// The screen period is `max(width, height) / frequency` pixels. A pixel
/// prints where the mask intensity (as a fraction) exceeds the local
/// screen value. The result is a preview overlay, not a printable mask.
pub fn halftone_screen(mask: &GrayImage, frequency: f32) -> GrayImage {
    let (w, h) = mask.dimensions();
    let period = w.max(h) as f32 / frequency;

    let screened = GrayImage::from_fn(w, h, |x, y| {
        let rotated = x as f32 * SCREEN_COS - y as f32 * SCREEN_SIN;
        let pattern = 0.5 + 0.5 * (2.0 * PI * rotated / period).sin();
        let level = mask.get_pixel(x, y).0[0] as f32 / 255.0;
        image::Luma([if level > pattern { 255 } else { 0 }])
    });

    gaussian_blur_f32(&screened, SOFTEN_SIGMA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_preserved() {
        let mask = GrayImage::new(31, 17);
        assert_eq!(halftone_screen(&mask, 45.0).dimensions(), (31, 17));
    }

    #[test]
    fn test_empty_mask_prints_nothing() {
        let mask = GrayImage::new(20, 20);
        let out = halftone_screen(&mask, 45.0);
        assert!(out.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn test_coverage_tracks_mask_level() {
        let light = halftone_screen(&GrayImage::from_pixel(60, 60, image::Luma([64])), 20.0);
        let heavy = halftone_screen(&GrayImage::from_pixel(60, 60, image::Luma([192])), 20.0);
        let inked = |m: &GrayImage| m.pixels().filter(|p| p.0[0] > 127).count();
        assert!(inked(&heavy) > inked(&light));
        assert!(inked(&light) > 0);
    }
}
