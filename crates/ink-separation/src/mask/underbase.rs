//! White underbase synthesis.

use image::GrayImage;
use imageproc::filter::gaussian_blur_f32;
use imageproc::region_labelling::{connected_components, Connectivity};

use super::morphology::dilate_square;
use super::spread::{spread_factor, FabricType, InkType};
use crate::color::LabImage;

/// Components (and holes) smaller than this are cleaned away.
pub const MIN_REGION_AREA: usize = 100;

/// Gaussian σ matching an 11-pixel adaptive-threshold block.
const ADAPTIVE_SIGMA: f32 = 2.0;
const ADAPTIVE_OFFSET: i16 = 2;
const SOFTEN_SIGMA: f32 = 0.5;

/// Underbase mask from the lightness plane.
///
/// Lightness is thresholded against its Gaussian-weighted local mean,
/// speckles and pinholes below [`MIN_REGION_AREA`] are removed, the
/// edges are softened, and the result is spread for inks that bleed on
/// the chosen fabric.
pub fn underbase_mask(image: &LabImage, ink: InkType, fabric: FabricType) -> GrayImage {
    let lightness = image.lightness_u8();
    let local_mean = gaussian_blur_f32(&lightness, ADAPTIVE_SIGMA);

    let mut binary = GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let v = lightness.get_pixel(x, y).0[0] as i16;
        let t = local_mean.get_pixel(x, y).0[0] as i16 - ADAPTIVE_OFFSET;
        image::Luma([if v > t { 255 } else { 0 }])
    });

    remove_small_regions(&mut binary, 255, MIN_REGION_AREA);
    remove_small_regions(&mut binary, 0, MIN_REGION_AREA);

    let soft = gaussian_blur_f32(&binary, SOFTEN_SIGMA);

    let factor = spread_factor(ink, fabric);
    if factor > 1.0 {
        dilate_square(&soft, factor as u32)
    } else {
        soft
    }
}

/// Flip 4-connected regions of value `value` smaller than `min_area` to
/// the opposite binary value. With `value = 255` this removes small
/// objects; with `value = 0` it fills small holes.
pub fn remove_small_regions(mask: &mut GrayImage, value: u8, min_area: usize) {
    let background = image::Luma([255 - value]);
    let foreground = GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
        if mask.get_pixel(x, y).0[0] == value {
            image::Luma([255])
        } else {
            image::Luma([0])
        }
    });
    let labels = connected_components(&foreground, Connectivity::Four, image::Luma([0u8]));

    let mut areas: Vec<usize> = Vec::new();
    for l in labels.pixels() {
        let id = l.0[0] as usize;
        if id == 0 {
            continue;
        }
        if areas.len() <= id {
            areas.resize(id + 1, 0);
        }
        areas[id] += 1;
    }

    for (px, l) in mask.pixels_mut().zip(labels.pixels()) {
        let id = l.0[0] as usize;
        if id != 0 && areas[id] < min_area {
            *px = background;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_remove_small_objects() {
        let mut m = GrayImage::new(30, 30);
        // 3x3 speck
        for y in 2..5 {
            for x in 2..5 {
                m.put_pixel(x, y, image::Luma([255]));
            }
        }
        // 12x12 block
        for y in 15..27 {
            for x in 15..27 {
                m.put_pixel(x, y, image::Luma([255]));
            }
        }
        remove_small_regions(&mut m, 255, MIN_REGION_AREA);
        assert_eq!(m.get_pixel(3, 3).0[0], 0);
        assert_eq!(m.get_pixel(20, 20).0[0], 255);
    }

    #[test]
    fn test_fill_small_holes() {
        let mut m = GrayImage::from_pixel(30, 30, image::Luma([255]));
        m.put_pixel(10, 10, image::Luma([0]));
        remove_small_regions(&mut m, 0, MIN_REGION_AREA);
        assert_eq!(m.get_pixel(10, 10).0[0], 255);
    }

    #[test]
    fn test_uniform_image_gets_full_underbase() {
        let img = RgbImage::from_pixel(24, 24, image::Rgb([120, 60, 200]));
        let mask = underbase_mask(&LabImage::from_rgb(&img), InkType::Plastisol, FabricType::Cotton);
        assert_eq!(mask.dimensions(), (24, 24));
        assert!(mask.pixels().all(|p| p.0[0] > 200));
    }
}
