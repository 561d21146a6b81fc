//! Method and color-count suggestion.

use std::collections::HashSet;

use image::{imageops, RgbImage};
use imageproc::edges::canny;
use serde::{Deserialize, Serialize};

use crate::adjust::Histogram;
use crate::extract::SeparationMethod;
use crate::mask::round_to;

const CANNY_LOW: f32 = 50.0;
const CANNY_HIGH: f32 = 150.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Analysis {
    /// Percent of pixels on a Canny edge, 1 decimal
    pub edge_density: f64,
    pub unique_colors: usize,
    pub suggested_method: SeparationMethod,
    pub suggested_colors: usize,
    /// `"{width}x{height}"`
    pub image_size: String,
    pub histogram: Histogram,
}

/// Suggest a separation method and color count for `image`.
///
/// Edge-heavy images (more than 30% edge pixels) get gradient-aware
/// separation; otherwise images with more than 100 distinct colors get
/// simulated process and the rest median-cut.
pub fn analyze_image(image: &RgbImage) -> Analysis {
    let (w, h) = image.dimensions();
    let total = (w as usize * h as usize).max(1);

    let edges = canny(&imageops::grayscale(image), CANNY_LOW, CANNY_HIGH);
    let edge_pixels = edges.pixels().filter(|p| p.0[0] > 0).count();
    let edge_fraction = edge_pixels as f64 / total as f64;

    let unique_colors = image.pixels().map(|p| p.0).collect::<HashSet<_>>().len();

    let suggested_method = if edge_fraction > 0.3 {
        SeparationMethod::GradientAware
    } else if unique_colors > 100 {
        SeparationMethod::SimulatedProcess
    } else {
        SeparationMethod::MedianCut
    };
    let suggested_colors = if unique_colors > 500 {
        8
    } else if unique_colors > 100 {
        6
    } else {
        4
    };

    Analysis {
        edge_density: round_to(edge_fraction * 100.0, 1),
        unique_colors,
        suggested_method,
        suggested_colors,
        image_size: format!("{w}x{h}"),
        histogram: Histogram::of(image),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_flat_image() {
        let image = RgbImage::from_pixel(20, 10, Rgb([50, 60, 70]));
        let a = analyze_image(&image);
        assert_eq!(a.edge_density, 0.0);
        assert_eq!(a.unique_colors, 1);
        assert_eq!(a.suggested_method, SeparationMethod::MedianCut);
        assert_eq!(a.suggested_colors, 4);
        assert_eq!(a.image_size, "20x10");
        assert_eq!(a.histogram.total(), 200);
    }

    #[test]
    fn test_many_colors_suggest_simulated_process() {
        let image = RgbImage::from_fn(64, 64, |x, y| Rgb([x as u8 * 4, y as u8 * 4, 0]));
        let a = analyze_image(&image);
        assert_eq!(a.unique_colors, 4096);
        assert_eq!(a.suggested_colors, 8);
        assert!(a.edge_density <= 30.0);
        assert_eq!(a.suggested_method, SeparationMethod::SimulatedProcess);
    }

    #[test]
    fn test_busy_image_suggests_gradient_aware() {
        // A 3px checkerboard puts about half the pixels on an edge.
        let image = RgbImage::from_fn(64, 64, |x, y| {
            if (x / 3 + y / 3) % 2 == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        let a = analyze_image(&image);
        assert!(a.edge_density > 30.0, "edge density {}", a.edge_density);
        assert_eq!(a.suggested_method, SeparationMethod::GradientAware);
    }
}
