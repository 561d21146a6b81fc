//! Square-kernel grayscale morphology, trapping and dot filtering.

use image::GrayImage;
use imageproc::distance_transform::Norm;

/// Mask intensity above which a pixel counts as inked.
const COVERAGE_FLOOR: u8 = 10;

/// Grayscale dilation with a `k`×`k` square.
///
/// The anchor sits at `k / 2`, so the window spans offsets
/// `-(k/2) ..= k-1-k/2` on each axis. Samples outside the image are
/// ignored. `k <= 1` returns a copy.
pub fn dilate_square(mask: &GrayImage, k: u32) -> GrayImage {
    morph_square(mask, k, u8::max)
}

/// Grayscale erosion with a `k`×`k` square. See [`dilate_square`].
pub fn erode_square(mask: &GrayImage, k: u32) -> GrayImage {
    morph_square(mask, k, u8::min)
}

fn morph_square(mask: &GrayImage, k: u32, pick: fn(u8, u8) -> u8) -> GrayImage {
    if k <= 1 {
        return mask.clone();
    }
    let (w, h) = mask.dimensions();
    let before = (k / 2) as i64;
    let after = (k - 1 - k / 2) as i64;

    let window = |center: i64, len: u32| {
        let lo = (center - before).max(0) as u32;
        let hi = (center + after).min(len as i64 - 1) as u32;
        lo..=hi
    };

    let rows = GrayImage::from_fn(w, h, |x, y| {
        let mut acc = mask.get_pixel(x, y).0[0];
        for xx in window(x as i64, w) {
            acc = pick(acc, mask.get_pixel(xx, y).0[0]);
        }
        image::Luma([acc])
    });

    GrayImage::from_fn(w, h, |x, y| {
        let mut acc = rows.get_pixel(x, y).0[0];
        for yy in window(y as i64, h) {
            acc = pick(acc, rows.get_pixel(x, yy).0[0]);
        }
        image::Luma([acc])
    })
}

/// Binary dilation by one 3×3 pass. Nonzero pixels are foreground.
pub fn binary_dilate(mask: &GrayImage) -> GrayImage {
    imageproc::morphology::dilate(mask, Norm::LInf, 1)
}

/// Choke (negative) or spread (positive) a mask by `round(|amount|)` px.
pub fn apply_trap(mask: &GrayImage, amount: f32) -> GrayImage {
    let k = amount.abs().round() as u32;
    if k == 0 {
        return mask.clone();
    }
    if amount > 0.0 {
        dilate_square(mask, k)
    } else {
        erode_square(mask, k)
    }
}

/// Zero every pixel below `min_dot * 2.55`.
pub fn apply_min_dot(mask: &mut GrayImage, min_dot: u8) {
    if min_dot == 0 {
        return;
    }
    let floor = min_dot as f32 * 2.55;
    for p in mask.pixels_mut() {
        if (p.0[0] as f32) < floor {
            p.0[0] = 0;
        }
    }
}

/// Percent of pixels with intensity above 10, rounded to 2 decimals.
pub fn coverage_percent(mask: &GrayImage) -> f64 {
    let total = mask.width() as u64 * mask.height() as u64;
    if total == 0 {
        return 0.0;
    }
    let inked = mask.pixels().filter(|p| p.0[0] > COVERAGE_FLOOR).count() as f64;
    round_to(inked / total as f64 * 100.0, 2)
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(w: u32, h: u32, x: u32, y: u32, v: u8) -> GrayImage {
        let mut m = GrayImage::new(w, h);
        m.put_pixel(x, y, image::Luma([v]));
        m
    }

    fn count_nonzero(m: &GrayImage) -> usize {
        m.pixels().filter(|p| p.0[0] > 0).count()
    }

    #[test]
    fn test_dilate_odd_kernel_is_centered() {
        let out = dilate_square(&dot(7, 7, 3, 3, 200), 3);
        assert_eq!(count_nonzero(&out), 9);
        assert_eq!(out.get_pixel(2, 2).0[0], 200);
        assert_eq!(out.get_pixel(4, 4).0[0], 200);
        assert_eq!(out.get_pixel(5, 5).0[0], 0);
    }

    #[test]
    fn test_dilate_even_kernel_anchor() {
        // k=2: anchor 1, offsets -1..=0, so a dot spreads toward +x/+y
        let out = dilate_square(&dot(5, 5, 2, 2, 90), 2);
        assert_eq!(count_nonzero(&out), 4);
        assert_eq!(out.get_pixel(3, 3).0[0], 90);
        assert_eq!(out.get_pixel(1, 1).0[0], 0);
    }

    #[test]
    fn test_erode_removes_isolated_dot() {
        let out = erode_square(&dot(5, 5, 2, 2, 255), 3);
        assert_eq!(count_nonzero(&out), 0);
    }

    #[test]
    fn test_erode_ignores_outside_samples() {
        let full = GrayImage::from_pixel(4, 4, image::Luma([255]));
        let out = erode_square(&full, 3);
        assert!(out.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn test_trap_zero_is_identity() {
        let m = GrayImage::from_fn(8, 8, |x, y| image::Luma([(x * 30 + y) as u8]));
        assert_eq!(apply_trap(&m, 0.0), m);
        assert_eq!(apply_trap(&m, 0.4), m);
        assert_eq!(apply_trap(&m, -0.4), m);
    }

    #[test]
    fn test_trap_kernel_rounds_half_up() {
        let m = GrayImage::from_fn(9, 9, |x, y| image::Luma([if (x, y) == (4, 4) { 255 } else { 0 }]));
        assert_eq!(apply_trap(&m, 1.5), dilate_square(&m, 2));
        assert_eq!(apply_trap(&m, 1.4), m);
        assert_eq!(apply_trap(&m, -2.5), erode_square(&m, 3));
    }

    #[test]
    fn test_trap_direction_is_monotonic() {
        let m = GrayImage::from_fn(12, 9, |x, y| image::Luma([((x * 37 + y * 11) % 256) as u8]));
        for amount in [1.0, 2.0, 3.0, 5.0] {
            let spread = apply_trap(&m, amount);
            let choke = apply_trap(&m, -amount);
            for ((a, s), c) in m.pixels().zip(spread.pixels()).zip(choke.pixels()) {
                assert!(s.0[0] >= a.0[0]);
                assert!(c.0[0] <= a.0[0]);
            }
        }
    }

    #[test]
    fn test_min_dot_floor() {
        let mut m = GrayImage::from_fn(4, 1, |x, _| image::Luma([[5u8, 12, 13, 200][x as usize]]));
        apply_min_dot(&mut m, 5);
        let vals: Vec<u8> = m.pixels().map(|p| p.0[0]).collect();
        assert_eq!(vals, vec![0, 0, 13, 200]);
    }

    #[test]
    fn test_coverage_counts_above_ten() {
        let m = GrayImage::from_fn(3, 1, |x, _| image::Luma([[10u8, 11, 255][x as usize]]));
        assert_eq!(coverage_percent(&m), 66.67);
    }

    #[test]
    fn test_binary_dilate_grows_by_one() {
        let out = binary_dilate(&dot(5, 5, 2, 2, 255));
        assert_eq!(count_nonzero(&out), 9);
    }
}
