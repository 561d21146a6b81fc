//! Painter's-algorithm preview.

use image::{Rgb, RgbImage};

use super::channel::{BlendMode, Channel};
use crate::color::Srgb;

/// Paint `channels` over a `width`×`height` fill of `fabric`.
///
/// Channels are painted in ascending `order`; non-printable channels and
/// masks whose dimensions do not match are skipped.
pub fn composite(width: u32, height: u32, fabric: Srgb, channels: &[Channel]) -> RgbImage {
    let mut canvas: Vec<[f32; 3]> = vec![fabric.to_unit(); width as usize * height as usize];

    let mut ordered: Vec<&Channel> = channels.iter().filter(|c| c.printable).collect();
    ordered.sort_by_key(|c| c.order);

    for ch in ordered {
        if ch.mask.dimensions() != (width, height) {
            continue;
        }
        let ink = ch.color.to_unit();
        for (px, m) in canvas.iter_mut().zip(ch.mask.as_raw()) {
            let alpha = f32::from(*m) / 255.0 * ch.opacity;
            for c in 0..3 {
                px[c] = match ch.blend_mode {
                    BlendMode::Normal => px[c] * (1.0 - alpha) + ink[c] * alpha,
                    BlendMode::Multiply => px[c] * (1.0 - alpha + ink[c] * alpha),
                };
            }
        }
    }

    let mut out = RgbImage::new(width, height);
    for (dst, src) in out.pixels_mut().zip(canvas) {
        *dst = Rgb(src.map(|v| (v * 255.0).clamp(0.0, 255.0) as u8));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::separate::channel::ChannelType;
    use image::GrayImage;

    fn channel(color: Srgb, value: u8, order: u32) -> Channel {
        let mut ch = Channel::new(
            "c",
            color,
            ChannelType::SpotColor,
            GrayImage::from_pixel(2, 2, image::Luma([value])),
            100.0,
        );
        ch.order = order;
        ch
    }

    #[test]
    fn test_empty_stack_is_fabric() {
        let out = composite(2, 2, Srgb::new(10, 20, 30), &[]);
        assert!(out.pixels().all(|p| p.0 == [10, 20, 30]));
    }

    #[test]
    fn test_paints_in_order() {
        let red = channel(Srgb::new(255, 0, 0), 255, 1);
        let blue = channel(Srgb::new(0, 0, 255), 255, 0);
        let out = composite(2, 2, Srgb::BLACK, &[red, blue]);
        assert_eq!(out.get_pixel(0, 0).0, [255, 0, 0]);
    }

    #[test]
    fn test_half_alpha_blends() {
        let white = channel(Srgb::WHITE, 255, 0);
        let mut half = channel(Srgb::BLACK, 255, 1);
        half.opacity = 0.5;
        let out = composite(2, 2, Srgb::BLACK, &[white, half]);
        let v = out.get_pixel(1, 1).0[0];
        assert!((126..=128).contains(&v));
    }

    #[test]
    fn test_multiply_and_skips() {
        let mut mul = channel(Srgb::new(255, 0, 0), 255, 0);
        mul.blend_mode = BlendMode::Multiply;
        let mut hidden = channel(Srgb::BLACK, 255, 1);
        hidden.printable = false;
        let wrong_size = Channel {
            mask: GrayImage::from_pixel(3, 3, image::Luma([255])),
            ..channel(Srgb::BLACK, 255, 2)
        };
        let out = composite(2, 2, Srgb::WHITE, &[mul, hidden, wrong_size]);
        assert_eq!(out.get_pixel(0, 1).0, [255, 0, 0]);
    }
}
