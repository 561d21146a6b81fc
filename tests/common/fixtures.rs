//! Test fixtures: small synthetic artworks and their data-URLs.

use base64::Engine;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage, RgbaImage};

use inksep::services::rgb_data_url;

/// Left half red, right half blue
pub fn two_color(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgb([200, 30, 30])
        } else {
            Rgb([30, 30, 200])
        }
    })
}

/// A yellow disc over green, red and white blocks
pub fn blobs() -> RgbImage {
    RgbImage::from_fn(80, 80, |x, y| {
        let dx = x as i32 - 40;
        let dy = y as i32 - 40;
        if dx * dx + dy * dy < 300 {
            Rgb([240, 200, 20])
        } else if x < 20 {
            Rgb([20, 120, 60])
        } else if y > 60 {
            Rgb([200, 30, 30])
        } else {
            Rgb([255, 255, 255])
        }
    })
}

/// Smooth diagonal ramp
pub fn ramp(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width) as u8,
            (y * 255 / height) as u8,
            ((x + y) * 255 / (width + height)) as u8,
        ])
    })
}

pub fn data_url(image: &RgbImage) -> String {
    rgb_data_url(image).expect("Failed to encode fixture")
}

/// PNG data-URL of a fully transparent RGBA image
pub fn transparent_data_url(width: u32, height: u32) -> String {
    let rgba = RgbaImage::from_pixel(width, height, image::Rgba([0, 0, 0, 0]));
    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(rgba.as_raw(), width, height, ExtendedColorType::Rgba8)
        .expect("Failed to encode RGBA fixture");
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}

/// Valid base64 that is not an image
pub fn not_an_image() -> String {
    base64::engine::general_purpose::STANDARD.encode(b"definitely not a PNG")
}
