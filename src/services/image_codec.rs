//! Transport codec: base64 data-URLs in, PNG data-URLs out.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, GrayImage, ImageEncoder, RgbImage};
use ink_separation::{decode_image, InputError};
use thiserror::Error;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("image is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error(transparent)]
    Decode(#[from] InputError),

    #[error("PNG encode error: {0}")]
    Encode(String),
}

/// Strip an optional `data:<mime>;base64,` header.
fn payload(data: &str) -> &str {
    let data = data.trim();
    match data.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map_or(rest, |(_, body)| body),
        None => data,
    }
}

/// Decode a data-URL or bare base64 string into an RGB image.
///
/// Alpha is composited onto white.
pub fn decode_data_url(data: &str) -> Result<RgbImage, CodecError> {
    // Some clients wrap long base64 strings
    let body: String = payload(data).chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if body.is_empty() {
        return Err(InputError::Decode("empty image payload".to_string()).into());
    }
    let bytes = STANDARD.decode(body.as_bytes())?;
    Ok(decode_image(&bytes)?)
}

fn encode_png(data: &[u8], width: u32, height: u32, color: ExtendedColorType) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(data, width, height, color)
        .map_err(|e| CodecError::Encode(e.to_string()))?;
    Ok(out)
}

pub fn gray_png(mask: &GrayImage) -> Result<Vec<u8>, CodecError> {
    encode_png(mask.as_raw(), mask.width(), mask.height(), ExtendedColorType::L8)
}

pub fn rgb_png(image: &RgbImage) -> Result<Vec<u8>, CodecError> {
    encode_png(image.as_raw(), image.width(), image.height(), ExtendedColorType::Rgb8)
}

fn to_data_url(png: &[u8]) -> String {
    let mut url = String::with_capacity(PNG_DATA_URL_PREFIX.len() + png.len() * 4 / 3 + 4);
    url.push_str(PNG_DATA_URL_PREFIX);
    STANDARD.encode_string(png, &mut url);
    url
}

/// Encode a mask as a grayscale PNG data-URL.
pub fn gray_data_url(mask: &GrayImage) -> Result<String, CodecError> {
    Ok(to_data_url(&gray_png(mask)?))
}

/// Encode an image as an RGB PNG data-URL.
pub fn rgb_data_url(image: &RgbImage) -> Result<String, CodecError> {
    Ok(to_data_url(&rgb_png(image)?))
}
