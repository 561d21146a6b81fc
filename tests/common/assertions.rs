//! Assertion helpers for tests.

use axum::http::StatusCode;
use image::{DynamicImage, GrayImage, RgbImage};
use pretty_assertions::assert_eq;

use inksep::services::decode_data_url;

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status,
        expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert an error response with the `{"status", "error"}` body
pub fn assert_error(response: &TestResponse, expected: StatusCode) -> String {
    assert_status(response, expected);
    let json: serde_json::Value = response.json();
    assert_eq!(
        json["status"].as_u64(),
        Some(u64::from(expected.as_u16())),
        "Expected JSON status {}. Full response: {}",
        expected.as_u16(),
        serde_json::to_string_pretty(&json).unwrap()
    );
    json["error"]
        .as_str()
        .expect("Expected error message")
        .to_string()
}

fn png_payload(url: &str) -> DynamicImage {
    let body = url
        .strip_prefix("data:image/png;base64,")
        .unwrap_or_else(|| panic!("Expected PNG data-URL, got {}", &url[..url.len().min(40)]));
    use base64::Engine;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(body)
        .expect("Invalid base64 in data-URL");
    image::load_from_memory(&bytes).expect("Data-URL is not a decodable image")
}

/// Decode a grayscale PNG data-URL
pub fn assert_gray_data_url(url: &str) -> GrayImage {
    let image = png_payload(url);
    assert_eq!(image.color(), image::ColorType::L8, "Expected 8-bit gray PNG");
    image.into_luma8()
}

/// Decode an RGB PNG data-URL
pub fn assert_rgb_data_url(url: &str) -> RgbImage {
    assert!(url.starts_with("data:image/png;base64,"));
    decode_data_url(url).expect("Data-URL did not decode")
}

/// Assert the `#RRGGBB` uppercase format
pub fn assert_hex_color(value: &serde_json::Value) {
    let s = value.as_str().expect("Expected a hex string");
    assert_eq!(s.len(), 7, "Expected #RRGGBB, got {s}");
    assert!(s.starts_with('#'));
    assert!(
        s[1..].chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)),
        "Expected uppercase hex, got {s}"
    );
}
