//! CIE L\*a\*b\* (D65, 2° observer) conversions

use std::sync::OnceLock;

use image::{GrayImage, RgbImage};
use rayon::prelude::*;

use super::srgb::Srgb;

/// D65 reference white
const D65: [f32; 3] = [0.95047, 1.0, 1.08883];

const SRGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.412453, 0.357580, 0.180423],
    [0.212671, 0.715160, 0.072169],
    [0.019334, 0.119193, 0.950227],
];

const XYZ_TO_SRGB: [[f32; 3]; 3] = [
    [3.240481, -1.537151, -0.498536],
    [-0.969255, 1.875990, 0.041556],
    [0.055647, -0.204041, 1.057311],
];

const EPSILON: f32 = 0.008856;

/// A color in CIE L\*a\*b\*.
///
/// - `l`: lightness, 0.0..=100.0
/// - `a`: green (−) to red (+)
/// - `b`: blue (−) to yellow (+)
///
/// Euclidean distance in this space (CIE76 ΔE) is the metric used for
/// palette extraction, mask synthesis and reference matching.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lab {
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

impl Lab {
    #[inline]
    pub const fn new(l: f32, a: f32, b: f32) -> Self {
        Self { l, a, b }
    }

    /// CIE76 color difference.
    #[inline]
    pub fn distance(&self, other: &Lab) -> f32 {
        self.distance_squared(other).sqrt()
    }

    #[inline]
    pub fn distance_squared(&self, other: &Lab) -> f32 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        dl * dl + da * da + db * db
    }

    /// Convert from sRGB channels in `0.0..=1.0`.
    pub fn from_unit_rgb(rgb: [f32; 3]) -> Self {
        let lin = rgb.map(decode_gamma);
        xyz_to_lab(mul(&SRGB_TO_XYZ, lin))
    }

    /// Convert back to 8-bit sRGB. Out-of-gamut values are clipped and
    /// the scaled result is truncated, not rounded.
    pub fn to_srgb(self) -> Srgb {
        let [x, y, z] = lab_to_xyz(self);
        let lin = mul(&XYZ_TO_SRGB, [x, y, z]);
        let [r, g, b] = lin.map(|c| (encode_gamma(c).clamp(0.0, 1.0) * 255.0) as u8);
        Srgb::new(r, g, b)
    }
}

impl From<Srgb> for Lab {
    fn from(c: Srgb) -> Self {
        let lut = gamma_lut();
        let lin = [lut[c.r as usize], lut[c.g as usize], lut[c.b as usize]];
        xyz_to_lab(mul(&SRGB_TO_XYZ, lin))
    }
}

#[inline]
fn mul(m: &[[f32; 3]; 3], v: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

#[inline]
fn decode_gamma(c: f32) -> f32 {
    if c > 0.04045 {
        ((c + 0.055) / 1.055).powf(2.4)
    } else {
        c / 12.92
    }
}

#[inline]
fn encode_gamma(c: f32) -> f32 {
    if c > 0.0031308 {
        1.055 * c.max(0.0).powf(1.0 / 2.4) - 0.055
    } else {
        12.92 * c
    }
}

/// 8-bit sRGB to linear lookup table.
fn gamma_lut() -> &'static [f32; 256] {
    static LUT: OnceLock<[f32; 256]> = OnceLock::new();
    LUT.get_or_init(|| std::array::from_fn(|i| decode_gamma(i as f32 / 255.0)))
}

#[inline]
fn lab_f(t: f32) -> f32 {
    if t > EPSILON {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

#[inline]
fn lab_f_inv(t: f32) -> f32 {
    let t3 = t * t * t;
    if t3 > EPSILON {
        t3
    } else {
        (t - 16.0 / 116.0) / 7.787
    }
}

#[inline]
fn xyz_to_lab([x, y, z]: [f32; 3]) -> Lab {
    let fx = lab_f(x / D65[0]);
    let fy = lab_f(y / D65[1]);
    let fz = lab_f(z / D65[2]);
    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

#[inline]
fn lab_to_xyz(lab: Lab) -> [f32; 3] {
    let fy = (lab.l + 16.0) / 116.0;
    let fx = fy + lab.a / 500.0;
    let fz = fy - lab.b / 200.0;
    [
        lab_f_inv(fx) * D65[0],
        lab_f_inv(fy) * D65[1],
        lab_f_inv(fz) * D65[2],
    ]
}

/// Per-pixel Lab plane of an RGB image, row-major.
///
/// Computed once per request and shared by every mask builder.
#[derive(Debug, Clone)]
pub struct LabImage {
    width: u32,
    height: u32,
    pixels: Vec<Lab>,
}

impl LabImage {
    pub fn from_rgb(image: &RgbImage) -> Self {
        let pixels = image
            .as_raw()
            .par_chunks_exact(3)
            .map(|px| Lab::from(Srgb::new(px[0], px[1], px[2])))
            .collect();
        Self {
            width: image.width(),
            height: image.height(),
            pixels,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[Lab] {
        &self.pixels
    }

    /// Lightness plane scaled to 0..=255 (truncated).
    pub fn lightness_u8(&self) -> GrayImage {
        let raw = self
            .pixels
            .iter()
            .map(|p| (p.l * 255.0 / 100.0).clamp(0.0, 255.0) as u8)
            .collect();
        GrayImage::from_raw(self.width, self.height, raw)
            .unwrap_or_else(|| GrayImage::new(self.width, self.height))
    }

    /// Distance of every pixel to `target`.
    pub fn distances_to(&self, target: &Lab) -> Vec<f32> {
        self.pixels.par_iter().map(|p| p.distance(target)).collect()
    }
}
