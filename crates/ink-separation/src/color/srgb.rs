//! 8-bit sRGB color type

use std::fmt;
use std::str::FromStr;

use super::error::ParseColorError;

/// A color in 8-bit sRGB.
///
/// This is the representation used on the wire (`#RRGGBB`) and for
/// pixel storage. Perceptual comparisons go through [`Lab`](super::Lab).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Srgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Srgb {
    pub const WHITE: Srgb = Srgb::new(255, 255, 255);
    pub const BLACK: Srgb = Srgb::new(0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Channels scaled to `0.0..=1.0`.
    #[inline]
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Uppercase `#RRGGBB` representation.
    ///
    /// ```
    /// use ink_separation::Srgb;
    /// assert_eq!(Srgb::new(255, 128, 0).to_hex(), "#FF8000");
    /// ```
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Srgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<image::Rgb<u8>> for Srgb {
    #[inline]
    fn from(px: image::Rgb<u8>) -> Self {
        Self::from_bytes(px.0)
    }
}

impl From<Srgb> for image::Rgb<u8> {
    #[inline]
    fn from(c: Srgb) -> Self {
        image::Rgb(c.to_bytes())
    }
}

impl FromStr for Srgb {
    type Err = ParseColorError;

    /// Parse `#RRGGBB` or `RRGGBB`, case-insensitive.
    ///
    /// Shorthand `#RGB` is rejected: fabric colors and custom palettes
    /// are always exchanged as six hex digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        if s.len() != 6 || !s.is_ascii() {
            return Err(ParseColorError::InvalidLength(s.len()));
        }

        let r = u8::from_str_radix(&s[0..2], 16)?;
        let g = u8::from_str_radix(&s[2..4], 16)?;
        let b = u8::from_str_radix(&s[4..6], 16)?;
        Ok(Self::new(r, g, b))
    }
}
