//! Color types and conversion utilities
//!
//! Three representations are used by the engine:
//!
//! - [`Srgb`]: 8-bit sRGB, the wire format (`#RRGGBB`) and pixel storage.
//! - [`Lab`]: CIE L\*a\*b\* (D65), used for every distance computation.
//! - HSV via [`rgb_to_hsv`]/[`hsv_to_rgb`], used only by the tone pipeline.
//!
//! # Example
//!
//! ```
//! use ink_separation::{Lab, Srgb};
//!
//! let red: Srgb = "#FF0000".parse().unwrap();
//! let lab = Lab::from(red);
//! assert!((lab.l - 53.24).abs() < 0.1);
//! assert_eq!(lab.to_srgb().to_hex(), "#FF0000");
//! ```

mod error;
mod hsv;
mod lab;
mod srgb;

pub use error::ParseColorError;
pub use hsv::{hsv_to_rgb, rgb_to_hsv};
pub use lab::{Lab, LabImage};
pub use srgb::Srgb;
