//! Mask synthesis and refinement.
//!
//! Every function here takes and returns single-channel `GrayImage`s with
//! the working image's dimensions; values are ink intensity, 0..=255.

mod color_mask;
mod halftone;
mod morphology;
mod spread;
mod underbase;

pub use color_mask::{color_mask, EdgeFalloff};
pub use halftone::halftone_screen;
pub use morphology::{
    apply_min_dot, apply_trap, binary_dilate, coverage_percent, dilate_square, erode_square,
};
pub use spread::{spread_factor, FabricType, InkType};
pub use underbase::{remove_small_regions, underbase_mask, MIN_REGION_AREA};

pub(crate) use morphology::round_to;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MaskError {
    #[error("mask buffer of {len} bytes does not fit {width}x{height}")]
    BufferSize { len: usize, width: u32, height: u32 },

    #[error("mask is {actual_width}x{actual_height}, expected {width}x{height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}

/// Wrap a row-major buffer as a mask, checking its length.
pub(crate) fn mask_from_raw(
    width: u32,
    height: u32,
    raw: Vec<u8>,
) -> Result<image::GrayImage, MaskError> {
    let len = raw.len();
    image::GrayImage::from_raw(width, height, raw).ok_or(MaskError::BufferSize {
        len,
        width,
        height,
    })
}
