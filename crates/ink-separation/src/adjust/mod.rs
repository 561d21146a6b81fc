//! Tone adjustment pipeline and histogram.
//!
//! [`apply_adjustments`] runs five stages in a fixed order, each skipped
//! when its parameters are neutral:
//!
//! 1. levels (input black/white + gamma)
//! 2. curves (piecewise-linear control points)
//! 3. brightness / contrast
//! 4. hue / saturation / lightness
//! 5. color balance
//!
//! A neutral [`ColorAdjustment`] returns a pixel-identical copy.

mod histogram;
mod options;
mod pipeline;

pub use histogram::Histogram;
pub use options::ColorAdjustment;
pub use pipeline::{adjust, apply_adjustments};
