#![allow(clippy::needless_range_loop)]

//! ink-separation: color separation for screen printing
//!
//! Turns a full-color raster into an ordered stack of printable ink
//! channels (optional white underbase, then one mask per extracted color)
//! with a composite preview, ink usage estimate, quality score and
//! recommendations.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use image::{Rgb, RgbImage};
//! use ink_separation::{ReferenceMatcher, SeparationMethod, SeparationRequest, Separator};
//!
//! let image = RgbImage::from_fn(64, 64, |x, _| {
//!     if x < 32 { Rgb([200, 30, 30]) } else { Rgb([30, 30, 200]) }
//! });
//!
//! let separator = Separator::new(Arc::new(ReferenceMatcher::empty()));
//! let request = SeparationRequest::builder(image)
//!     .method(SeparationMethod::MedianCut)
//!     .target_count(2)
//!     .build()
//!     .unwrap();
//!
//! let result = separator.separate(&request).unwrap();
//! for channel in &result.channels {
//!     println!("{} {} {:.1}%", channel.order, channel.name, channel.coverage_percent);
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`color`] | sRGB / Lab conversion, hex parsing |
//! | [`adjust`] | levels, curves, brightness/contrast, HSL, balance, histogram |
//! | [`reference`] | nearest Pantone lookup within ΔE 20 |
//! | [`extract`] | five palette strategies behind [`PaletteExtractor`] |
//! | [`mask`] | color masks, underbase, trap, minimum dot, halftone |
//! | [`separate`] | the [`Separator`] orchestrator and its result types |
//!
//! # Color Distances
//!
//! Every distance used for extraction, masking and matching is CIE76 ΔE
//! in L\*a\*b\* (D65). RGB is only used for storage, for the median-cut
//! and quantile splits, and for mean-shift over gradient pixels.
//!
//! # Concurrency
//!
//! A [`Separator`] is immutable after construction. Its reference table
//! sits behind an `Arc` and is only read, so one instance can be shared
//! across threads. Inside a request, per-color masks are built on the
//! rayon pool and reassembled in palette order.

pub mod adjust;
pub mod color;
pub mod error;
pub mod extract;
pub mod mask;
pub mod reference;
pub mod separate;


pub use adjust::{ColorAdjustment, Histogram};
pub use color::{Lab, LabImage, ParseColorError, Srgb};
pub use error::{InputError, SeparationError, Stage};
pub use extract::{CustomPalette, ExtractionError, PaletteExtractor, SeparationMethod};
pub use mask::{FabricType, InkType, MaskError};
pub use reference::{ReferenceError, ReferenceMatch, ReferenceMatcher};
pub use separate::{
    decode_image, Analysis, BlendMode, Channel, ChannelType, Comparison, ComparisonEntry,
    InkEstimate, Metadata, SeparationRequest, SeparationResult, Separator,
};
