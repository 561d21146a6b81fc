//! End-to-end separation: request, channels, preview, scoring.
//!
//! The pipeline run by [`Separator::separate`]:
//!
//! ```text
//! source image
//!     |  resize (longest side <= max_dimension, area filter)
//!     |  adjust (optional tone pipeline)
//!     +--> underbase channel (dark fabrics only)
//!     +--> palette extraction (strategy or custom colors)
//!     |      `-> one mask per color, built in parallel, kept in palette order
//!     |  trap, minimum dot, coverage, drop below minimum coverage
//!     v
//! channels --> composite preview --> ink estimate / quality / recommendations
//! ```

mod analyze;
mod channel;
mod compare;
mod composite;
mod engine;
mod request;
mod result;
mod scoring;

pub use analyze::{analyze_image, Analysis};
pub use channel::{BlendMode, Channel, ChannelType};
pub use compare::{Comparison, ComparisonEntry, COMPARE_TARGET_COUNT};
pub use composite::composite;
pub use engine::{decode_image, resize_to_fit, Separator, DEFAULT_MAX_DIMENSION};
pub use request::{SeparationRequest, SeparationRequestBuilder, MAX_TARGET_COUNT, MIN_TARGET_COUNT};
pub use result::{InkEstimate, Metadata, SeparationResult};
pub use scoring::{ink_estimate, quality_score, recommendations};
