use std::num::ParseIntError;
use thiserror::Error;

/// Error returned when a hex color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseColorError {
    /// Hex string must have exactly 6 digits after stripping `#`
    #[error("invalid hex color length (expected 6 hex digits, got {0})")]
    InvalidLength(usize),

    #[error("invalid hex character: {0}")]
    InvalidHex(#[from] ParseIntError),
}
