//! Engine error taxonomy

use std::fmt;

use thiserror::Error;

use crate::color::ParseColorError;

/// Request rejected before any processing happens.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("could not decode image: {0}")]
    Decode(String),

    #[error("image has no pixels")]
    EmptyImage,

    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} is not a valid #RRGGBB color ({value}): {source}")]
    InvalidColor {
        field: &'static str,
        value: String,
        #[source]
        source: ParseColorError,
    },

    #[error("input_white ({white}) must be greater than input_black ({black})")]
    InvalidLevels { black: u8, white: u8 },

    #[error("at most {max} custom colors are allowed (got {count})")]
    TooManyColors { count: usize, max: usize },
}

impl InputError {
    /// Check `min <= value <= max`, naming `field` on failure.
    pub fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), Self> {
        if value.is_finite() && value >= min && value <= max {
            Ok(())
        } else {
            Err(InputError::OutOfRange {
                field,
                value,
                min,
                max,
            })
        }
    }
}

/// Pipeline stage, used to name where a processing failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    PaletteExtraction(&'static str),
    ChannelBuild,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::PaletteExtraction(method) => write!(f, "palette extraction ({method})"),
            Stage::ChannelBuild => f.write_str("channel build"),
        }
    }
}

/// Top-level failure returned by [`Separator`](crate::Separator) operations.
#[derive(Debug, Error)]
pub enum SeparationError {
    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    #[error("{stage} failed: {reason}")]
    Processing { stage: Stage, reason: String },
}

impl SeparationError {
    pub fn processing(stage: Stage, reason: impl ToString) -> Self {
        SeparationError::Processing {
            stage,
            reason: reason.to_string(),
        }
    }

    /// True for errors caused by the request rather than the engine.
    pub fn is_input(&self) -> bool {
        matches!(self, SeparationError::Input(_))
    }
}
