//! Adjustment parameters.

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Tone adjustment parameters.
///
/// Every field defaults to its neutral value, so a default instance is a
/// no-op. Use [`ColorAdjustment::validate`] before applying values that
/// came from outside the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct ColorAdjustment {
    /// Brightness shift, -100..=100 (fraction of full range ×100)
    pub brightness: f32,
    /// Contrast, -100..=100
    pub contrast: f32,
    /// Hue rotation in degrees, -180..=180
    pub hue: f32,
    /// Saturation change in percent, -100..=100
    pub saturation: f32,
    /// Lightness (HSV value) change in percent, -100..=100
    pub lightness: f32,
    /// Levels gamma, 0.1..=3.0
    pub gamma: f32,
    /// Levels input black point
    pub input_black: u8,
    /// Levels input white point
    pub input_white: u8,
    /// Red channel shift, -100..=100
    pub cyan_red: f32,
    /// Green channel shift, -100..=100
    pub magenta_green: f32,
    /// Blue channel shift, -100..=100
    pub yellow_blue: f32,
    /// Curve control points as `[x, y]` pairs in 0..=255
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Vec<Vec<i32>>>))]
    pub curves: Option<Vec<(i32, i32)>>,
}

impl Default for ColorAdjustment {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 0.0,
            hue: 0.0,
            saturation: 0.0,
            lightness: 0.0,
            gamma: 1.0,
            input_black: 0,
            input_white: 255,
            cyan_red: 0.0,
            magenta_green: 0.0,
            yellow_blue: 0.0,
            curves: None,
        }
    }
}

impl ColorAdjustment {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn brightness(mut self, value: f32) -> Self {
        self.brightness = value;
        self
    }

    #[inline]
    pub fn contrast(mut self, value: f32) -> Self {
        self.contrast = value;
        self
    }

    #[inline]
    pub fn hsl(mut self, hue: f32, saturation: f32, lightness: f32) -> Self {
        self.hue = hue;
        self.saturation = saturation;
        self.lightness = lightness;
        self
    }

    #[inline]
    pub fn levels(mut self, input_black: u8, input_white: u8, gamma: f32) -> Self {
        self.input_black = input_black;
        self.input_white = input_white;
        self.gamma = gamma;
        self
    }

    #[inline]
    pub fn color_balance(mut self, cyan_red: f32, magenta_green: f32, yellow_blue: f32) -> Self {
        self.cyan_red = cyan_red;
        self.magenta_green = magenta_green;
        self.yellow_blue = yellow_blue;
        self
    }

    #[inline]
    pub fn curves(mut self, points: Vec<(i32, i32)>) -> Self {
        self.curves = Some(points);
        self
    }

    pub(crate) fn levels_active(&self) -> bool {
        self.input_black != 0 || self.input_white != 255 || self.gamma != 1.0
    }

    pub(crate) fn curves_active(&self) -> bool {
        self.curves.as_ref().is_some_and(|p| p.len() >= 2)
    }

    pub(crate) fn brightness_contrast_active(&self) -> bool {
        self.brightness != 0.0 || self.contrast != 0.0
    }

    pub(crate) fn hsl_active(&self) -> bool {
        self.hue != 0.0 || self.saturation != 0.0 || self.lightness != 0.0
    }

    pub(crate) fn balance_active(&self) -> bool {
        self.cyan_red != 0.0 || self.magenta_green != 0.0 || self.yellow_blue != 0.0
    }

    /// True when every stage would be skipped.
    pub fn is_neutral(&self) -> bool {
        !(self.levels_active()
            || self.curves_active()
            || self.brightness_contrast_active()
            || self.hsl_active()
            || self.balance_active())
    }

    pub fn validate(&self) -> Result<(), InputError> {
        let signed = [
            ("brightness", self.brightness),
            ("contrast", self.contrast),
            ("saturation", self.saturation),
            ("lightness", self.lightness),
            ("cyan_red", self.cyan_red),
            ("magenta_green", self.magenta_green),
            ("yellow_blue", self.yellow_blue),
        ];
        for (field, value) in signed {
            InputError::check_range(field, value as f64, -100.0, 100.0)?;
        }
        InputError::check_range("hue", self.hue as f64, -180.0, 180.0)?;
        InputError::check_range("gamma", self.gamma as f64, 0.1, 3.0)?;

        if self.input_white <= self.input_black {
            return Err(InputError::InvalidLevels {
                black: self.input_black,
                white: self.input_white,
            });
        }

        if let Some(points) = &self.curves {
            for &(x, y) in points {
                InputError::check_range("curves.x", x as f64, 0.0, 255.0)?;
                InputError::check_range("curves.y", y as f64, 0.0, 255.0)?;
            }
        }
        Ok(())
    }
}
