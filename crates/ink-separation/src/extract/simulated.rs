//! Fixed palette for simulated process printing.

use image::RgbImage;

use super::{ExtractionError, PaletteExtractor};
use crate::color::Lab;

/// Spot inks that approximate full-color images on dark garments by
/// optical blending, in print order.
pub const SIMULATED_PROCESS_INKS: [(&str, Lab); 11] = [
    ("Rich Black", Lab::new(25.0, 0.0, 0.0)),
    ("Process Blue", Lab::new(35.0, 50.0, -60.0)),
    ("Process Cyan", Lab::new(55.0, -35.0, -45.0)),
    ("Process Green", Lab::new(70.0, -40.0, 70.0)),
    ("Process Yellow", Lab::new(85.0, -10.0, 85.0)),
    ("Process Orange", Lab::new(65.0, 60.0, 50.0)),
    ("Process Magenta", Lab::new(50.0, 70.0, -5.0)),
    ("Process Red", Lab::new(45.0, 65.0, 30.0)),
    ("Process Violet", Lab::new(60.0, 20.0, -30.0)),
    ("Light Yellow-Green", Lab::new(75.0, -15.0, 25.0)),
    ("Warm Red", Lab::new(40.0, 30.0, 40.0)),
];

/// Ignores the image and returns [`SIMULATED_PROCESS_INKS`].
pub struct SimulatedProcess;

impl PaletteExtractor for SimulatedProcess {
    fn name(&self) -> &'static str {
        "simulated_process"
    }

    fn extract(&self, _image: &RgbImage, target_count: usize) -> Result<Vec<Lab>, ExtractionError> {
        Ok(SIMULATED_PROCESS_INKS
            .iter()
            .map(|(_, lab)| *lab)
            .take(target_count)
            .collect())
    }
}
