use crate::assets::AssetLoader;
use ink_separation::separate::DEFAULT_MAX_DIMENSION;
use ink_separation::SeparationMethod;
use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Longest side of the working image, in pixels
    pub max_dimension: u32,

    /// Path to an external Pantone table (REFERENCE_TABLE wins over this)
    pub reference_table: Option<PathBuf>,

    /// Largest accepted request body, in bytes
    pub max_body_bytes: usize,

    /// Methods compared when a /compare request names none
    pub compare_methods: Vec<SeparationMethod>,

    /// Allow any origin
    pub cors_permissive: bool,
}

const DEFAULT_MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            reference_table: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            compare_methods: vec![
                SeparationMethod::GradientAware,
                SeparationMethod::MedianCut,
                SeparationMethod::SimulatedProcess,
            ],
            cors_permissive: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => match serde_yaml::from_str::<Self>(&content) {
                Ok(config) => {
                    tracing::info!(
                        max_dimension = config.max_dimension,
                        compare_methods = config.compare_methods.len(),
                        reference_table = ?config.reference_table,
                        "Loaded configuration"
                    );
                    config.sanitized()
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Replace zero sizes with defaults so the service stays usable.
    fn sanitized(mut self) -> Self {
        if self.max_dimension == 0 {
            tracing::warn!("max_dimension must be positive, using default");
            self.max_dimension = DEFAULT_MAX_DIMENSION;
        }
        if self.max_body_bytes == 0 {
            tracing::warn!("max_body_bytes must be positive, using default");
            self.max_body_bytes = DEFAULT_MAX_BODY_BYTES;
        }
        self
    }
}
