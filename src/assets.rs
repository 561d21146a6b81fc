//! Asset loading with embedded fallbacks
//!
//! Two assets ship inside the binary: the default `config.yaml` and the
//! Pantone coated table `pantone-coated.json`. Each can be overridden from
//! the filesystem:
//!
//! - If the path is NOT configured: use the embedded copy only
//! - If the path IS configured but the file is missing: seed it from the embedded copy
//! - If the path IS configured and the file exists: use the file

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const CONFIG_ASSET: &str = "config.yaml";
pub const REFERENCE_ASSET: &str = "pantone-coated.json";

/// Embedded default config and reference table
#[derive(RustEmbed)]
#[folder = "."]
#[include = "config.yaml"]
#[include = "pantone-coated.json"]
struct EmbeddedAssets;

/// Asset category for selective operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetCategory {
    Config,
    Reference,
}

impl AssetCategory {
    fn asset_name(self) -> &'static str {
        match self {
            AssetCategory::Config => CONFIG_ASSET,
            AssetCategory::Reference => REFERENCE_ASSET,
        }
    }
}

/// Report of seeding operations
#[derive(Debug, Default)]
pub struct SeedReport {
    pub config_seeded: bool,
    pub reference_seeded: bool,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        !self.config_seeded && !self.reference_seeded
    }
}

/// Report of init (extraction) operations
#[derive(Debug, Default)]
pub struct InitReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

/// Asset loader with optional filesystem override
#[derive(Debug, Clone, Default)]
pub struct AssetLoader {
    /// External config file path (from CONFIG_FILE env var)
    config_file: Option<PathBuf>,
    /// External reference table path (from REFERENCE_TABLE env var)
    reference_table: Option<PathBuf>,
}

impl AssetLoader {
    /// Create a new asset loader
    ///
    /// Paths should be `Some` only if the corresponding env var was set.
    pub fn new(config_file: Option<PathBuf>, reference_table: Option<PathBuf>) -> Self {
        Self {
            config_file,
            reference_table,
        }
    }

    /// Build a loader from `CONFIG_FILE` and `REFERENCE_TABLE`.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("CONFIG_FILE").ok().map(PathBuf::from),
            std::env::var("REFERENCE_TABLE").ok().map(PathBuf::from),
        )
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    pub fn reference_table(&self) -> Option<&Path> {
        self.reference_table.as_deref()
    }

    /// Read the config file, falling back to the embedded default.
    pub fn read_config(&self) -> io::Result<Cow<'static, [u8]>> {
        read_with_fallback(self.config_file.as_deref(), CONFIG_ASSET)
    }

    /// Read config as a UTF-8 string
    pub fn read_config_string(&self) -> io::Result<String> {
        let bytes = self.read_config()?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Read the reference table.
    ///
    /// Lookup order: the loader's own path (env var), then `configured`
    /// (from config.yaml), then the embedded table.
    pub fn read_reference_table(&self, configured: Option<&Path>) -> io::Result<Cow<'static, [u8]>> {
        let external = self.reference_table.as_deref().or(configured);
        read_with_fallback(external, REFERENCE_ASSET)
    }

    /// Write embedded copies to configured paths that do not exist yet.
    pub fn seed_if_configured(&self) -> io::Result<SeedReport> {
        let mut report = SeedReport::default();

        if let Some(ref path) = self.config_file {
            report.config_seeded = seed_file(path, CONFIG_ASSET)?;
        }
        if let Some(ref path) = self.reference_table {
            report.reference_seeded = seed_file(path, REFERENCE_ASSET)?;
        }

        Ok(report)
    }

    /// Extract embedded assets to the filesystem (init command)
    ///
    /// Uses the configured paths, or the asset name in the current
    /// directory when a path is not set.
    pub fn init(&self, categories: &[AssetCategory], force: bool) -> io::Result<InitReport> {
        let mut report = InitReport::default();

        for &category in categories {
            let configured = match category {
                AssetCategory::Config => self.config_file.clone(),
                AssetCategory::Reference => self.reference_table.clone(),
            };
            let path = configured.unwrap_or_else(|| PathBuf::from(".").join(category.asset_name()));

            if !force && path.exists() {
                report.skipped.push(path.display().to_string());
                continue;
            }
            if let Some(data) = EmbeddedAssets::get(category.asset_name()) {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&path, &*data.data)?;
                report.written.push(path.display().to_string());
            }
        }

        Ok(report)
    }

    /// List embedded assets by category (for display)
    pub fn list_embedded(category: AssetCategory) -> Vec<String> {
        EmbeddedAssets::iter()
            .filter(|name| name.as_ref() == category.asset_name())
            .map(|name| name.to_string())
            .collect()
    }
}

fn read_with_fallback(external: Option<&Path>, asset: &str) -> io::Result<Cow<'static, [u8]>> {
    if let Some(path) = external {
        if path.exists() {
            tracing::trace!(path = %path.display(), "Loading asset from filesystem");
            return Ok(Cow::Owned(fs::read(path)?));
        }
    }

    EmbeddedAssets::get(asset)
        .map(|f| {
            tracing::trace!(asset, "Loading asset from embedded copy");
            f.data
        })
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("Embedded {asset} not found"),
            )
        })
}

fn seed_file(path: &Path, asset: &str) -> io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    let Some(data) = EmbeddedAssets::get(asset) else {
        return Ok(false);
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &*data.data)?;
    tracing::info!(path = %path.display(), asset, "Seeded file with embedded default");
    Ok(true)
}
