//! Write a separation to disk: one PNG per channel, the preview, and a
//! JSON summary.

use ink_separation::{ChannelType, InkEstimate, Metadata, ReferenceMatch, SeparationResult};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::services::image_codec::{gray_png, rgb_png};

pub const PREVIEW_FILE: &str = "preview.png";
pub const SUMMARY_FILE: &str = "result.json";

#[derive(Debug, Serialize)]
pub struct ExportedChannel {
    pub file: String,
    pub name: String,
    pub color: String,
    pub pantone: Option<String>,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    pub order: u32,
    pub coverage_percent: f64,
    pub ink_volume: f32,
    pub halftone_file: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExportSummary {
    pub metadata: Metadata,
    pub palette: Vec<String>,
    pub pantone_matches: Option<Vec<ReferenceMatch>>,
    pub ink_estimate: InkEstimate,
    pub separation_quality: f64,
    pub recommendations: Vec<String>,
    pub channels: Vec<ExportedChannel>,
}

/// `channel_03_pms_186_c.png` for order 3, "PMS 186 C".
pub fn channel_file_name(order: u32, name: &str, suffix: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_matches('_');
    format!("channel_{order:02}_{slug}{suffix}.png")
}

/// Write every raster of `result` into `dir` (created if missing).
/// Returns the written paths, summary last.
pub fn export_result(result: &SeparationResult, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(result.channels.len() + 2);
    let mut channels = Vec::with_capacity(result.channels.len());

    for channel in &result.channels {
        let file = channel_file_name(channel.order, &channel.name, "");
        let path = dir.join(&file);
        fs::write(&path, gray_png(&channel.mask)?)?;
        written.push(path);

        let halftone_file = match &channel.halftone {
            Some(halftone) => {
                let file = channel_file_name(channel.order, &channel.name, "_halftone");
                let path = dir.join(&file);
                fs::write(&path, gray_png(halftone)?)?;
                written.push(path);
                Some(file)
            }
            None => None,
        };

        channels.push(ExportedChannel {
            file,
            name: channel.name.clone(),
            color: channel.hex(),
            pantone: channel.pantone.clone(),
            channel_type: channel.channel_type,
            order: channel.order,
            coverage_percent: channel.coverage_percent,
            ink_volume: channel.ink_volume,
            halftone_file,
        });
    }

    let preview = dir.join(PREVIEW_FILE);
    fs::write(&preview, rgb_png(&result.preview)?)?;
    written.push(preview);

    let summary = ExportSummary {
        metadata: result.metadata.clone(),
        palette: result.palette.iter().map(|c| c.to_hex()).collect(),
        pantone_matches: result.reference_matches.clone(),
        ink_estimate: result.ink_estimate,
        separation_quality: result.quality_score,
        recommendations: result.recommendations.clone(),
        channels,
    };
    let summary_path = dir.join(SUMMARY_FILE);
    fs::write(&summary_path, serde_json::to_vec_pretty(&summary)?)?;
    written.push(summary_path);

    tracing::debug!(dir = %dir.display(), files = written.len(), "Exported separation");
    Ok(written)
}
