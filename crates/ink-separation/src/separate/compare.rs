//! Side-by-side method comparison.

use serde::{Deserialize, Serialize};

use super::result::InkEstimate;
use crate::extract::SeparationMethod;

/// Target color count used for every compared method.
pub const COMPARE_TARGET_COUNT: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ComparisonEntry {
    pub method: SeparationMethod,
    pub channel_count: usize,
    pub quality_score: f64,
    pub ink_estimate: InkEstimate,
    /// First two recommendations of the run
    pub recommendations: Vec<String>,
}

/// Methods ranked by quality, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Comparison {
    pub comparisons: Vec<ComparisonEntry>,
    pub best_method: Option<SeparationMethod>,
}

impl Comparison {
    /// Rank `entries` by quality (stable, so ties keep run order).
    pub fn ranked(mut entries: Vec<ComparisonEntry>) -> Self {
        entries.sort_by(|a, b| b.quality_score.total_cmp(&a.quality_score));
        let best_method = entries.first().map(|e| e.method);
        Self {
            comparisons: entries,
            best_method,
        }
    }
}
