//! Reference ink catalog matching (Pantone coated).
//!
//! The table is loaded once, converted to Lab, and then shared read-only
//! (typically behind an `Arc`) by every request. A missing table is not an
//! error for callers: use [`ReferenceMatcher::empty`] and matching simply
//! returns nothing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::{Lab, ParseColorError, Srgb};

/// Maximum ΔE for a match to be reported.
pub const MAX_MATCH_DISTANCE: f32 = 20.0;

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("malformed reference table: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("reference entry {code:?} has invalid hex {hex:?}: {source}")]
    InvalidHex {
        code: String,
        hex: String,
        #[source]
        source: ParseColorError,
    },
}

/// One record of the on-disk table: `{"pantone": "186 C", "hex": "#C8102E"}`.
#[derive(Debug, Clone, Deserialize)]
struct RawEntry {
    pantone: String,
    hex: String,
}

#[derive(Debug, Clone)]
struct ReferenceEntry {
    code: String,
    hex: String,
    lab: Lab,
}

/// Result of a successful lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReferenceMatch {
    /// Catalog code, e.g. "186 C"
    pub pantone: String,
    /// Catalog color as `#RRGGBB`
    pub hex: String,
    /// CIE76 distance between the query and the catalog color
    pub distance: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceMatcher {
    entries: Vec<ReferenceEntry>,
}

impl ReferenceMatcher {
    /// A matcher with no table; every lookup returns `None`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a JSON array of `{pantone, hex}` records.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ReferenceError> {
        let raw: Vec<RawEntry> = serde_json::from_slice(bytes)?;
        let entries = raw
            .into_iter()
            .map(|e| {
                let rgb: Srgb = e.hex.parse().map_err(|source| ReferenceError::InvalidHex {
                    code: e.pantone.clone(),
                    hex: e.hex.clone(),
                    source,
                })?;
                Ok(ReferenceEntry {
                    code: e.pantone,
                    hex: rgb.to_hex(),
                    lab: Lab::from(rgb),
                })
            })
            .collect::<Result<Vec<_>, ReferenceError>>()?;
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Nearest catalog entry within [`MAX_MATCH_DISTANCE`].
    ///
    /// Linear scan; on equal distances the earlier table entry wins.
    pub fn find_closest(&self, color: &Lab) -> Option<ReferenceMatch> {
        let mut best: Option<(&ReferenceEntry, f32)> = None;
        for entry in &self.entries {
            let d = entry.lab.distance(color);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((entry, d));
            }
        }

        best.filter(|&(_, d)| d <= MAX_MATCH_DISTANCE)
            .map(|(entry, d)| ReferenceMatch {
                pantone: entry.code.clone(),
                hex: entry.hex.clone(),
                distance: d as f64,
            })
    }

    /// Match every color, skipping those without a match.
    ///
    /// The result may be shorter than `colors` and is not index-aligned.
    pub fn match_palette(&self, colors: &[Lab]) -> Vec<ReferenceMatch> {
        colors.iter().filter_map(|c| self.find_closest(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r##"[
        {"pantone": "Black C", "hex": "#2D2926"},
        {"pantone": "186 C", "hex": "#c8102e"},
        {"pantone": "Process Blue C", "hex": "#0085CA"}
    ]"##;

    fn matcher() -> ReferenceMatcher {
        ReferenceMatcher::from_json(TABLE.as_bytes()).unwrap()
    }

    #[test]
    fn test_loads_and_normalizes_hex() {
        let m = matcher();
        assert_eq!(m.len(), 3);
        let hit = m.find_closest(&Lab::from(Srgb::new(0xC8, 0x10, 0x2E))).unwrap();
        assert_eq!(hit.pantone, "186 C");
        assert_eq!(hit.hex, "#C8102E");
        assert!(hit.distance < 1e-3);
    }

    #[test]
    fn test_near_color_matches() {
        let hit = matcher()
            .find_closest(&Lab::from(Srgb::new(200, 30, 50)))
            .unwrap();
        assert_eq!(hit.pantone, "186 C");
    }

    #[test]
    fn test_far_color_has_no_match() {
        assert!(matcher()
            .find_closest(&Lab::from(Srgb::new(255, 255, 0)))
            .is_none());
    }

    #[test]
    fn test_match_palette_skips_misses() {
        let colors = [
            Lab::from(Srgb::new(255, 255, 0)),
            Lab::from(Srgb::new(0x2D, 0x29, 0x26)),
        ];
        let matches = matcher().match_palette(&colors);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].pantone, "Black C");
    }

    #[test]
    fn test_empty_matcher_never_matches() {
        let m = ReferenceMatcher::empty();
        assert!(m.is_empty());
        assert!(m.find_closest(&Lab::new(50.0, 0.0, 0.0)).is_none());
        assert!(m.match_palette(&[Lab::new(0.0, 0.0, 0.0)]).is_empty());
    }

    #[test]
    fn test_bad_table_is_an_error() {
        assert!(matches!(
            ReferenceMatcher::from_json(b"{not json"),
            Err(ReferenceError::Parse(_))
        ));
        let bad_hex = br##"[{"pantone": "X", "hex": "#12"}]"##;
        assert!(matches!(
            ReferenceMatcher::from_json(bad_hex),
            Err(ReferenceError::InvalidHex { .. })
        ));
    }
}
