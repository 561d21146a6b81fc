//! Ink estimate, quality score and recommendations.

use super::channel::{Channel, ChannelType};
use super::request::SeparationRequest;
use super::result::InkEstimate;
use crate::extract::SeparationMethod;
use crate::mask::round_to;

const WHITE_INK_COST: f64 = 0.10;
const COLORED_INK_COST: f64 = 0.15;
const IDEAL_COLOR_CHANNELS: f64 = 6.0;
const MAX_RECOMMENDATIONS: usize = 7;

pub fn ink_estimate(channels: &[Channel]) -> InkEstimate {
    let mut coverage = 0.0;
    let mut white = 0.0;
    let mut colored = 0.0;

    for ch in channels.iter().filter(|c| c.printable) {
        let fraction = ch.coverage_percent / 100.0;
        let ml = fraction * f64::from(ch.ink_volume) * 100.0;
        match ch.channel_type {
            ChannelType::Underbase => white += ml,
            ChannelType::HighlightWhite => white += ml * 0.5,
            ChannelType::SpotColor
            | ChannelType::ProcessColor
            | ChannelType::Gradient
            | ChannelType::Halftone => colored += ml,
        }
        coverage += fraction;
    }

    let white_ink_ml = round_to(white, 1);
    let colored_ink_ml = round_to(colored, 1);
    InkEstimate {
        total_coverage: round_to(coverage * 100.0, 1),
        white_ink_ml,
        colored_ink_ml,
        estimated_cost: round_to(
            white_ink_ml * WHITE_INK_COST + colored_ink_ml * COLORED_INK_COST,
            2,
        ),
    }
}

pub(crate) fn color_channel_count(channels: &[Channel]) -> usize {
    channels.iter().filter(|c| c.channel_type.is_color()).count()
}

/// Weighted 0..=100 score: coverage (40%), channel count near six (30%)
/// and ink economy (30%).
pub fn quality_score(channels: &[Channel], estimate: &InkEstimate) -> f64 {
    if channels.is_empty() {
        return 0.0;
    }

    let color_coverage: f64 = channels
        .iter()
        .filter(|c| c.printable && c.channel_type.is_color())
        .map(|c| c.coverage_percent)
        .sum();
    let coverage_score = color_coverage.min(100.0);

    let count = color_channel_count(channels) as f64;
    let channel_score = (100.0 - (count - IDEAL_COLOR_CHANNELS).abs() * 10.0).max(0.0);

    let efficiency_score = (100.0 - estimate.total_coverage * 0.5).max(0.0);

    round_to(
        coverage_score * 0.4 + channel_score * 0.3 + efficiency_score * 0.3,
        1,
    )
}

pub fn recommendations(
    channels: &[Channel],
    request: &SeparationRequest,
    estimate: &InkEstimate,
    quality: f64,
) -> Vec<String> {
    if channels.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::new();

    let count = color_channel_count(channels);
    if count > 8 {
        out.push(format!(
            "Consider reducing colors to 6-8 for better printability (currently {count})"
        ));
    } else if count < 4 {
        out.push(format!(
            "Consider increasing colors for better detail (currently {count})"
        ));
    }

    if estimate.total_coverage > 250.0 {
        out.push(
            "High ink coverage may cause stiff prints. Consider reducing colors or using discharge ink."
                .to_string(),
        );
    } else if estimate.total_coverage < 100.0 {
        out.push("Low ink coverage - good for soft-hand prints".to_string());
    }

    match request.method {
        SeparationMethod::SimulatedProcess => out.push(
            "Simulated process uses fixed spot colors - ideal for full-color images on dark garments"
                .to_string(),
        ),
        SeparationMethod::GradientAware => out.push(
            "Gradient-aware separation is optimal for designs with smooth transitions".to_string(),
        ),
        SeparationMethod::MedianCut | SeparationMethod::Watershed | SeparationMethod::Octree => {}
    }

    if quality < 70.0 {
        out.push(format!(
            "Quality score is low ({quality:.1}/100). Try adjusting softness or color count."
        ));
    } else if quality > 90.0 {
        out.push(format!("Excellent separation quality ({quality:.1}/100)"));
    }

    if request.match_reference {
        out.push("Colors matched to Pantone library for accurate ink specification".to_string());
    }

    if request.trap != 0.0 {
        let direction = if request.trap > 0.0 { "spread" } else { "choke" };
        out.push(format!(
            "Trapping applied: {:.1}pt {direction}",
            request.trap.abs()
        ));
    }

    out.truncate(MAX_RECOMMENDATIONS);
    out
}
