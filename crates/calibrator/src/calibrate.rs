use layoutlens_stability::{NodeVariation, StabilityReport};
use tracing::debug;

use crate::model::{
    CalibrationOptions, CalibrationSettings, ToleranceScale, SETTINGS_VERSION,
};

/// Headroom applied over the worst observed positional drift.
const PIXEL_HEADROOM: f64 = 1.5;

/// Nodes below this stability get an ignore selector of their own.
const IGNORE_SELECTOR_THRESHOLD: f64 = 0.5;

/// More unstable visibility flips than this adds "visibility" to the
/// attribute ignore list.
const VISIBILITY_NODE_LIMIT: usize = 5;

/// Class substrings promoted to ignore patterns when enough unstable nodes
/// share them.
const CLASS_PATTERNS: &[&str] = &["animate", "animated", "dynamic", "carousel", "ticker", "live"];
const CLASS_PATTERN_SHARE: f64 = 0.3;

/// Turn a stability report into a usable comparison configuration.
pub fn calibrate(report: &StabilityReport, options: &CalibrationOptions) -> CalibrationSettings {
    let multiplier = options.strictness.multiplier();
    let unstable: Vec<&NodeVariation> = report.unstable().collect();

    let max_drift = unstable
        .iter()
        .map(|node| node.max_position_delta)
        .fold(0.0f64, f64::max);
    let pixel_tolerance = (max_drift * PIXEL_HEADROOM * multiplier).ceil().max(0.0) as u32;

    let percentage_tolerance = match options.scale {
        ToleranceScale::Continuous => {
            let unstable_ratio = if report.profiles.is_empty() {
                0.0
            } else {
                unstable.len() as f64 / report.profiles.len() as f64
            };
            (unstable_ratio * 10.0).clamp(0.1, 5.0) * multiplier
        }
        ToleranceScale::Banded => {
            let band = if report.overall_pct >= 90.0 {
                5.0
            } else if report.overall_pct >= 80.0 {
                10.0
            } else if report.overall_pct >= 70.0 {
                20.0
            } else {
                30.0
            };
            band * multiplier
        }
    };

    let confidence_level = confidence(report.iterations);
    let text_unstable = unstable.iter().any(|node| node.has_text_variation());

    let mut text_similarity_threshold = options.strictness.text_threshold_base();
    if text_unstable {
        text_similarity_threshold = (text_similarity_threshold - 0.1).max(0.5);
    }

    let settings = CalibrationSettings {
        settings_version: SETTINGS_VERSION,
        pixel_tolerance,
        percentage_tolerance,
        text_similarity_threshold,
        confidence_level,
        ignore_selectors: ignore_selectors(report),
        ignore_attributes: ignore_attributes(&unstable, text_unstable),
    };

    debug!(
        target: "layoutlens.events",
        iterations = report.iterations,
        unstable = unstable.len(),
        pixel_tolerance = settings.pixel_tolerance,
        percentage_tolerance = settings.percentage_tolerance,
        confidence = settings.confidence_level,
        "calibration.derived"
    );

    settings
}

/// Sample-count confidence: linear up to 10 iterations, with bonuses once
/// the run is large enough to trust, capped at 1.
fn confidence(iterations: usize) -> f64 {
    let mut confidence = (iterations as f64 / 10.0).min(1.0);
    if iterations >= 5 {
        confidence *= 1.1;
    }
    if iterations >= 10 {
        confidence *= 1.1;
    }
    confidence.min(1.0)
}

fn ignore_selectors(report: &StabilityReport) -> Vec<String> {
    let mut selectors = Vec::new();
    for profile in &report.profiles {
        if profile.stability >= IGNORE_SELECTOR_THRESHOLD {
            continue;
        }
        let selector = if let Some(id) = profile.dom_id.as_deref() {
            format!("#{id}")
        } else if let Some(token) = profile
            .class
            .as_deref()
            .and_then(|c| c.split_whitespace().next())
        {
            format!(".{token}")
        } else {
            continue;
        };
        if !selectors.contains(&selector) {
            selectors.push(selector);
        }
    }
    selectors
}

fn ignore_attributes(unstable: &[&NodeVariation], text_unstable: bool) -> Vec<String> {
    let mut attributes = Vec::new();
    if text_unstable {
        attributes.push("text".to_string());
    }
    let visibility_nodes = unstable
        .iter()
        .filter(|node| node.has_visibility_variation())
        .count();
    if visibility_nodes > VISIBILITY_NODE_LIMIT {
        attributes.push("visibility".to_string());
    }

    if !unstable.is_empty() {
        for pattern in CLASS_PATTERNS {
            let sharing = unstable
                .iter()
                .filter(|node| {
                    node.class
                        .as_deref()
                        .map_or(false, |c| c.to_ascii_lowercase().contains(pattern))
                })
                .count();
            if sharing as f64 / unstable.len() as f64 >= CLASS_PATTERN_SHARE {
                attributes.push((*pattern).to_string());
            }
        }
    }

    attributes
}
