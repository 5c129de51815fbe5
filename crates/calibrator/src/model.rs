use serde::{Deserialize, Serialize};

/// Caller-selected tightness of the derived tolerances.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    Low,
    #[default]
    Medium,
    High,
}

impl Strictness {
    /// Higher strictness shrinks every derived tolerance.
    pub fn multiplier(&self) -> f64 {
        match self {
            Strictness::Low => 1.5,
            Strictness::Medium => 1.0,
            Strictness::High => 0.7,
        }
    }

    pub(crate) fn text_threshold_base(&self) -> f64 {
        match self {
            Strictness::Low => 0.7,
            Strictness::Medium => 0.8,
            Strictness::High => 0.9,
        }
    }
}

/// Which percentage-tolerance formula to use. Two call paths exist upstream
/// of this engine and both are preserved; the caller picks by intent.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToleranceScale {
    /// Fine-grained: scales with the fraction of unstable nodes.
    #[default]
    Continuous,
    /// Coarse bands keyed off the overall stability percentage.
    Banded,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct CalibrationOptions {
    pub strictness: Strictness,
    pub scale: ToleranceScale,
}

/// Derived comparison configuration. An opaque value object to consumers,
/// JSON-serializable for durable storage by the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSettings {
    pub settings_version: u32,
    /// Positional slack in whole pixels.
    pub pixel_tolerance: u32,
    /// Tolerated change on a 0-100 scale.
    pub percentage_tolerance: f64,
    pub text_similarity_threshold: f64,
    /// Confidence in the calibration itself, driven by sample count.
    pub confidence_level: f64,
    pub ignore_selectors: Vec<String>,
    pub ignore_attributes: Vec<String>,
}

pub(crate) const SETTINGS_VERSION: u32 = 1;
