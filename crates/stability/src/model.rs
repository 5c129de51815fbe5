use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Nodes scoring below this are considered unstable.
pub const STABLE_THRESHOLD: f64 = 0.9;

/// Rectangle rounded to the 5 px grid, used to bucket observed positions.
pub type PositionBucket = (i64, i64, i64, i64);

/// Per-node record of the values observed across calibration iterations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeVariation {
    /// Identity the node was tracked under (its summarization id, or a
    /// tag/class/position fallback when ids did not line up).
    pub key: String,
    pub tag: String,
    pub class: Option<String>,
    pub dom_id: Option<String>,
    /// Iterations this node was observed in.
    pub observations: usize,
    pub position_buckets: BTreeSet<PositionBucket>,
    pub texts: BTreeSet<String>,
    pub visibilities: BTreeSet<bool>,
    pub importances: BTreeSet<u8>,
    /// Whether the node ever carried text.
    pub text_observed: bool,
    /// Largest origin shift between consecutive observations, in raw pixels.
    pub max_position_delta: f64,
    pub stability: f64,
}

impl NodeVariation {
    pub fn distinct_positions(&self) -> usize {
        self.position_buckets.len()
    }

    pub fn distinct_texts(&self) -> usize {
        self.texts.len()
    }

    pub fn distinct_visibilities(&self) -> usize {
        self.visibilities.len()
    }

    pub fn distinct_importances(&self) -> usize {
        self.importances.len()
    }

    pub fn is_stable(&self) -> bool {
        self.stability >= STABLE_THRESHOLD
    }

    pub fn has_text_variation(&self) -> bool {
        self.texts.len() > 1
    }

    pub fn has_visibility_variation(&self) -> bool {
        self.visibilities.len() > 1
    }
}

/// Outcome of analyzing N summaries of the same page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StabilityReport {
    pub iterations: usize,
    pub profiles: Vec<NodeVariation>,
    /// Percentage of tracked nodes that are stable.
    pub node_stability_pct: f64,
    /// Percentage of groups with a near-position counterpart in the next
    /// iteration, when group data was available.
    pub group_stability_pct: Option<f64>,
    /// Combined overall stability percentage.
    pub overall_pct: f64,
}

impl StabilityReport {
    pub fn unstable(&self) -> impl Iterator<Item = &NodeVariation> {
        self.profiles.iter().filter(|profile| !profile.is_stable())
    }

    pub fn unstable_count(&self) -> usize {
        self.unstable().count()
    }
}
