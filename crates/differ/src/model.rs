use std::fmt;

use layoutlens_core_types::SummaryId;
use layoutlens_matcher::Correspondence;
use serde::{Deserialize, Serialize};

/// Options steering change classification.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DiffOptions {
    /// A matched pair whose position delta exceeds this is a move. The
    /// default of zero means every nonzero shift counts — single-pixel
    /// drift matters here.
    pub move_epsilon_px: f64,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self { move_epsilon_px: 0.0 }
    }
}

/// Attribute of a matched pair that differed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangedAttribute {
    Position,
    Size,
    Visibility,
    Stacking,
}

/// One modified or moved pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeChange {
    pub node_a: String,
    pub node_b: String,
    pub position_delta: f64,
    pub size_delta: f64,
    pub changes: Vec<ChangedAttribute>,
}

/// Severity band derived from the overall similarity percentage.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minimal,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn from_overall_pct(pct: f64) -> Self {
        if pct >= 98.0 {
            Severity::Minimal
        } else if pct >= 95.0 {
            Severity::Low
        } else if pct >= 90.0 {
            Severity::Medium
        } else if pct >= 80.0 {
            Severity::High
        } else {
            Severity::Critical
        }
    }
}

/// Advisory difference pattern. Metadata for reporting, never a pass/fail
/// signal.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffPattern {
    MicroShift,
    SmallShift,
    LargeShift,
    StackingOrderChanged,
    PotentialOverflow,
    StructuralShift,
}

impl fmt::Display for DiffPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiffPattern::MicroShift => "1px micro-shift",
            DiffPattern::SmallShift => "small shift",
            DiffPattern::LargeShift => "large shift",
            DiffPattern::StackingOrderChanged => "stacking order changed",
            DiffPattern::PotentialOverflow => "potential overflow",
            DiffPattern::StructuralShift => "structural layout shift",
        };
        f.write_str(name)
    }
}

/// Typed diff between two layout summaries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutDiff {
    pub base: SummaryId,
    pub current: SummaryId,
    /// Node ids in the current summary with no counterpart in the base.
    pub added: Vec<String>,
    /// Node ids in the base summary with no counterpart in the current.
    pub removed: Vec<String>,
    pub modified: Vec<NodeChange>,
    pub moved: Vec<NodeChange>,
    /// Accessibility-identity pairings between the groups' representative
    /// nodes, for report sections that track regions rather than nodes.
    pub group_correspondences: Vec<Correspondence>,
    pub severity: Severity,
    pub patterns: Vec<DiffPattern>,
}

impl LayoutDiff {
    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len() + self.moved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.change_count() == 0
    }
}
