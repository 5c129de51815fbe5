use std::fmt;

use layoutlens_core_types::SummarizedNode;
use serde::{Deserialize, Serialize};

/// Signal that contributed to a match decision.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchReason {
    TagEqual,
    SemanticTypeEqual,
    ClassOverlap,
    Proximity,
    AriaLabel,
    AriaLabelledBy,
    AriaDescribedBy,
    DomId,
    SemanticTag,
    Role,
    StructureOverlap,
}

impl fmt::Display for MatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchReason::TagEqual => "tag-equal",
            MatchReason::SemanticTypeEqual => "semantic-type-equal",
            MatchReason::ClassOverlap => "class-overlap",
            MatchReason::Proximity => "proximity",
            MatchReason::AriaLabel => "aria-label",
            MatchReason::AriaLabelledBy => "aria-labelledby",
            MatchReason::AriaDescribedBy => "aria-describedby",
            MatchReason::DomId => "dom-id",
            MatchReason::SemanticTag => "semantic-tag",
            MatchReason::Role => "role",
            MatchReason::StructureOverlap => "structure-overlap",
        };
        f.write_str(name)
    }
}

/// A claimed pairing between a node in snapshot A and (optionally) one in
/// snapshot B. Correspondences for one comparison form a partial injective
/// mapping: a B-node, once claimed, is never offered to a later A-node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Correspondence {
    pub node_a: String,
    pub node_b: Option<String>,
    pub confidence: f64,
    pub reasons: Vec<MatchReason>,
    /// Euclidean origin delta, 0 when unmatched.
    pub position_delta: f64,
    /// Euclidean width/height delta, 0 when unmatched.
    pub size_delta: f64,
}

impl Correspondence {
    pub fn unmatched(node_a: &SummarizedNode) -> Self {
        Self {
            node_a: node_a.id.clone(),
            node_b: None,
            confidence: 0.0,
            reasons: Vec::new(),
            position_delta: 0.0,
            size_delta: 0.0,
        }
    }

    pub fn matched(
        node_a: &SummarizedNode,
        node_b: &SummarizedNode,
        confidence: f64,
        reasons: Vec<MatchReason>,
    ) -> Self {
        Self {
            node_a: node_a.id.clone(),
            node_b: Some(node_b.id.clone()),
            confidence,
            reasons,
            position_delta: node_a.rect.origin_distance(&node_b.rect),
            size_delta: node_a.rect.size_delta(&node_b.rect),
        }
    }

    pub fn is_matched(&self) -> bool {
        self.node_b.is_some()
    }
}
