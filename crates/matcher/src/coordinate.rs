//! General-purpose coordinate/text matcher.

use std::collections::HashSet;

use layoutlens_core_types::SummarizedNode;
use tracing::debug;

use crate::model::{Correspondence, MatchReason};

/// A candidate below or at this score is left unmatched.
pub const ACCEPT_THRESHOLD: f64 = 0.3;

/// Positional score falls linearly to zero at this origin distance.
const DISTANCE_SCALE_PX: f64 = 200.0;

const W_TAG: f64 = 0.3;
const W_SEMANTIC_TYPE: f64 = 0.2;
const W_CLASS: f64 = 0.2;
const W_PROXIMITY: f64 = 0.3;

/// Find a best-effort one-to-one correspondence between two node lists.
///
/// Greedy in A's input order: each A-node takes the highest-scoring still
/// unclaimed B-node (ties go to the first encountered), then that B-node
/// leaves the pool. Deliberately order-sensitive — do not replace with a
/// globally optimal assignment; downstream tolerance constants were derived
/// against this behavior.
pub fn match_nodes(a: &[SummarizedNode], b: &[SummarizedNode]) -> Vec<Correspondence> {
    let mut claimed = vec![false; b.len()];
    let token_sets: Vec<HashSet<&str>> = b
        .iter()
        .map(|node| node.class_tokens().into_iter().collect())
        .collect();

    let mut correspondences = Vec::with_capacity(a.len());
    for node_a in a {
        let tokens_a: HashSet<&str> = node_a.class_tokens().into_iter().collect();

        let mut best: Option<(usize, f64, Vec<MatchReason>)> = None;
        for (idx, node_b) in b.iter().enumerate() {
            if claimed[idx] {
                continue;
            }
            let (score, reasons) = score_pair(node_a, node_b, &tokens_a, &token_sets[idx]);
            if best.as_ref().map_or(true, |(_, top, _)| score > *top) {
                best = Some((idx, score, reasons));
            }
        }

        match best {
            Some((idx, score, reasons)) if score > ACCEPT_THRESHOLD => {
                claimed[idx] = true;
                correspondences.push(Correspondence::matched(node_a, &b[idx], score, reasons));
            }
            _ => correspondences.push(Correspondence::unmatched(node_a)),
        }
    }

    debug!(
        target: "layoutlens.events",
        total_a = a.len(),
        total_b = b.len(),
        matched = correspondences.iter().filter(|c| c.is_matched()).count(),
        "matcher.completed"
    );

    correspondences
}

/// B-node ids never claimed by any correspondence (the "added" set).
pub fn unclaimed_in_b(correspondences: &[Correspondence], b: &[SummarizedNode]) -> Vec<String> {
    let claimed: HashSet<&str> = correspondences
        .iter()
        .filter_map(|c| c.node_b.as_deref())
        .collect();
    b.iter()
        .filter(|node| !claimed.contains(node.id.as_str()))
        .map(|node| node.id.clone())
        .collect()
}

fn score_pair(
    a: &SummarizedNode,
    b: &SummarizedNode,
    tokens_a: &HashSet<&str>,
    tokens_b: &HashSet<&str>,
) -> (f64, Vec<MatchReason>) {
    let mut score = 0.0;
    let mut reasons = Vec::new();

    if a.tag == b.tag {
        score += W_TAG;
        reasons.push(MatchReason::TagEqual);
    }
    if a.semantic_type == b.semantic_type {
        score += W_SEMANTIC_TYPE;
        reasons.push(MatchReason::SemanticTypeEqual);
    }

    let class_overlap = jaccard(tokens_a, tokens_b);
    score += W_CLASS * class_overlap;
    if class_overlap > 0.0 && (!tokens_a.is_empty() || !tokens_b.is_empty()) {
        reasons.push(MatchReason::ClassOverlap);
    }

    let proximity = (1.0 - a.rect.origin_distance(&b.rect) / DISTANCE_SCALE_PX).max(0.0);
    score += W_PROXIMITY * proximity;
    if proximity > 0.0 {
        reasons.push(MatchReason::Proximity);
    }

    (score, reasons)
}

/// Jaccard overlap of two token sets; two empty sets count as identical.
pub(crate) fn jaccard(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}
