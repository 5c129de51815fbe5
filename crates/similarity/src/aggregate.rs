use std::collections::HashMap;

use layoutlens_core_types::{LayoutSummary, SummarizedNode};
use layoutlens_matcher::{compare_texts, match_nodes, Correspondence};
use tracing::debug;

use crate::model::{
    AccessibilityDetail, CoordinateDetail, SimilarityDetails, SimilarityResult, TextLengthDetail,
};

const W_COORDINATE: f64 = 0.3;
const W_ACCESSIBILITY: f64 = 0.2;
const W_TEXT: f64 = 0.3;
const W_TEXT_LENGTH: f64 = 0.2;

const POSITION_DELTA_SCALE_PX: f64 = 50.0;
const SIZE_DELTA_SCALE_PX: f64 = 30.0;

/// Compare two layout summaries along four dimensions and combine them into
/// one overall score in [0, 1].
pub fn similarity(a: &LayoutSummary, b: &LayoutSummary) -> SimilarityResult {
    if a.nodes.is_empty() && b.nodes.is_empty() {
        return identical();
    }

    let correspondences = match_nodes(&a.nodes, &b.nodes);
    let index_a: HashMap<&str, &SummarizedNode> =
        a.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    let index_b: HashMap<&str, &SummarizedNode> =
        b.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    let pairs: Vec<(&SummarizedNode, &SummarizedNode)> = correspondences
        .iter()
        .filter_map(|c| {
            let node_b = c.node_b.as_deref()?;
            Some((*index_a.get(c.node_a.as_str())?, *index_b.get(node_b)?))
        })
        .collect();

    let coordinate = coordinate_score(a, b, &correspondences);
    let accessibility = accessibility_score(&pairs);
    let text = compare_texts(pairs.iter().map(|(na, nb)| {
        (
            na.text.as_deref().unwrap_or(""),
            nb.text.as_deref().unwrap_or(""),
        )
    }));
    let text_length = text_length_score(a, b, &pairs);

    let coordinate_score_value = 0.5 * coordinate.position_score
        + 0.3 * coordinate.size_score
        + 0.2 * coordinate.match_ratio;
    let accessibility_score_value = 0.4 * accessibility.role_score
        + 0.4 * accessibility.label_score
        + 0.2 * accessibility.state_score;
    let text_score_value = text.avg_similarity;
    let text_length_score_value = 0.5 * text_length.total_ratio + 0.5 * text_length.pair_ratio;

    let overall = W_COORDINATE * coordinate_score_value
        + W_ACCESSIBILITY * accessibility_score_value
        + W_TEXT * text_score_value
        + W_TEXT_LENGTH * text_length_score_value;

    debug!(
        target: "layoutlens.events",
        overall,
        coordinate = coordinate_score_value,
        accessibility = accessibility_score_value,
        text = text_score_value,
        text_length = text_length_score_value,
        "similarity.computed"
    );

    SimilarityResult {
        overall,
        coordinate: coordinate_score_value,
        accessibility: accessibility_score_value,
        text: text_score_value,
        text_length: text_length_score_value,
        details: SimilarityDetails {
            coordinate,
            accessibility,
            text,
            text_length,
        },
    }
}

fn identical() -> SimilarityResult {
    SimilarityResult {
        overall: 1.0,
        coordinate: 1.0,
        accessibility: 1.0,
        text: 1.0,
        text_length: 1.0,
        details: SimilarityDetails {
            coordinate: CoordinateDetail {
                match_ratio: 1.0,
                position_score: 1.0,
                size_score: 1.0,
                ..Default::default()
            },
            accessibility: AccessibilityDetail {
                role_score: 1.0,
                label_score: 1.0,
                state_score: 1.0,
                ..Default::default()
            },
            text: layoutlens_matcher::TextComparison {
                avg_similarity: 1.0,
                ..Default::default()
            },
            text_length: TextLengthDetail {
                total_ratio: 1.0,
                pair_ratio: 1.0,
                ..Default::default()
            },
        },
    }
}

fn coordinate_score(
    a: &LayoutSummary,
    b: &LayoutSummary,
    correspondences: &[Correspondence],
) -> CoordinateDetail {
    let matched: Vec<&Correspondence> =
        correspondences.iter().filter(|c| c.is_matched()).collect();
    let matched_count = matched.len();
    let denominator = a.nodes.len().max(b.nodes.len());
    let match_ratio = if denominator == 0 {
        1.0
    } else {
        matched_count as f64 / denominator as f64
    };

    let (avg_position_delta, avg_size_delta, position_score, size_score) = if matched_count == 0 {
        // No applicable pairs: positions and sizes are vacuously similar.
        (0.0, 0.0, 1.0, 1.0)
    } else {
        let position_sum: f64 = matched.iter().map(|c| c.position_delta).sum();
        let size_sum: f64 = matched.iter().map(|c| c.size_delta).sum();
        let avg_position = position_sum / matched_count as f64;
        let avg_size = size_sum / matched_count as f64;
        (
            avg_position,
            avg_size,
            (1.0 - avg_position / POSITION_DELTA_SCALE_PX).max(0.0),
            (1.0 - avg_size / SIZE_DELTA_SCALE_PX).max(0.0),
        )
    };

    CoordinateDetail {
        total_a: a.nodes.len(),
        total_b: b.nodes.len(),
        matched: matched_count,
        match_ratio,
        avg_position_delta,
        avg_size_delta,
        position_score,
        size_score,
    }
}

fn accessibility_score(pairs: &[(&SummarizedNode, &SummarizedNode)]) -> AccessibilityDetail {
    let mut detail = AccessibilityDetail::default();

    for (na, nb) in pairs {
        if na.role.is_some() || nb.role.is_some() {
            detail.role_pairs += 1;
            if na.role == nb.role {
                detail.role_matches += 1;
            }
        }
        if na.aria_label.is_some() || nb.aria_label.is_some() {
            detail.label_pairs += 1;
            if na.aria_label == nb.aria_label {
                detail.label_matches += 1;
            }
        }
        let keys: std::collections::BTreeSet<&String> =
            na.states.keys().chain(nb.states.keys()).collect();
        for key in keys {
            detail.state_keys += 1;
            let left = na.states.get(key).copied().unwrap_or(false);
            let right = nb.states.get(key).copied().unwrap_or(false);
            if left == right {
                detail.state_matches += 1;
            }
        }
    }

    detail.role_score = ratio_or_one(detail.role_matches, detail.role_pairs);
    detail.label_score = ratio_or_one(detail.label_matches, detail.label_pairs);
    detail.state_score = ratio_or_one(detail.state_matches, detail.state_keys);
    detail
}

fn text_length_score(
    a: &LayoutSummary,
    b: &LayoutSummary,
    pairs: &[(&SummarizedNode, &SummarizedNode)],
) -> TextLengthDetail {
    let total_a: usize = a.nodes.iter().map(SummarizedNode::text_len).sum();
    let total_b: usize = b.nodes.iter().map(SummarizedNode::text_len).sum();
    let total_ratio = if total_a == 0 && total_b == 0 {
        1.0
    } else {
        total_a.min(total_b) as f64 / total_a.max(total_b) as f64
    };

    let mut pair_count = 0usize;
    let mut pair_sum = 0.0;
    for (na, nb) in pairs {
        let la = na.text_len();
        let lb = nb.text_len();
        if la == 0 && lb == 0 {
            continue;
        }
        pair_count += 1;
        pair_sum += la.min(lb) as f64 / la.max(lb) as f64;
    }
    let pair_ratio = if pair_count == 0 {
        1.0
    } else {
        pair_sum / pair_count as f64
    };

    TextLengthDetail {
        total_len_a: total_a,
        total_len_b: total_b,
        total_ratio,
        pair_ratio,
        pairs: pair_count,
    }
}

fn ratio_or_one(hits: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        hits as f64 / total as f64
    }
}
