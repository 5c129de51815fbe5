//! Accessibility-oriented matcher used for group-level correspondence.
//!
//! Unlike the weighted-sum coordinate matcher, this variant walks a strict
//! priority ladder of identity signals and assigns a fixed confidence per
//! rung, then folds in a small structural adjustment.

use std::collections::HashSet;

use layoutlens_core_types::SummarizedNode;
use tracing::debug;

use crate::coordinate::jaccard;
use crate::model::{Correspondence, MatchReason};

/// Correspondences at or below this confidence are rejected.
pub const GROUP_ACCEPT_THRESHOLD: f64 = 0.7;

const CONFIDENCE_ARIA_LABEL: f64 = 0.95;
const CONFIDENCE_ARIA_LABELLEDBY: f64 = 0.92;
const CONFIDENCE_ARIA_DESCRIBEDBY: f64 = 0.90;
const CONFIDENCE_DOM_ID: f64 = 0.93;
const CONFIDENCE_ROLE_UNIQUE: f64 = 0.88;
const CONFIDENCE_ROLE_COMMON: f64 = 0.75;
const TAG_ROLE_BOOST: f64 = 1.1;
const CONFIDENCE_CAP: f64 = 0.98;
const STRUCTURE_WEIGHT: f64 = 0.1;

const LANDMARK_TAGS: &[&str] = &["main", "header", "footer", "nav", "aside"];
const MODERATE_TAGS: &[&str] = &["article", "section", "form", "dialog", "figure"];
const UNIQUE_ROLES: &[&str] = &["main", "banner", "contentinfo", "search", "form"];

/// Match nodes by accessibility identity. Claiming is exclusive, same as the
/// coordinate matcher.
pub fn match_semantic(a: &[SummarizedNode], b: &[SummarizedNode]) -> Vec<Correspondence> {
    let mut claimed = vec![false; b.len()];
    let mut correspondences = Vec::with_capacity(a.len());

    for node_a in a {
        let mut best: Option<(usize, f64, Vec<MatchReason>)> = None;
        for (idx, node_b) in b.iter().enumerate() {
            if claimed[idx] {
                continue;
            }
            let Some((primary, mut reasons)) = primary_confidence(node_a, node_b) else {
                continue;
            };
            let overlap = signature_overlap(node_a, node_b);
            let confidence = primary * (1.0 - STRUCTURE_WEIGHT) + overlap * STRUCTURE_WEIGHT;
            if overlap > 0.0
                && !(node_a.descendant_signature.is_empty()
                    && node_b.descendant_signature.is_empty())
            {
                reasons.push(MatchReason::StructureOverlap);
            }
            if best.as_ref().map_or(true, |(_, top, _)| confidence > *top) {
                best = Some((idx, confidence, reasons));
            }
        }

        match best {
            Some((idx, confidence, reasons)) if confidence > GROUP_ACCEPT_THRESHOLD => {
                claimed[idx] = true;
                correspondences.push(Correspondence::matched(
                    node_a, &b[idx], confidence, reasons,
                ));
            }
            _ => correspondences.push(Correspondence::unmatched(node_a)),
        }
    }

    debug!(
        target: "layoutlens.events",
        total_a = a.len(),
        matched = correspondences.iter().filter(|c| c.is_matched()).count(),
        "matcher.semantic.completed"
    );

    correspondences
}

/// Walk the identity ladder; the first rung that fires decides the primary
/// confidence.
fn primary_confidence(
    a: &SummarizedNode,
    b: &SummarizedNode,
) -> Option<(f64, Vec<MatchReason>)> {
    if both_equal(&a.aria_label, &b.aria_label) {
        return Some((CONFIDENCE_ARIA_LABEL, vec![MatchReason::AriaLabel]));
    }
    if both_equal(&a.aria_labelledby, &b.aria_labelledby) {
        return Some((CONFIDENCE_ARIA_LABELLEDBY, vec![MatchReason::AriaLabelledBy]));
    }
    if both_equal(&a.aria_describedby, &b.aria_describedby) {
        return Some((CONFIDENCE_ARIA_DESCRIBEDBY, vec![MatchReason::AriaDescribedBy]));
    }
    if both_equal(&a.dom_id, &b.dom_id) {
        return Some((CONFIDENCE_DOM_ID, vec![MatchReason::DomId]));
    }
    if a.tag == b.tag {
        let mut confidence = tag_confidence(&a.tag);
        let mut reasons = vec![MatchReason::SemanticTag];
        if both_equal(&a.role, &b.role) {
            confidence = (confidence * TAG_ROLE_BOOST).min(CONFIDENCE_CAP);
            reasons.push(MatchReason::Role);
        }
        return Some((confidence, reasons));
    }
    if both_equal(&a.role, &b.role) {
        let role = a.role.as_deref().unwrap_or_default();
        let confidence = if UNIQUE_ROLES.contains(&role) {
            CONFIDENCE_ROLE_UNIQUE
        } else {
            CONFIDENCE_ROLE_COMMON
        };
        return Some((confidence, vec![MatchReason::Role]));
    }
    None
}

/// Jaccard overlap of the two descendant signatures; the secondary signal
/// folded in at [`STRUCTURE_WEIGHT`] once a primary rung has fired.
fn signature_overlap(a: &SummarizedNode, b: &SummarizedNode) -> f64 {
    let sig_a: HashSet<&str> = a.descendant_signature.iter().map(String::as_str).collect();
    let sig_b: HashSet<&str> = b.descendant_signature.iter().map(String::as_str).collect();
    jaccard(&sig_a, &sig_b)
}

fn tag_confidence(tag: &str) -> f64 {
    if LANDMARK_TAGS.contains(&tag) {
        0.90
    } else if MODERATE_TAGS.contains(&tag) {
        0.80
    } else {
        0.70
    }
}

fn both_equal(a: &Option<String>, b: &Option<String>) -> bool {
    matches!((a, b), (Some(left), Some(right)) if left == right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use layoutlens_core_types::{AriaProps, RawElement, Rect, Viewport};
    use layoutlens_summarizer::summarize;

    fn nodes_from(elements: &[RawElement]) -> Vec<SummarizedNode> {
        summarize(elements, Viewport::new(1280, 720)).unwrap().nodes
    }

    fn labeled(tag: &str, label: &str) -> RawElement {
        let mut el = RawElement::new(tag, Rect::new(0.0, 0.0, 100.0, 50.0));
        el.aria = AriaProps {
            label: Some(label.into()),
            ..Default::default()
        };
        el
    }

    #[test]
    fn aria_label_outranks_dom_id() {
        let mut left = labeled("div", "Primary navigation");
        left.id = Some("other".into());
        let mut decoy = RawElement::new("div", Rect::new(0.0, 0.0, 100.0, 50.0));
        decoy.id = Some("other".into());
        let target = labeled("div", "Primary navigation");

        let a = nodes_from(&[left]);
        let b = nodes_from(&[decoy, target]);
        let matches = match_semantic(&a, &b);
        assert_eq!(matches[0].node_b.as_deref(), Some(b[1].id.as_str()));
        assert!(matches[0].reasons.contains(&MatchReason::AriaLabel));
        assert!((matches[0].confidence - 0.955).abs() < 1e-9);
    }

    #[test]
    fn landmark_tag_confidence_tiers() {
        let a = nodes_from(&[RawElement::new("main", Rect::default())]);
        let b = nodes_from(&[RawElement::new("main", Rect::default())]);
        let matches = match_semantic(&a, &b);
        // 0.90 primary, signatures both empty so the adjustment is 0.9*0.9 + 0.1.
        assert!((matches[0].confidence - 0.91).abs() < 1e-9);

        let a = nodes_from(&[RawElement::new("section", Rect::default())]);
        let b = nodes_from(&[RawElement::new("section", Rect::default())]);
        let matches = match_semantic(&a, &b);
        assert!((matches[0].confidence - 0.82).abs() < 1e-9);
    }

    #[test]
    fn common_tag_alone_is_rejected() {
        let a = nodes_from(&[RawElement::new("div", Rect::default())]);
        let b = nodes_from(&[RawElement::new("div", Rect::default())]);
        let matches = match_semantic(&a, &b);
        // 0.70 * 0.9 + 0.1 = 0.73 > 0.7: accepted, barely.
        assert!(matches[0].is_matched());
        assert!((matches[0].confidence - 0.73).abs() < 1e-9);
    }

    #[test]
    fn tag_role_agreement_boosts_confidence() {
        let mut el = RawElement::new("nav", Rect::default());
        el.aria = AriaProps {
            role: Some("navigation".into()),
            ..Default::default()
        };
        let a = nodes_from(std::slice::from_ref(&el));
        let b = nodes_from(std::slice::from_ref(&el));
        let matches = match_semantic(&a, &b);
        // min(0.90 * 1.1, 0.98) = 0.98 primary, adjusted to 0.98*0.9 + 0.1.
        assert!((matches[0].confidence - 0.982).abs() < 1e-9);
        assert!(matches[0].reasons.contains(&MatchReason::Role));
    }

    #[test]
    fn unique_role_beats_common_role() {
        let mut searchbox = RawElement::new("div", Rect::default());
        searchbox.aria = AriaProps {
            role: Some("search".into()),
            ..Default::default()
        };
        let mut other = RawElement::new("span", Rect::default());
        other.aria = AriaProps {
            role: Some("search".into()),
            ..Default::default()
        };
        let a = nodes_from(std::slice::from_ref(&searchbox));
        let b = nodes_from(std::slice::from_ref(&other));
        let matches = match_semantic(&a, &b);
        // Tags differ, so the role rung decides: 0.88 * 0.9 + 0.1.
        assert!((matches[0].confidence - 0.892).abs() < 1e-9);
    }

    #[test]
    fn structure_overlap_separates_equal_primaries() {
        let mut with_list = RawElement::new("section", Rect::default());
        with_list.children = vec![
            RawElement::new("ul", Rect::default()),
            RawElement::new("li", Rect::default()),
        ];
        let bare = RawElement::new("section", Rect::new(300.0, 0.0, 100.0, 50.0));

        let a = nodes_from(std::slice::from_ref(&with_list));
        let b = nodes_from(&[bare, with_list.clone()]);
        let matches = match_semantic(&a, &b);
        // Flattening makes three A-nodes; the section must pick the candidate
        // with the matching descendant signature.
        let section_match = matches
            .iter()
            .find(|m| m.node_a.starts_with("section"))
            .unwrap();
        assert_eq!(section_match.node_b.as_deref(), Some(b[1].id.as_str()));
        assert!(section_match
            .reasons
            .contains(&MatchReason::StructureOverlap));
    }

    #[test]
    fn claiming_is_exclusive() {
        let el = labeled("div", "same");
        let a = nodes_from(&[el.clone(), el.clone()]);
        let b = nodes_from(std::slice::from_ref(&el));
        let matches = match_semantic(&a, &b);
        assert!(matches[0].is_matched());
        assert!(!matches[1].is_matched());
    }
}
