use std::collections::HashMap;

use layoutlens_core_types::{LayoutSummary, SummarizedNode};
use layoutlens_matcher::{match_nodes, match_semantic, unclaimed_in_b, Correspondence};
use layoutlens_similarity::SimilarityResult;
use layoutlens_summarizer::style::is_overflow_capable;
use tracing::debug;

use crate::model::{
    ChangedAttribute, DiffOptions, DiffPattern, LayoutDiff, NodeChange, Severity,
};

const SMALL_SHIFT_MAX_PX: f64 = 5.0;
const STRUCTURAL_MODIFIED_THRESHOLD: usize = 3;

/// Classify the differences between two summaries into typed change lists.
pub fn diff(
    base: &LayoutSummary,
    current: &LayoutSummary,
    similarity: &SimilarityResult,
    options: &DiffOptions,
) -> LayoutDiff {
    let correspondences = match_nodes(&base.nodes, &current.nodes);
    let index_a: HashMap<&str, &SummarizedNode> =
        base.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    let index_b: HashMap<&str, &SummarizedNode> =
        current.nodes.iter().map(|n| (n.id.as_str(), n)).collect();

    let mut removed = Vec::new();
    let mut modified = Vec::new();
    let mut moved = Vec::new();

    for correspondence in &correspondences {
        let Some(id_b) = correspondence.node_b.as_deref() else {
            removed.push(correspondence.node_a.clone());
            continue;
        };
        let (Some(node_a), Some(node_b)) = (
            index_a.get(correspondence.node_a.as_str()),
            index_b.get(id_b),
        ) else {
            continue;
        };

        let mut changes = Vec::new();
        if correspondence.position_delta > options.move_epsilon_px {
            changes.push(ChangedAttribute::Position);
        }
        if correspondence.size_delta > 0.0 {
            changes.push(ChangedAttribute::Size);
        }
        if node_a.visible != node_b.visible {
            changes.push(ChangedAttribute::Visibility);
        }
        if node_a.style_flags != node_b.style_flags {
            changes.push(ChangedAttribute::Stacking);
        }
        if changes.is_empty() {
            continue;
        }

        let change = NodeChange {
            node_a: correspondence.node_a.clone(),
            node_b: id_b.to_string(),
            position_delta: correspondence.position_delta,
            size_delta: correspondence.size_delta,
            changes,
        };
        // A pure position shift is a move; anything else is a modification,
        // even when it also moved.
        if change.changes == [ChangedAttribute::Position] {
            moved.push(change);
        } else {
            modified.push(change);
        }
    }

    let added = unclaimed_in_b(&correspondences, &current.nodes);
    let severity = Severity::from_overall_pct(similarity.overall * 100.0);
    let patterns = detect_patterns(base, current, &added, &removed, &modified, &moved);
    let group_correspondences = match_groups(base, current, &index_a, &index_b);

    let diff = LayoutDiff {
        base: base.id.clone(),
        current: current.id.clone(),
        added,
        removed,
        modified,
        moved,
        group_correspondences,
        severity,
        patterns,
    };

    debug!(
        target: "layoutlens.events",
        added = diff.added.len(),
        removed = diff.removed.len(),
        modified = diff.modified.len(),
        moved = diff.moved.len(),
        severity = ?diff.severity,
        "diff.generated"
    );

    diff
}

/// Pair up groups through their representative (first-member) nodes using
/// accessibility identity rather than coordinates: a region that kept its
/// label or landmark tag corresponds even after a redesign moved it.
fn match_groups(
    base: &LayoutSummary,
    current: &LayoutSummary,
    index_a: &HashMap<&str, &SummarizedNode>,
    index_b: &HashMap<&str, &SummarizedNode>,
) -> Vec<Correspondence> {
    let representatives = |summary: &LayoutSummary, index: &HashMap<&str, &SummarizedNode>| {
        summary
            .groups
            .iter()
            .filter_map(|group| {
                let id = group.members.first()?;
                index.get(id.as_str()).map(|node| (*node).clone())
            })
            .collect::<Vec<SummarizedNode>>()
    };
    let reps_a = representatives(base, index_a);
    let reps_b = representatives(current, index_b);
    match_semantic(&reps_a, &reps_b)
}

fn detect_patterns(
    base: &LayoutSummary,
    current: &LayoutSummary,
    added: &[String],
    removed: &[String],
    modified: &[NodeChange],
    moved: &[NodeChange],
) -> Vec<DiffPattern> {
    let mut patterns = Vec::new();

    let shifts = moved
        .iter()
        .chain(modified.iter())
        .filter(|change| change.changes.contains(&ChangedAttribute::Position))
        .map(|change| change.position_delta);
    let mut micro = false;
    let mut small = false;
    let mut large = false;
    for delta in shifts {
        if delta <= 1.0 {
            micro = true;
        } else if delta <= SMALL_SHIFT_MAX_PX {
            small = true;
        } else {
            large = true;
        }
    }
    if micro {
        patterns.push(DiffPattern::MicroShift);
    }
    if small {
        patterns.push(DiffPattern::SmallShift);
    }
    if large {
        patterns.push(DiffPattern::LargeShift);
    }

    if modified
        .iter()
        .any(|change| change.changes.contains(&ChangedAttribute::Stacking))
    {
        patterns.push(DiffPattern::StackingOrderChanged);
    }

    let has_changes = !added.is_empty()
        || !removed.is_empty()
        || !modified.is_empty()
        || !moved.is_empty();
    let overflow_capable = base
        .nodes
        .iter()
        .chain(current.nodes.iter())
        .any(|node| is_overflow_capable(&node.style_flags));
    if has_changes && overflow_capable {
        patterns.push(DiffPattern::PotentialOverflow);
    }

    if modified.len() > STRUCTURAL_MODIFIED_THRESHOLD || !added.is_empty() || !removed.is_empty()
    {
        patterns.push(DiffPattern::StructuralShift);
    }

    patterns
}

#[cfg(test)]
mod tests {
    use super::*;
    use layoutlens_core_types::{RawElement, Rect, Viewport};
    use layoutlens_similarity::similarity;
    use layoutlens_summarizer::summarize;
    use std::collections::BTreeMap;

    fn summary_of(elements: &[RawElement]) -> LayoutSummary {
        summarize(elements, Viewport::new(1280, 720)).unwrap()
    }

    fn heading(text: &str, rect: Rect) -> RawElement {
        let mut el = RawElement::new("h1", rect);
        el.text = Some(text.into());
        el
    }

    fn diff_of(base: &LayoutSummary, current: &LayoutSummary) -> LayoutDiff {
        let result = similarity(base, current);
        diff(base, current, &result, &DiffOptions::default())
    }

    #[test]
    fn identical_summaries_produce_an_empty_diff() {
        let elements = [heading("Hello", Rect::new(0.0, 0.0, 200.0, 40.0))];
        let base = summary_of(&elements);
        let current = summary_of(&elements);
        let diff = diff_of(&base, &current);
        assert!(diff.is_empty());
        assert_eq!(diff.severity, Severity::Minimal);
        assert!(diff.patterns.is_empty());
    }

    #[test]
    fn one_pixel_shift_is_a_move_with_micro_tag() {
        let base = summary_of(&[heading("Hello", Rect::new(0.0, 0.0, 200.0, 40.0))]);
        let current = summary_of(&[heading("Hello", Rect::new(0.0, 1.0, 200.0, 40.0))]);
        let diff = diff_of(&base, &current);
        assert_eq!(diff.moved.len(), 1);
        assert!(diff.modified.is_empty());
        assert!(diff.patterns.contains(&DiffPattern::MicroShift));
        assert_eq!(diff.moved[0].changes, vec![ChangedAttribute::Position]);
    }

    #[test]
    fn shift_bands_map_to_patterns() {
        let base = summary_of(&[heading("Hello", Rect::new(0.0, 0.0, 200.0, 40.0))]);
        let small = summary_of(&[heading("Hello", Rect::new(0.0, 4.0, 200.0, 40.0))]);
        let large = summary_of(&[heading("Hello", Rect::new(0.0, 30.0, 200.0, 40.0))]);
        assert!(diff_of(&base, &small)
            .patterns
            .contains(&DiffPattern::SmallShift));
        assert!(diff_of(&base, &large)
            .patterns
            .contains(&DiffPattern::LargeShift));
    }

    #[test]
    fn resize_is_a_modification_not_a_move() {
        let base = summary_of(&[heading("Hello", Rect::new(0.0, 0.0, 200.0, 40.0))]);
        let current = summary_of(&[heading("Hello", Rect::new(0.0, 0.0, 220.0, 40.0))]);
        let diff = diff_of(&base, &current);
        assert!(diff.moved.is_empty());
        assert_eq!(diff.modified.len(), 1);
        assert_eq!(diff.modified[0].changes, vec![ChangedAttribute::Size]);
    }

    #[test]
    fn move_plus_resize_counts_as_modified() {
        let base = summary_of(&[heading("Hello", Rect::new(0.0, 0.0, 200.0, 40.0))]);
        let current = summary_of(&[heading("Hello", Rect::new(0.0, 3.0, 220.0, 40.0))]);
        let diff = diff_of(&base, &current);
        assert!(diff.moved.is_empty());
        assert_eq!(diff.modified.len(), 1);
        assert!(diff.modified[0]
            .changes
            .contains(&ChangedAttribute::Position));
        assert!(diff.modified[0].changes.contains(&ChangedAttribute::Size));
    }

    #[test]
    fn stacking_flag_change_tags_the_diff() {
        let mut with_z = heading("Hello", Rect::new(0.0, 0.0, 200.0, 40.0));
        let mut attrs = BTreeMap::new();
        attrs.insert("style".to_string(), "z-index: 1".to_string());
        with_z.attributes = attrs;
        let mut reordered = with_z.clone();
        reordered
            .attributes
            .insert("style".to_string(), "z-index: 9".to_string());

        let base = summary_of(std::slice::from_ref(&with_z));
        let current = summary_of(std::slice::from_ref(&reordered));
        let diff = diff_of(&base, &current);
        assert_eq!(diff.modified.len(), 1);
        assert!(diff
            .patterns
            .contains(&DiffPattern::StackingOrderChanged));
    }

    #[test]
    fn added_and_removed_nodes_mark_a_structural_shift() {
        let base = summary_of(&[heading("Hello", Rect::new(0.0, 0.0, 200.0, 40.0))]);
        let current = summary_of(&[
            heading("Hello", Rect::new(0.0, 0.0, 200.0, 40.0)),
            RawElement::new("aside", Rect::new(900.0, 0.0, 300.0, 500.0)),
        ]);
        let diff = diff_of(&base, &current);
        assert_eq!(diff.added.len(), 1);
        assert!(diff.removed.is_empty());
        assert!(diff.patterns.contains(&DiffPattern::StructuralShift));
    }

    #[test]
    fn overflow_capable_nodes_tag_nonempty_diffs_only() {
        let mut scroller = RawElement::new("div", Rect::new(0.0, 0.0, 300.0, 300.0));
        scroller
            .attributes
            .insert("style".to_string(), "overflow: scroll".to_string());
        scroller.text = Some("content".into());

        let base = summary_of(std::slice::from_ref(&scroller));
        let same = summary_of(std::slice::from_ref(&scroller));
        assert!(diff_of(&base, &same).patterns.is_empty());

        let mut shifted = scroller.clone();
        shifted.rect = Rect::new(0.0, 2.0, 300.0, 300.0);
        let current = summary_of(std::slice::from_ref(&shifted));
        assert!(diff_of(&base, &current)
            .patterns
            .contains(&DiffPattern::PotentialOverflow));
    }

    #[test]
    fn groups_correspond_by_accessibility_identity_across_moves() {
        let nav = |y: f64| {
            let mut el = RawElement::new("nav", Rect::new(0.0, y, 1280.0, 60.0));
            el.aria = layoutlens_core_types::AriaProps {
                label: Some("Primary".into()),
                ..Default::default()
            };
            el
        };
        // The nav region jumps from the top to the bottom of the page, far
        // beyond what coordinate matching would bridge.
        let base = summary_of(std::slice::from_ref(&nav(0.0)));
        let current = summary_of(std::slice::from_ref(&nav(1900.0)));
        let diff = diff_of(&base, &current);

        let group_match = diff
            .group_correspondences
            .iter()
            .find(|c| c.is_matched())
            .expect("nav group should correspond via its aria-label");
        assert!(group_match.confidence > 0.9);
    }

    #[test]
    fn severity_bands_follow_overall_similarity() {
        assert_eq!(Severity::from_overall_pct(99.0), Severity::Minimal);
        assert_eq!(Severity::from_overall_pct(96.0), Severity::Low);
        assert_eq!(Severity::from_overall_pct(92.0), Severity::Medium);
        assert_eq!(Severity::from_overall_pct(85.0), Severity::High);
        assert_eq!(Severity::from_overall_pct(60.0), Severity::Critical);
    }
}
