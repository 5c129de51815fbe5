use layoutlens_core_types::{
    LayoutSummary, NodeGroup, RawElement, Rect, SemanticType, SummarizedNode, SummaryId, Viewport,
};
use tracing::debug;

use crate::classify::classify;
use crate::errors::SummarizeError;
use crate::style::style_flags;

/// Maximum retained text length per node, in characters.
pub const MAX_TEXT_LEN: usize = 120;

/// Two nodes of the same semantic type closer than this join one group.
pub const GROUP_RADIUS_PX: f64 = 100.0;

const SIGNATURE_DEPTH: usize = 3;

/// Summarize a forest of captured element trees into a [`LayoutSummary`].
///
/// An empty forest yields a summary with empty node and group lists.
pub fn summarize(
    elements: &[RawElement],
    viewport: Viewport,
) -> Result<LayoutSummary, SummarizeError> {
    if viewport.area() == 0.0 {
        return Err(SummarizeError::EmptyViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }

    let mut nodes = Vec::new();
    for element in elements {
        flatten(element, viewport, &mut nodes);
    }
    let groups = build_groups(&nodes);

    debug!(
        target: "layoutlens.events",
        node_count = nodes.len(),
        group_count = groups.len(),
        %viewport,
        "summary.created"
    );

    Ok(LayoutSummary {
        id: SummaryId::new(),
        viewport,
        nodes,
        groups,
    })
}

/// Convenience wrapper for a single-rooted tree.
pub fn summarize_tree(
    root: &RawElement,
    viewport: Viewport,
) -> Result<LayoutSummary, SummarizeError> {
    summarize(std::slice::from_ref(root), viewport)
}

fn flatten(element: &RawElement, viewport: Viewport, out: &mut Vec<SummarizedNode>) {
    let ordinal = out.len();
    out.push(summarize_node(element, ordinal, viewport));
    for child in &element.children {
        flatten(child, viewport, out);
    }
}

fn summarize_node(element: &RawElement, ordinal: usize, viewport: Viewport) -> SummarizedNode {
    let tag = element.tag.to_ascii_lowercase();
    let text = element
        .text
        .as_deref()
        .map(truncate_text)
        .filter(|t| !t.is_empty());
    let semantic_type = classify(
        &tag,
        element.aria.role.as_deref(),
        element.class.as_deref(),
        text.as_deref(),
    );

    let mut signature = Vec::new();
    collect_signature(&element.children, SIGNATURE_DEPTH, &mut signature);
    signature.sort();
    signature.dedup();

    let flags = element
        .attributes
        .get("style")
        .map(|style| style_flags(style))
        .unwrap_or_default();

    SummarizedNode {
        id: format!("{tag}:{ordinal}"),
        dom_id: element.id.clone().filter(|id| !id.is_empty()),
        tag,
        role: element.aria.role.clone(),
        class: element.class.clone().filter(|c| !c.is_empty()),
        aria_label: element.aria.label.clone().filter(|l| !l.is_empty()),
        aria_labelledby: element.aria.labelledby.clone().filter(|l| !l.is_empty()),
        aria_describedby: element.aria.describedby.clone().filter(|l| !l.is_empty()),
        states: element.aria.bool_states(),
        importance: importance(element, semantic_type, viewport),
        text,
        rect: element.rect,
        semantic_type,
        child_count: element.children.len(),
        visible: element.visible && element.opacity > 0.0,
        opacity: element.opacity,
        style_flags: flags,
        descendant_signature: signature,
    }
}

/// Importance in [0, 100]: a base score per semantic type, plus area and
/// vertical-position contributions, plus small bonuses for identity hints.
fn importance(element: &RawElement, semantic_type: SemanticType, viewport: Viewport) -> u8 {
    let mut score = f64::from(semantic_type.base_importance());

    let area_ratio = element.rect.area() / viewport.area();
    score += (area_ratio * 100.0).min(20.0);

    let vertical = 1.0 - element.rect.y / f64::from(viewport.height);
    score += (vertical * 10.0).clamp(0.0, 10.0);

    if element.id.as_deref().map_or(false, |id| !id.is_empty()) {
        score += 5.0;
    }
    if let Some(class) = element.class.as_deref() {
        let lower = class.to_ascii_lowercase();
        if lower.split_whitespace().any(|t| t.contains("primary")) {
            score += 5.0;
        }
        if lower.split_whitespace().any(|t| t.contains("main")) {
            score += 5.0;
        }
    }

    score.clamp(0.0, 100.0).round() as u8
}

fn collect_signature(children: &[RawElement], depth: usize, out: &mut Vec<String>) {
    if depth == 0 {
        return;
    }
    for child in children {
        let tag = child.tag.to_ascii_lowercase();
        match child.aria.role.as_deref() {
            Some(role) if !role.is_empty() => out.push(format!("{tag}[{role}]")),
            _ => out.push(tag),
        }
        collect_signature(&child.children, depth - 1, out);
    }
}

/// Single-pass greedy clustering in summarization order. A node joins the
/// first open group of its semantic type whose seed lies within
/// [`GROUP_RADIUS_PX`]; otherwise it opens a new group. Order-dependent on
/// purpose: downstream calibration relies on group identity being
/// reproducible for the same input order.
fn build_groups(nodes: &[SummarizedNode]) -> Vec<NodeGroup> {
    struct OpenGroup {
        group_type: SemanticType,
        seed: Rect,
        bounds: Rect,
        members: Vec<String>,
    }

    let mut open: Vec<OpenGroup> = Vec::new();
    for node in nodes {
        let slot = open.iter_mut().find(|group| {
            group.group_type == node.semantic_type
                && group.seed.origin_distance(&node.rect) < GROUP_RADIUS_PX
        });
        match slot {
            Some(group) => {
                group.bounds = group.bounds.union(&node.rect);
                group.members.push(node.id.clone());
            }
            None => open.push(OpenGroup {
                group_type: node.semantic_type,
                seed: node.rect,
                bounds: node.rect,
                members: vec![node.id.clone()],
            }),
        }
    }

    open.into_iter()
        .map(|group| NodeGroup {
            group_type: group.group_type,
            bounds: group.bounds,
            members: group.members,
        })
        .collect()
}

fn truncate_text(text: &str) -> String {
    text.trim().chars().take(MAX_TEXT_LEN).collect()
}
