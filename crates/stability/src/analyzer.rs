use std::collections::HashSet;

use layoutlens_core_types::{LayoutSummary, Rect, SummarizedNode};
use tracing::debug;

use crate::errors::StabilityError;
use crate::model::{NodeVariation, PositionBucket, StabilityReport, STABLE_THRESHOLD};

/// Fallback identity accepts a node whose origin moved at most this far.
const IDENTITY_RADIUS_PX: f64 = 50.0;

/// Group counterparts must stay within this on both axes.
const GROUP_DRIFT_PX: f64 = 50.0;

const BUCKET_PX: f64 = 5.0;

const W_POSITION: f64 = 0.4;
const W_TEXT: f64 = 0.3;
const W_VISIBILITY: f64 = 0.2;
const W_IMPORTANCE: f64 = 0.1;

const W_NODE: f64 = 0.7;
const W_GROUP: f64 = 0.3;

struct Profile {
    variation: NodeVariation,
    last_rect: Rect,
}

/// Track per-node variation across repeated summaries of the same page and
/// derive an overall stability score.
pub fn analyze(summaries: &[LayoutSummary]) -> Result<StabilityReport, StabilityError> {
    if summaries.len() < 2 {
        return Err(StabilityError::InsufficientSamples {
            got: summaries.len(),
        });
    }

    let iterations = summaries.len();
    let mut profiles: Vec<Profile> = Vec::new();

    for summary in summaries {
        let mut claimed: HashSet<usize> = HashSet::new();
        for node in &summary.nodes {
            let slot = resolve_identity(&profiles, &claimed, node);
            match slot {
                Some(idx) => {
                    claimed.insert(idx);
                    observe(&mut profiles[idx], node);
                }
                None => {
                    let idx = profiles.len();
                    profiles.push(new_profile(node));
                    claimed.insert(idx);
                }
            }
        }
    }

    let iterations_f = iterations as f64;
    for profile in &mut profiles {
        profile.variation.stability = stability_score(&profile.variation, iterations_f);
    }

    let total = profiles.len();
    let stable = profiles
        .iter()
        .filter(|p| p.variation.stability >= STABLE_THRESHOLD)
        .count();
    let node_stability_pct = if total == 0 {
        100.0
    } else {
        stable as f64 / total as f64 * 100.0
    };

    let group_stability_pct = group_stability(summaries);
    let overall_pct = match group_stability_pct {
        Some(group) => W_NODE * node_stability_pct + W_GROUP * group,
        None => node_stability_pct,
    };

    debug!(
        target: "layoutlens.events",
        iterations,
        tracked = total,
        stable,
        overall_pct,
        "stability.analyzed"
    );

    Ok(StabilityReport {
        iterations,
        profiles: profiles.into_iter().map(|p| p.variation).collect(),
        node_stability_pct,
        group_stability_pct,
        overall_pct,
    })
}

/// Primary identity is the summarization id; the fallback is tag + class +
/// origin proximity. A profile accepts at most one node per iteration.
fn resolve_identity(
    profiles: &[Profile],
    claimed: &HashSet<usize>,
    node: &SummarizedNode,
) -> Option<usize> {
    if let Some(idx) = profiles.iter().position(|p| p.variation.key == node.id) {
        if !claimed.contains(&idx) {
            return Some(idx);
        }
    }
    profiles.iter().enumerate().find_map(|(idx, p)| {
        let fits = !claimed.contains(&idx)
            && p.variation.tag == node.tag
            && p.variation.class == node.class
            && p.last_rect.origin_distance(&node.rect) <= IDENTITY_RADIUS_PX;
        fits.then_some(idx)
    })
}

fn new_profile(node: &SummarizedNode) -> Profile {
    let mut profile = Profile {
        variation: NodeVariation {
            key: node.id.clone(),
            tag: node.tag.clone(),
            class: node.class.clone(),
            dom_id: node.dom_id.clone(),
            observations: 0,
            position_buckets: Default::default(),
            texts: Default::default(),
            visibilities: Default::default(),
            importances: Default::default(),
            text_observed: false,
            max_position_delta: 0.0,
            stability: 0.0,
        },
        last_rect: node.rect,
    };
    observe(&mut profile, node);
    profile
}

fn observe(profile: &mut Profile, node: &SummarizedNode) {
    let variation = &mut profile.variation;
    if variation.observations > 0 {
        let delta = profile.last_rect.origin_distance(&node.rect);
        if delta > variation.max_position_delta {
            variation.max_position_delta = delta;
        }
    }
    variation.observations += 1;
    variation.position_buckets.insert(bucket(&node.rect));
    if let Some(text) = node.text.as_deref().filter(|t| !t.is_empty()) {
        variation.text_observed = true;
        variation.texts.insert(text.to_string());
    }
    variation.visibilities.insert(node.visible);
    variation.importances.insert(node.importance);
    profile.last_rect = node.rect;
}

fn bucket(rect: &Rect) -> PositionBucket {
    let snap = |v: f64| (v / BUCKET_PX).round() as i64 * BUCKET_PX as i64;
    (
        snap(rect.x),
        snap(rect.y),
        snap(rect.width),
        snap(rect.height),
    )
}

/// Weighted penalty per varying dimension. The denominator is the number of
/// chances the value had to change (iterations - 1), so a node observed with
/// identical values everywhere scores exactly 1.
fn stability_score(variation: &NodeVariation, iterations: f64) -> f64 {
    let chances = (iterations - 1.0).max(1.0);
    let term = |distinct: usize| (1.0 - (distinct.saturating_sub(1)) as f64 / chances).max(0.0);

    let position = term(variation.distinct_positions());
    let text = if variation.text_observed {
        term(variation.distinct_texts())
    } else {
        1.0
    };
    let visibility = term(variation.distinct_visibilities());
    let importance = term(variation.distinct_importances());

    W_POSITION * position + W_TEXT * text + W_VISIBILITY * visibility + W_IMPORTANCE * importance
}

/// Fraction of groups in iteration i with a same-type counterpart within
/// [`GROUP_DRIFT_PX`] on both axes in iteration i+1, averaged over
/// consecutive pairs.
fn group_stability(summaries: &[LayoutSummary]) -> Option<f64> {
    let mut ratios = Vec::new();
    for window in summaries.windows(2) {
        let (before, after) = (&window[0], &window[1]);
        if before.groups.is_empty() {
            continue;
        }
        let held = before
            .groups
            .iter()
            .filter(|group| {
                after.groups.iter().any(|candidate| {
                    candidate.group_type == group.group_type
                        && (candidate.bounds.x - group.bounds.x).abs() <= GROUP_DRIFT_PX
                        && (candidate.bounds.y - group.bounds.y).abs() <= GROUP_DRIFT_PX
                })
            })
            .count();
        ratios.push(held as f64 / before.groups.len() as f64);
    }
    if ratios.is_empty() {
        return None;
    }
    Some(ratios.iter().sum::<f64>() / ratios.len() as f64 * 100.0)
}
