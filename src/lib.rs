//! LayoutLens compares two snapshots of a rendered page's visible structure
//! and decides whether they represent the same layout within a tunable
//! tolerance — and, given repeated snapshots of the same page, derives that
//! tolerance automatically.
//!
//! The engine is pure: it consumes already-extracted element trees and
//! produces similarity scores, typed diffs, and calibration settings.
//! Rendering, screenshotting, persistence, and reporting live behind the
//! caller's own collaborators; the only async surface here is the
//! [`runner::CalibrationRunner`], which fans independent (case, viewport)
//! calibration targets out onto tokio tasks.

pub mod events;
pub mod metrics;
pub mod ports;
pub mod runner;

use std::time::Instant;

use serde::{Deserialize, Serialize};

pub use layoutlens_calibrator::{
    calibrate, CalibrationOptions, CalibrationSettings, Strictness, ToleranceScale,
};
pub use layoutlens_core_types::{
    AriaProps, LayoutSummary, NodeGroup, RawElement, Rect, SemanticType, SummarizedNode,
    SummaryId, Viewport,
};
pub use layoutlens_differ::{
    diff, ChangedAttribute, DiffOptions, DiffPattern, LayoutDiff, NodeChange, Severity,
};
pub use layoutlens_matcher::{
    levenshtein, match_nodes, match_semantic, text_similarity, Correspondence, MatchReason,
    TextComparison,
};
pub use layoutlens_similarity::{similarity, SimilarityResult};
pub use layoutlens_stability::{analyze, NodeVariation, StabilityError, StabilityReport};
pub use layoutlens_summarizer::{summarize, summarize_tree, SummarizeError};
pub use ports::{CaptureError, LayoutCapturePort};
pub use runner::{
    CalibrationOutcome, CalibrationRunResult, CalibrationRunner, CalibrationTarget, RunnerError,
};

/// Similarity judgment and typed diff for one snapshot pair.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub similarity: SimilarityResult,
    pub diff: LayoutDiff,
}

/// Compare two layout summaries: score them, then classify the differences.
pub fn compare(
    base: &LayoutSummary,
    current: &LayoutSummary,
    options: &DiffOptions,
) -> ComparisonReport {
    let started = Instant::now();
    let similarity = similarity(base, current);
    let diff = diff(base, current, &similarity, options);
    events::emit_compare(similarity.overall, diff.change_count(), started.elapsed());
    ComparisonReport { similarity, diff }
}
