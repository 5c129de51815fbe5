use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use layoutlens_calibrator::{calibrate, CalibrationOptions, CalibrationSettings};
use layoutlens_core_types::{LayoutSummary, RawElement, Viewport};
use layoutlens_stability::{analyze, StabilityError, StabilityReport};
use layoutlens_summarizer::{summarize_tree, SummarizeError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::{sleep, Duration};
use tracing::warn;

use crate::events;
use crate::ports::{CaptureError, LayoutCapturePort};

/// One (test case, viewport) pair to calibrate.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct CalibrationTarget {
    pub case_id: String,
    pub viewport: Viewport,
}

impl CalibrationTarget {
    pub fn new(case_id: impl Into<String>, viewport: Viewport) -> Self {
        Self {
            case_id: case_id.into(),
            viewport,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RunnerError {
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Summarize(#[from] SummarizeError),
    #[error(transparent)]
    Stability(#[from] StabilityError),
    #[error("calibration task failed: {0}")]
    Internal(String),
}

/// Everything derived for one target.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalibrationOutcome {
    pub stability: StabilityReport,
    pub settings: CalibrationSettings,
    pub samples: usize,
}

/// Result map of a calibration run, keyed by target. A failed target carries
/// its own error; it never aborts its siblings.
pub type CalibrationRunResult = HashMap<CalibrationTarget, Result<CalibrationOutcome, RunnerError>>;

/// Samples a capture port repeatedly per target and derives comparison
/// settings for each. Targets are independent and run as separate tasks.
pub struct CalibrationRunner<P>
where
    P: LayoutCapturePort + 'static,
{
    port: Arc<P>,
    iterations: usize,
    options: CalibrationOptions,
}

const MAX_CAPTURE_ATTEMPTS: usize = 3;
const CAPTURE_BACKOFF_MS: u64 = 50;

impl<P> CalibrationRunner<P>
where
    P: LayoutCapturePort + 'static,
{
    pub fn new(port: Arc<P>, iterations: usize, options: CalibrationOptions) -> Self {
        Self {
            port,
            iterations,
            options,
        }
    }

    pub async fn run(&self, targets: Vec<CalibrationTarget>) -> CalibrationRunResult {
        let mut handles = Vec::with_capacity(targets.len());
        for target in targets {
            let port = Arc::clone(&self.port);
            let iterations = self.iterations;
            let options = self.options;
            let task_target = target.clone();
            let handle = tokio::spawn(async move {
                let started = Instant::now();
                let outcome =
                    calibrate_target(port, &task_target, iterations, &options).await;
                events::emit_calibrate(
                    &task_target.case_id,
                    task_target.viewport,
                    outcome.is_ok(),
                    started.elapsed(),
                );
                outcome
            });
            handles.push((target, handle));
        }

        // Merge order-independently; keys are unique per target, and a failed
        // pair stays attached to its own key.
        let mut results = CalibrationRunResult::new();
        for (target, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!(
                        target: "layoutlens.events",
                        ?err,
                        case_id = %target.case_id,
                        "calibration task join failed"
                    );
                    Err(RunnerError::Internal(err.to_string()))
                }
            };
            results.insert(target, outcome);
        }
        results
    }
}

async fn calibrate_target<P>(
    port: Arc<P>,
    target: &CalibrationTarget,
    iterations: usize,
    options: &CalibrationOptions,
) -> Result<CalibrationOutcome, RunnerError>
where
    P: LayoutCapturePort,
{
    let mut summaries: Vec<LayoutSummary> = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        let raw = capture_with_retry(port.as_ref(), target).await?;
        summaries.push(summarize_tree(&raw, target.viewport)?);
    }

    let stability = analyze(&summaries)?;
    let settings = calibrate(&stability, options);
    Ok(CalibrationOutcome {
        samples: summaries.len(),
        stability,
        settings,
    })
}

async fn capture_with_retry<P>(
    port: &P,
    target: &CalibrationTarget,
) -> Result<RawElement, CaptureError>
where
    P: LayoutCapturePort,
{
    let mut attempt = 0;
    let mut last_err: Option<CaptureError> = None;
    while attempt < MAX_CAPTURE_ATTEMPTS {
        match port.capture(&target.case_id, target.viewport).await {
            Ok(raw) => return Ok(raw),
            Err(err) => {
                last_err = Some(err);
                attempt += 1;
                if attempt < MAX_CAPTURE_ATTEMPTS {
                    let backoff = CAPTURE_BACKOFF_MS * (attempt as u64);
                    sleep(Duration::from_millis(backoff)).await;
                }
            }
        }
    }
    Err(last_err.unwrap_or_else(|| CaptureError::failed("capture retries exhausted")))
}
