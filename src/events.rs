use std::time::Duration;

use layoutlens_core_types::Viewport;
use tracing::{debug, warn};

use crate::metrics;

pub fn emit_compare(overall: f64, change_count: usize, duration: Duration) {
    metrics::record_compare(duration);
    debug!(
        target: "layoutlens.events",
        overall,
        change_count,
        elapsed_ms = duration.as_millis() as u64,
        "compare.completed"
    );
}

pub fn emit_calibrate(case_id: &str, viewport: Viewport, ok: bool, duration: Duration) {
    metrics::record_calibrate(ok, duration);
    if ok {
        debug!(
            target: "layoutlens.events",
            case_id,
            %viewport,
            elapsed_ms = duration.as_millis() as u64,
            "calibration.pair.completed"
        );
    } else {
        warn!(
            target: "layoutlens.events",
            case_id,
            %viewport,
            elapsed_ms = duration.as_millis() as u64,
            "calibration.pair.failed"
        );
    }
}
