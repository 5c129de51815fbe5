//! Telemetry helpers for the comparison engine.
//!
//! Lightweight counters + latency aggregates so an embedding application can
//! surface basic numbers without depending on an external metrics backend.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

static COMPARE_TOTAL: AtomicU64 = AtomicU64::new(0);
static COMPARE_LAT_NS: AtomicU64 = AtomicU64::new(0);
static COMPARE_LAT_SAMPLES: AtomicU64 = AtomicU64::new(0);

static CALIBRATE_TOTAL: AtomicU64 = AtomicU64::new(0);
static CALIBRATE_FAILED: AtomicU64 = AtomicU64::new(0);
static CALIBRATE_LAT_NS: AtomicU64 = AtomicU64::new(0);
static CALIBRATE_LAT_SAMPLES: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MetricCounter {
    pub total: u64,
    pub avg_ms: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MetricSnapshot {
    pub compare: MetricCounter,
    pub calibrate: MetricCounter,
    pub calibrate_failures: u64,
}

pub fn record_compare(duration: Duration) {
    COMPARE_TOTAL.fetch_add(1, Ordering::Relaxed);
    record_latency(&COMPARE_LAT_NS, &COMPARE_LAT_SAMPLES, duration);
}

pub fn record_calibrate(ok: bool, duration: Duration) {
    CALIBRATE_TOTAL.fetch_add(1, Ordering::Relaxed);
    if !ok {
        CALIBRATE_FAILED.fetch_add(1, Ordering::Relaxed);
    }
    record_latency(&CALIBRATE_LAT_NS, &CALIBRATE_LAT_SAMPLES, duration);
}

pub fn snapshot() -> MetricSnapshot {
    MetricSnapshot {
        compare: make_counter(
            COMPARE_TOTAL.load(Ordering::Relaxed),
            COMPARE_LAT_NS.load(Ordering::Relaxed),
            COMPARE_LAT_SAMPLES.load(Ordering::Relaxed),
        ),
        calibrate: make_counter(
            CALIBRATE_TOTAL.load(Ordering::Relaxed),
            CALIBRATE_LAT_NS.load(Ordering::Relaxed),
            CALIBRATE_LAT_SAMPLES.load(Ordering::Relaxed),
        ),
        calibrate_failures: CALIBRATE_FAILED.load(Ordering::Relaxed),
    }
}

fn make_counter(total: u64, nanos: u64, samples: u64) -> MetricCounter {
    let avg_ms = if samples == 0 {
        0.0
    } else {
        (nanos as f64 / samples as f64) / 1_000_000.0
    };
    MetricCounter { total, avg_ms }
}

fn record_latency(total_ns: &AtomicU64, samples: &AtomicU64, duration: Duration) {
    let nanos = duration.as_nanos();
    let nanos = if nanos > u64::MAX as u128 {
        u64::MAX
    } else {
        nanos as u64
    };
    total_ns.fetch_add(nanos, Ordering::Relaxed);
    samples.fetch_add(1, Ordering::Relaxed);
}
