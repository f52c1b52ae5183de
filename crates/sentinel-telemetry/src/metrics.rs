//! Prometheus metrics for the sentinel.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` at static initialization. A failure
//! there means duplicate metric names, which is a build defect.

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Encoder, Histogram, IntCounter, IntCounterVec, IntGauge, TextEncoder,
};

use sentinel_core::AlertKind;

use crate::error::{TelemetryError, TelemetryResult};

/// Completed polling cycles.
/// Labels: outcome (ok/source_error)
pub static CYCLES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "sentinel_cycles_total",
        "Completed polling cycles by outcome",
        &["outcome"]
    )
    .unwrap()
});

/// Alerts produced, by kind.
pub static ALERTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "sentinel_alerts_total",
        "Alerts produced by kind",
        &["kind"]
    )
    .unwrap()
});

/// Alerts the sink failed to deliver.
pub static ALERT_DELIVERY_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "sentinel_alert_delivery_failures_total",
        "Alerts that could not be delivered"
    )
    .unwrap()
});

/// Open positions currently tracked.
pub static TRACKED_POSITIONS: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "sentinel_tracked_positions",
        "Open positions currently tracked"
    )
    .unwrap()
});

/// Per-symbol open-order fetches that failed.
pub static ORDER_FETCH_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "sentinel_order_fetch_failures_total",
        "Open-order fetches that failed"
    )
    .unwrap()
});

/// Wall time of one polling cycle.
pub static CYCLE_DURATION_MS: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "sentinel_cycle_duration_ms",
        "Polling cycle duration in milliseconds",
        vec![10.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0, 30000.0]
    )
    .unwrap()
});

/// Static facade over the registered metrics.
pub struct Metrics;

impl Metrics {
    pub fn cycle_completed(outcome: &str, duration_ms: f64) {
        CYCLES_TOTAL.with_label_values(&[outcome]).inc();
        CYCLE_DURATION_MS.observe(duration_ms);
    }

    pub fn alert_emitted(kind: AlertKind) {
        ALERTS_TOTAL.with_label_values(&[kind.as_str()]).inc();
    }

    pub fn alert_delivery_failed() {
        ALERT_DELIVERY_FAILURES_TOTAL.inc();
    }

    pub fn tracked_positions(count: usize) {
        TRACKED_POSITIONS.set(i64::try_from(count).unwrap_or(i64::MAX));
    }

    pub fn order_fetch_failed() {
        ORDER_FETCH_FAILURES_TOTAL.inc();
    }

    /// Encode the default registry in the Prometheus text format.
    pub fn gather_text() -> TelemetryResult<String> {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&prometheus::gather(), &mut buf)
            .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| TelemetryError::Metrics(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_counter_by_kind() {
        let before = ALERTS_TOTAL
            .with_label_values(&[AlertKind::SlMissing.as_str()])
            .get();
        Metrics::alert_emitted(AlertKind::SlMissing);
        let after = ALERTS_TOTAL
            .with_label_values(&[AlertKind::SlMissing.as_str()])
            .get();
        assert!(after > before);
    }

    #[test]
    fn test_gather_text_contains_registered_metrics() {
        Metrics::cycle_completed("ok", 12.0);
        Metrics::tracked_positions(3);
        let text = Metrics::gather_text().unwrap();
        assert!(text.contains("sentinel_cycles_total"));
        assert!(text.contains("sentinel_cycle_duration_ms"));
        assert!(text.contains("sentinel_tracked_positions"));
    }
}
