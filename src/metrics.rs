//! Prometheus metrics for detection runs.
//!
//! Counters and histograms are no-ops until a recorder is installed; the CLI
//! installs one with [`install_recorder`] when `--metrics` is passed.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::debug;

use crate::error::Result;

// === Metric Name Constants ===

/// Detection latency metric name.
pub const METRIC_DETECTION_LATENCY: &str = "detection_latency_ms";
/// Quotes processed counter metric name.
pub const METRIC_QUOTES_PROCESSED: &str = "quotes_processed_total";
/// Quotes rejected counter metric name.
pub const METRIC_QUOTES_REJECTED: &str = "quotes_rejected_total";
/// Matches scanned counter metric name.
pub const METRIC_MATCHES_SCANNED: &str = "matches_scanned_total";
/// Opportunities detected counter metric name.
pub const METRIC_OPPORTUNITIES_DETECTED: &str = "opportunities_detected_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_DETECTION_LATENCY,
        "Time to run arbitrage detection over a quote batch in milliseconds"
    );

    describe_counter!(METRIC_QUOTES_PROCESSED, "Total number of quotes processed");
    describe_counter!(
        METRIC_QUOTES_REJECTED,
        "Total number of quotes rejected as malformed"
    );
    describe_counter!(METRIC_MATCHES_SCANNED, "Total number of matches scanned");
    describe_counter!(
        METRIC_OPPORTUNITIES_DETECTED,
        "Total number of arbitrage opportunities detected"
    );

    debug!("Metrics initialized");
}

/// Install the Prometheus recorder as the global recorder.
pub fn install_recorder() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Increment quotes processed counter.
pub fn inc_quotes_processed(count: usize) {
    counter!(METRIC_QUOTES_PROCESSED).increment(count as u64);
}

/// Increment quotes rejected counter.
pub fn inc_quotes_rejected(reason: &'static str) {
    counter!(METRIC_QUOTES_REJECTED, "reason" => reason).increment(1);
}

/// Increment matches scanned counter.
pub fn inc_matches_scanned(count: usize) {
    counter!(METRIC_MATCHES_SCANNED).increment(count as u64);
}

/// Increment opportunities detected counter.
pub fn inc_opportunities_detected(count: usize) {
    counter!(METRIC_OPPORTUNITIES_DETECTED).increment(count as u64);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(self.metric_name).record(self.elapsed_ms());
    }
}

/// Create a latency timer for a detection run.
pub fn timer_detection() -> LatencyTimer {
    LatencyTimer::new(METRIC_DETECTION_LATENCY)
}
