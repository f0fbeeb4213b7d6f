//! Search metrics.
//!
//! Recorded through the `metrics` facade; nothing is collected unless a
//! recorder is installed with [`init_metrics`].

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return a handle for rendering.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_histogram!(
        "vault_find_search_latency_ms",
        "Time from spawning the search tools to the merged result in milliseconds"
    );
    describe_counter!("vault_find_search_total", "Total number of searches started");
    describe_counter!(
        "vault_find_search_errors_total",
        "Total number of searches that ended in an error"
    );

    Ok(handle)
}

/// Record a search latency measurement.
pub fn record_search_latency(latency_ms: f64) {
    histogram!("vault_find_search_latency_ms").record(latency_ms);
}

/// Increment the search count.
pub fn increment_search_count() {
    counter!("vault_find_search_total").increment(1);
}

/// Increment the search error count.
pub fn increment_search_errors() {
    counter!("vault_find_search_errors_total").increment(1);
}
