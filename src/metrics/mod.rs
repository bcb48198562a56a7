//! Prometheus metrics for the todo search service.
//!
//! Covers search throughput, latency, result sizes and how often request
//! filters are honored or dropped. Metrics are process-global; call
//! [`init_metrics`] once at startup to register them for export.
//!
//! # Example
//! ```no_run
//! use todo_search::metrics::{self, SEARCH_REQUESTS_TOTAL};
//!
//! metrics::init_metrics().ok();
//! SEARCH_REQUESTS_TOTAL.with_label_values(&["ok"]).inc();
//! println!("{}", metrics::gather_metrics());
//! ```

use lazy_static::lazy_static;
use prometheus::{CounterVec, GaugeVec, Histogram, HistogramOpts, Opts, Registry};

lazy_static! {
    /// Global Prometheus registry for all metrics
    pub static ref PROMETHEUS_REGISTRY: Registry = Registry::new();

    /// Total number of searches
    ///
    /// Labels: outcome (ok, empty, error)
    pub static ref SEARCH_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("search_requests_total", "Total number of todo searches")
            .namespace("todo_search"),
        &["outcome"]
    ).expect("Failed to create SEARCH_REQUESTS_TOTAL metric");

    /// Search duration in seconds, from owner lookup to response assembly
    pub static ref SEARCH_DURATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new("search_duration_seconds", "Todo search duration in seconds")
            .namespace("todo_search")
            .buckets(vec![0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0])
    ).expect("Failed to create SEARCH_DURATION_SECONDS metric");

    /// Todos matched by the filters, before pagination
    pub static ref SEARCH_MATCHED_TODOS: Histogram = Histogram::with_opts(
        HistogramOpts::new("search_matched_todos", "Todos matching all active filters")
            .namespace("todo_search")
            .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0])
    ).expect("Failed to create SEARCH_MATCHED_TODOS metric");

    /// Active filter categories per search
    ///
    /// Labels: filter
    pub static ref SEARCH_FILTERS_APPLIED_TOTAL: CounterVec = CounterVec::new(
        Opts::new("search_filters_applied_total", "Filter categories honored in searches")
            .namespace("todo_search"),
        &["filter"]
    ).expect("Failed to create SEARCH_FILTERS_APPLIED_TOTAL metric");

    /// Request values dropped during criteria parsing
    ///
    /// Labels: parameter
    pub static ref SEARCH_VALUES_DROPPED_TOTAL: CounterVec = CounterVec::new(
        Opts::new("search_values_dropped_total", "Malformed or unknown filter values ignored")
            .namespace("todo_search"),
        &["parameter"]
    ).expect("Failed to create SEARCH_VALUES_DROPPED_TOTAL metric");

    /// Application build info
    ///
    /// Labels: version
    pub static ref BUILD_INFO: GaugeVec = GaugeVec::new(
        Opts::new("build_info", "Build information")
            .namespace("todo_search"),
        &["version"]
    ).expect("Failed to create BUILD_INFO metric");
}

/// Register all metrics with the global registry.
///
/// Returns an error if called more than once per process.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    PROMETHEUS_REGISTRY.register(Box::new(SEARCH_REQUESTS_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(SEARCH_DURATION_SECONDS.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(SEARCH_MATCHED_TODOS.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(SEARCH_FILTERS_APPLIED_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(SEARCH_VALUES_DROPPED_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(BUILD_INFO.clone()))?;

    BUILD_INFO
        .with_label_values(&[env!("CARGO_PKG_VERSION")])
        .set(1.0);

    tracing::info!("Prometheus metrics initialized successfully");
    Ok(())
}

/// Render registered metrics in the Prometheus text exposition format
pub fn gather_metrics() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = PROMETHEUS_REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::from("# Error encoding metrics\n");
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Failed to convert metrics to string: {}", e);
        String::from("# Error converting metrics\n")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_initialization() {
        // The registry is process-global, so a second registration may fail
        let result = init_metrics();
        assert!(result.is_ok() || result.is_err());
    }

    #[test]
    fn test_search_counters() {
        let before = SEARCH_REQUESTS_TOTAL.with_label_values(&["empty"]).get();
        SEARCH_REQUESTS_TOTAL.with_label_values(&["empty"]).inc();
        assert!(SEARCH_REQUESTS_TOTAL.with_label_values(&["empty"]).get() >= before + 1.0);
    }

    #[test]
    fn test_gather_includes_registered_metrics() {
        let _ = init_metrics();
        SEARCH_DURATION_SECONDS.observe(0.002);

        let output = gather_metrics();
        assert!(output.contains("todo_search_search_duration_seconds"));
    }
}
