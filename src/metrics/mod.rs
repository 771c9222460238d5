//! Prometheus metrics for the analysis pipeline.
//!
//! Metrics are process-wide statics. They are recorded by the pipeline and
//! the HTTP layer only; classification itself stays free of side effects.
//!
//! # Example
//! ```no_run
//! use ops_healer::metrics::{init_metrics, gather_metrics};
//!
//! init_metrics().expect("metrics registered once at startup");
//! println!("{}", gather_metrics());
//! ```

use lazy_static::lazy_static;
use once_cell::sync::OnceCell;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry};

const NAMESPACE: &str = "ops_healer";

lazy_static! {
    /// Global Prometheus registry for all metrics
    pub static ref PROMETHEUS_REGISTRY: Registry = Registry::new();

    /// Completed analyses
    ///
    /// Labels: severity
    pub static ref ANALYSES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("analyses_total", "Total number of completed analyses")
            .namespace(NAMESPACE),
        &["severity"]
    ).expect("Failed to create ANALYSES_TOTAL metric");

    /// Causes reported, counted once per analysis
    ///
    /// Labels: cause
    pub static ref CAUSES_DETECTED_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("causes_detected_total", "Probable causes reported by analyses")
            .namespace(NAMESPACE),
        &["cause"]
    ).expect("Failed to create CAUSES_DETECTED_TOTAL metric");

    /// Redacted spans written into postmortems
    ///
    /// Labels: pattern
    pub static ref REDACTIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("redactions_total", "Spans redacted from postmortem timelines")
            .namespace(NAMESPACE),
        &["pattern"]
    ).expect("Failed to create REDACTIONS_TOTAL metric");

    /// Postmortem files written
    pub static ref REPORTS_WRITTEN_TOTAL: IntCounter = IntCounter::with_opts(
        Opts::new("reports_written_total", "Postmortem files written")
            .namespace(NAMESPACE)
    ).expect("Failed to create REPORTS_WRITTEN_TOTAL metric");

    /// End-to-end analysis duration in seconds
    ///
    /// Labels: outcome
    pub static ref ANALYSIS_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "analysis_duration_seconds",
            "Analysis duration in seconds, including the postmortem write"
        )
        .namespace(NAMESPACE)
        .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
        &["outcome"]
    ).expect("Failed to create ANALYSIS_DURATION_SECONDS metric");
}

static REGISTERED: OnceCell<()> = OnceCell::new();

/// Register all metrics with the global registry.
///
/// Safe to call more than once; only the first call registers.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    REGISTERED
        .get_or_try_init(|| {
            PROMETHEUS_REGISTRY.register(Box::new(ANALYSES_TOTAL.clone()))?;
            PROMETHEUS_REGISTRY.register(Box::new(CAUSES_DETECTED_TOTAL.clone()))?;
            PROMETHEUS_REGISTRY.register(Box::new(REDACTIONS_TOTAL.clone()))?;
            PROMETHEUS_REGISTRY.register(Box::new(REPORTS_WRITTEN_TOTAL.clone()))?;
            PROMETHEUS_REGISTRY.register(Box::new(ANALYSIS_DURATION_SECONDS.clone()))?;
            tracing::debug!("Prometheus metrics registered");
            Ok(())
        })
        .map(|_| ())
}

/// Gather all metrics in Prometheus text exposition format
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
