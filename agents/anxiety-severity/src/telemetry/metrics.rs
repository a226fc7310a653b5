//! Prometheus metrics for severity classification
//!
//! - `anxiety_severity_classifications_total` (counter) - readings by severity
//! - `anxiety_severity_errors_total` (counter) - rejected requests by error code
//! - `anxiety_severity_deviation_ratio` (histogram) - deviation fractions seen
//! - `anxiety_severity_signals_emitted_total` / `_signals_failed_total`

use prometheus::{
    Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};

use super::Result;
use crate::contracts::ClassificationOutput;

const NAMESPACE: &str = "anxiety_severity";

/// Classification metrics backed by a private registry
pub struct SeverityMetrics {
    registry: Registry,
    classifications_total: CounterVec,
    errors_total: CounterVec,
    deviation_ratio: Histogram,
    signals_emitted_total: Counter,
    signals_failed_total: Counter,
}

impl SeverityMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let classifications_total = CounterVec::new(
            Opts::new(
                "classifications_total",
                "Total number of readings classified, by severity",
            )
            .namespace(NAMESPACE),
            &["severity"],
        )?;

        let errors_total = CounterVec::new(
            Opts::new(
                "errors_total",
                "Total number of rejected classification requests",
            )
            .namespace(NAMESPACE),
            &["error_type"],
        )?;

        let deviation_ratio = Histogram::with_opts(
            HistogramOpts::new(
                "deviation_ratio",
                "Deviation of readings from baseline as a fraction",
            )
            .namespace(NAMESPACE)
            .buckets(vec![-0.2, 0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.65, 0.8, 1.0, 1.5]),
        )?;

        let signals_emitted_total = Counter::with_opts(
            Opts::new(
                "signals_emitted_total",
                "Total number of decision signals delivered",
            )
            .namespace(NAMESPACE),
        )?;

        let signals_failed_total = Counter::with_opts(
            Opts::new(
                "signals_failed_total",
                "Total number of decision signal delivery failures",
            )
            .namespace(NAMESPACE),
        )?;

        registry.register(Box::new(classifications_total.clone()))?;
        registry.register(Box::new(errors_total.clone()))?;
        registry.register(Box::new(deviation_ratio.clone()))?;
        registry.register(Box::new(signals_emitted_total.clone()))?;
        registry.register(Box::new(signals_failed_total.clone()))?;

        Ok(Self {
            registry,
            classifications_total,
            errors_total,
            deviation_ratio,
            signals_emitted_total,
            signals_failed_total,
        })
    }

    /// Record every assessment of a completed classification
    pub fn record_output(&self, output: &ClassificationOutput) {
        for assessment in &output.assessments {
            self.classifications_total
                .with_label_values(&[assessment.severity.as_str()])
                .inc();
            self.deviation_ratio.observe(assessment.deviation);
        }
    }

    pub fn record_error(&self, error_type: &str) {
        self.errors_total.with_label_values(&[error_type]).inc();
    }

    pub fn record_signal(&self, delivered: bool) {
        if delivered {
            self.signals_emitted_total.inc();
        } else {
            self.signals_failed_total.inc();
        }
    }

    /// Count of readings classified at a severity
    pub fn classification_count(&self, severity: &str) -> u64 {
        self.classifications_total
            .with_label_values(&[severity])
            .get() as u64
    }

    /// Render all metrics in the Prometheus text format
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
