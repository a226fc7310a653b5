//! Telemetry for the Anxiety Severity Agent
//!
//! - `emitter` - non-blocking delivery of anxiety_severity_signal events
//! - `metrics` - Prometheus metrics for classification requests

pub mod emitter;
pub mod metrics;

pub use emitter::{SignalClient, SignalEmitter};
pub use metrics::SeverityMetrics;

use thiserror::Error;

/// Telemetry errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to queue signal: {0}")]
    QueueFull(String),

    #[error("HTTP client error: {0}")]
    HttpError(String),

    #[error("Signal sink returned {status}")]
    Rejected { status: u16 },

    #[error("Metrics error: {0}")]
    MetricsError(#[from] prometheus::Error),
}

pub type Result<T> = std::result::Result<T, TelemetryError>;
