//! DecisionEvent for anxiety_severity_signal emission
//!
//! Audit record of a classification decision. It carries the outcome and the
//! thresholds applied, never the raw readings.

use anxiety_core::Severity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::{ClassificationOutput, SeverityCounts};

/// Anxiety severity signal sent to the telemetry sink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnxietySeveritySignal {
    /// Unique event identifier
    pub event_id: Uuid,

    pub agent_id: String,

    pub agent_version: String,

    /// Signal type (always "anxiety_severity_signal")
    pub signal_type: String,

    pub decision_type: SeverityDecisionType,

    /// Hash of inputs for deduplication
    pub inputs_hash: String,

    pub outputs: AnxietySignalOutputs,

    /// Confidence score (0.0-1.0)
    pub confidence: f64,

    /// Thresholds that were applied, e.g. `mild>=0.20`
    pub constraints_applied: Vec<String>,

    /// Execution reference (request/trace ID)
    pub execution_ref: String,

    pub timestamp: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<PerformanceMetrics>,

    /// Correlation IDs for distributed tracing
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub correlation_ids: HashMap<String, String>,
}

impl AnxietySeveritySignal {
    pub const AGENT_VERSION: &'static str = env!("CARGO_PKG_VERSION");

    pub const AGENT_ID: &'static str = "anxiety-severity-agent";

    pub const SIGNAL_TYPE: &'static str = "anxiety_severity_signal";

    /// Create from classification output
    pub fn from_classification(
        inputs_hash: String,
        output: &ClassificationOutput,
        execution_ref: String,
    ) -> Self {
        let decision_type = if output.assessments.len() > 1 {
            SeverityDecisionType::BatchClassification
        } else {
            SeverityDecisionType::SeverityClassification
        };

        let mut signal = Self {
            event_id: Uuid::new_v4(),
            agent_id: Self::AGENT_ID.to_string(),
            agent_version: Self::AGENT_VERSION.to_string(),
            signal_type: Self::SIGNAL_TYPE.to_string(),
            decision_type,
            inputs_hash,
            outputs: AnxietySignalOutputs::from_output(output),
            confidence: output.confidence(),
            constraints_applied: output.thresholds.describe(),
            execution_ref,
            timestamp: Utc::now(),
            metadata: HashMap::new(),
            performance: Some(PerformanceMetrics {
                duration_ms: output.duration_ms,
                readings_classified: output.assessments.len() as u32,
            }),
            correlation_ids: HashMap::new(),
        };

        if let Some(user_id) = &output.user_id {
            signal = signal.with_correlation_id("user_id", user_id.clone());
        }

        signal
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Add correlation ID
    pub fn with_correlation_id(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.correlation_ids.insert(key.into(), value.into());
        self
    }

    /// Get summary for logging
    pub fn summary(&self) -> String {
        format!(
            "[{}] {} - peak={}, events={}/{}, confidence={:.2}",
            self.agent_id,
            self.decision_type.as_str(),
            self.outputs.peak_severity,
            self.outputs.event_count,
            self.outputs.reading_count,
            self.confidence,
        )
    }

    pub fn anxiety_detected(&self) -> bool {
        self.outputs.anxiety_detected
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityDecisionType {
    /// One reading classified
    SeverityClassification,

    /// Several readings classified against one baseline
    BatchClassification,
}

impl SeverityDecisionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SeverityClassification => "severity_classification",
            Self::BatchClassification => "batch_classification",
        }
    }
}

/// Structured outputs of the signal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnxietySignalOutputs {
    pub anxiety_detected: bool,
    pub peak_severity: Severity,
    /// Rounded deviation percentage of the peak reading
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_deviation_percent: Option<i64>,
    pub reading_count: usize,
    pub event_count: usize,
    pub counts: SeverityCounts,
}

impl AnxietySignalOutputs {
    pub fn from_output(output: &ClassificationOutput) -> Self {
        Self {
            anxiety_detected: output.anxiety_detected(),
            peak_severity: output.peak_severity,
            peak_deviation_percent: output.peak_assessment().map(|a| a.deviation_percent),
            reading_count: output.assessments.len(),
            event_count: output.event_count(),
            counts: output.counts,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub duration_ms: u64,
    pub readings_classified: u32,
}
