//! Anxiety Severity Agent Contracts
//!
//! Request and response shapes shared by the engine, the HTTP handler and the
//! remote client.

mod decision_event;

pub use decision_event::*;

use anxiety_core::{Severity, SeverityLabel, ThresholdFloor, ThresholdTable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Deviation margin (as a fraction of baseline) at which a classification is
/// considered fully clear of the nearest threshold.
pub const CLEAR_MARGIN: f64 = 0.05;

/// A single heart-rate sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateReading {
    /// Beats per minute
    pub bpm: f64,

    /// When the sensor produced the sample
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<DateTime<Utc>>,
}

impl HeartRateReading {
    pub fn new(bpm: f64) -> Self {
        Self {
            bpm,
            observed_at: None,
        }
    }
}

/// Body of a classification request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyRequest {
    /// Resting heart rate assigned to the user
    pub baseline_bpm: f64,

    pub readings: Vec<HeartRateReading>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_by: Option<String>,
}

impl ClassifyRequest {
    pub fn new(baseline_bpm: f64, readings: impl IntoIterator<Item = f64>) -> Self {
        Self {
            baseline_bpm,
            readings: readings.into_iter().map(HeartRateReading::new).collect(),
            user_id: None,
            requested_by: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// Input for severity classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationInput {
    /// Unique request identifier
    pub request_id: Uuid,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    pub baseline_bpm: f64,

    pub readings: Vec<HeartRateReading>,

    pub requested_at: DateTime<Utc>,

    /// Requester identity
    pub requested_by: String,
}

/// Classification of one reading within a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingAssessment {
    /// Position of the reading in the request
    pub index: usize,

    pub bpm: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<DateTime<Utc>>,

    /// Un-rounded deviation fraction
    pub deviation: f64,

    /// Rounded deviation percentage (display only)
    pub deviation_percent: i64,

    pub severity: Severity,
}

/// Number of readings per severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub normal: usize,
    pub mild: usize,
    pub moderate: usize,
    pub severe: usize,
    pub critical: usize,
}

impl SeverityCounts {
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Normal => self.normal += 1,
            Severity::Event(SeverityLabel::Mild) => self.mild += 1,
            Severity::Event(SeverityLabel::Moderate) => self.moderate += 1,
            Severity::Event(SeverityLabel::Severe) => self.severe += 1,
            Severity::Event(SeverityLabel::Critical) => self.critical += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.normal + self.events()
    }

    /// Readings that reached at least the mild threshold
    pub fn events(&self) -> usize {
        self.mild + self.moderate + self.severe + self.critical
    }
}

/// Output from severity classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationOutput {
    /// Request ID correlation
    pub request_id: Uuid,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    pub baseline_bpm: f64,

    pub assessments: Vec<ReadingAssessment>,

    /// Highest severity across all readings
    pub peak_severity: Severity,

    pub counts: SeverityCounts,

    /// Thresholds the readings were classified against
    pub thresholds: ThresholdTable,

    pub completed_at: DateTime<Utc>,

    pub duration_ms: u64,
}

impl ClassificationOutput {
    pub fn anxiety_detected(&self) -> bool {
        self.peak_severity.is_event()
    }

    pub fn event_count(&self) -> usize {
        self.counts.events()
    }

    /// Assessment that produced the peak severity (first one on ties)
    pub fn peak_assessment(&self) -> Option<&ReadingAssessment> {
        self.assessments
            .iter()
            .find(|a| a.severity == self.peak_severity)
    }

    /// Confidence in the peak classification.
    ///
    /// Scales from 0.5 for a peak deviation sitting on a threshold to 1.0 at
    /// [`CLEAR_MARGIN`] or more away from the nearest one.
    pub fn confidence(&self) -> f64 {
        let Some(peak) = self.peak_assessment() else {
            return 0.0;
        };

        let margin = self
            .thresholds
            .entries()
            .iter()
            .map(|(_, threshold)| (peak.deviation - threshold).abs())
            .fold(f64::INFINITY, f64::min);

        (0.5 + 0.5 * (margin / CLEAR_MARGIN)).clamp(0.0, 1.0)
    }
}

/// Reading floors for one baseline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdsResponse {
    pub baseline_bpm: f64,
    pub floors: Vec<ThresholdFloor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessment(index: usize, deviation: f64, severity: Severity) -> ReadingAssessment {
        ReadingAssessment {
            index,
            bpm: 70.0 * (1.0 + deviation),
            observed_at: None,
            deviation,
            deviation_percent: (deviation * 100.0).round() as i64,
            severity,
        }
    }

    fn output(assessments: Vec<ReadingAssessment>) -> ClassificationOutput {
        let mut counts = SeverityCounts::default();
        for a in &assessments {
            counts.record(a.severity);
        }
        let peak_severity = assessments
            .iter()
            .map(|a| a.severity)
            .max()
            .unwrap_or_default();

        ClassificationOutput {
            request_id: Uuid::new_v4(),
            user_id: None,
            baseline_bpm: 70.0,
            assessments,
            peak_severity,
            counts,
            thresholds: ThresholdTable::default(),
            completed_at: Utc::now(),
            duration_ms: 0,
        }
    }

    #[test]
    fn test_counts() {
        let mut counts = SeverityCounts::default();
        counts.record(Severity::Normal);
        counts.record(Severity::Event(SeverityLabel::Mild));
        counts.record(Severity::Event(SeverityLabel::Critical));

        assert_eq!(counts.total(), 3);
        assert_eq!(counts.events(), 2);
        assert_eq!(counts.critical, 1);
    }

    #[test]
    fn test_confidence_on_threshold_is_half() {
        let out = output(vec![assessment(
            0,
            0.20,
            Severity::Event(SeverityLabel::Mild),
        )]);
        assert!((out.confidence() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_clear_of_thresholds() {
        let out = output(vec![assessment(
            0,
            0.40,
            Severity::Event(SeverityLabel::Moderate),
        )]);
        assert!((out.confidence() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_peak_assessment_first_on_ties() {
        let out = output(vec![
            assessment(0, 0.05, Severity::Normal),
            assessment(1, 0.55, Severity::Event(SeverityLabel::Severe)),
            assessment(2, 0.60, Severity::Event(SeverityLabel::Severe)),
        ]);

        assert!(out.anxiety_detected());
        assert_eq!(out.event_count(), 2);
        assert_eq!(out.peak_assessment().map(|a| a.index), Some(1));
    }

    #[test]
    fn test_request_deserializes_without_optionals() {
        let request: ClassifyRequest =
            serde_json::from_str(r#"{"baseline_bpm": 70, "readings": [{"bpm": 84}]}"#).unwrap();
        assert_eq!(request.readings, vec![HeartRateReading::new(84.0)]);
        assert!(request.user_id.is_none());
    }
}
