//! Severity classification engine
//!
//! Deterministic classification of heart-rate readings against a baseline.

use anxiety_core::{Assessment, Classifier, Severity, ThresholdTable};
use sha2::{Digest, Sha256};
use std::time::Instant;
use uuid::Uuid;

use crate::contracts::*;
use crate::error::{AgentError, Result};

/// Upper bound on readings accepted in one request
pub const MAX_READINGS: usize = 10_000;

/// Severity classification engine
#[derive(Debug, Clone, Default)]
pub struct ClassificationEngine {
    classifier: Classifier,
}

impl ClassificationEngine {
    /// Create engine with the default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create engine with a custom threshold table
    pub fn with_thresholds(thresholds: ThresholdTable) -> Result<Self> {
        Ok(Self {
            classifier: Classifier::new(thresholds)?,
        })
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        self.classifier.thresholds()
    }

    /// Classify a single reading
    pub fn classify_one(&self, reading: f64, baseline: f64) -> Result<Assessment> {
        Ok(self.classifier.assess(reading, baseline)?)
    }

    /// Classify every reading of a request.
    ///
    /// Fails on the first invalid reading; a request is never partially
    /// classified.
    pub fn classify(&self, input: &ClassificationInput) -> Result<ClassificationOutput> {
        let start = Instant::now();

        if input.readings.is_empty() {
            return Err(AgentError::invalid_input("At least one reading is required"));
        }
        if input.readings.len() > MAX_READINGS {
            return Err(AgentError::invalid_input(format!(
                "Too many readings: {} (max {})",
                input.readings.len(),
                MAX_READINGS
            )));
        }

        let mut assessments = Vec::with_capacity(input.readings.len());
        let mut counts = SeverityCounts::default();
        let mut peak_severity = Severity::Normal;

        for (index, reading) in input.readings.iter().enumerate() {
            let assessment = self
                .classifier
                .assess(reading.bpm, input.baseline_bpm)
                .map_err(|e| {
                    tracing::debug!(
                        request_id = %input.request_id,
                        index,
                        error = %e,
                        "Rejected reading"
                    );
                    e
                })?;

            counts.record(assessment.severity);
            peak_severity = peak_severity.max(assessment.severity);

            assessments.push(ReadingAssessment {
                index,
                bpm: reading.bpm,
                observed_at: reading.observed_at,
                deviation: assessment.deviation,
                deviation_percent: assessment.deviation_percent,
                severity: assessment.severity,
            });
        }

        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            request_id = %input.request_id,
            readings = assessments.len(),
            peak = %peak_severity,
            events = counts.events(),
            "Classified readings"
        );

        Ok(ClassificationOutput {
            request_id: input.request_id,
            user_id: input.user_id.clone(),
            baseline_bpm: input.baseline_bpm,
            assessments,
            peak_severity,
            counts,
            thresholds: *self.classifier.thresholds(),
            completed_at: chrono::Utc::now(),
            duration_ms,
        })
    }

    /// Compute deterministic hash of inputs
    pub fn compute_inputs_hash(input: &ClassificationInput) -> String {
        let mut hasher = Sha256::new();
        hasher.update(input.baseline_bpm.to_bits().to_be_bytes());
        for reading in &input.readings {
            hasher.update(reading.bpm.to_bits().to_be_bytes());
            if let Some(observed_at) = reading.observed_at {
                hasher.update(observed_at.timestamp_millis().to_be_bytes());
            }
        }
        hex::encode(hasher.finalize())
    }

    /// Create classification input from a request body
    pub fn create_input(request: ClassifyRequest, requested_by: String) -> ClassificationInput {
        ClassificationInput {
            request_id: Uuid::new_v4(),
            user_id: request.user_id,
            baseline_bpm: request.baseline_bpm,
            readings: request.readings,
            requested_at: chrono::Utc::now(),
            requested_by: request.requested_by.unwrap_or(requested_by),
        }
    }
}
