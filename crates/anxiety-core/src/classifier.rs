//! Severity classifier
//!
//! Pure, stateless mapping from `(reading, baseline)` to a [`Severity`].

use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};
use crate::severity::Severity;
use crate::thresholds::ThresholdTable;

/// Classify a reading against a baseline using the default thresholds
pub fn classify(reading: f64, baseline: f64) -> Result<Severity> {
    Classifier::default().classify(reading, baseline)
}

/// Fractional deviation of `reading` from `baseline`.
///
/// Fails with [`ClassifierError::InvalidBaseline`] when the baseline is zero,
/// negative or not finite, and with [`ClassifierError::InvalidReading`] when
/// the reading is not finite. A baseline so small that the deviation
/// overflows is also rejected as invalid.
pub fn deviation(reading: f64, baseline: f64) -> Result<f64> {
    if !baseline.is_finite() || baseline <= 0.0 {
        return Err(ClassifierError::InvalidBaseline { baseline });
    }
    if !reading.is_finite() {
        return Err(ClassifierError::InvalidReading { reading });
    }

    let deviation = (reading - baseline) / baseline;
    if !deviation.is_finite() {
        return Err(ClassifierError::InvalidBaseline { baseline });
    }

    Ok(deviation)
}

/// Full result of classifying one reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub reading: f64,
    pub baseline: f64,
    /// Un-rounded deviation fraction used for classification
    pub deviation: f64,
    /// Deviation as a rounded whole percentage, display only
    pub deviation_percent: i64,
    pub severity: Severity,
}

/// Classifier bound to a validated threshold table
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Classifier {
    thresholds: ThresholdTable,
}

impl Classifier {
    /// Create a classifier, rejecting an invalid threshold table
    pub fn new(thresholds: ThresholdTable) -> Result<Self> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    pub fn classify(&self, reading: f64, baseline: f64) -> Result<Severity> {
        let deviation = deviation(reading, baseline)?;
        Ok(self.thresholds.severity_for(deviation))
    }

    /// Classify and keep the intermediate values
    pub fn assess(&self, reading: f64, baseline: f64) -> Result<Assessment> {
        let deviation = deviation(reading, baseline)?;

        Ok(Assessment {
            reading,
            baseline,
            deviation,
            deviation_percent: (deviation * 100.0).round() as i64,
            severity: self.thresholds.severity_for(deviation),
        })
    }
}
