//! Deviation thresholds
//!
//! Thresholds are fractions of the baseline heart rate and act as inclusive
//! lower bounds. Lookup walks the table from the highest threshold down, so a
//! deviation is assigned exactly one label.

use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};
use crate::severity::{Severity, SeverityLabel};

pub const DEFAULT_MILD: f64 = 0.20;
pub const DEFAULT_MODERATE: f64 = 0.30;
pub const DEFAULT_SEVERE: f64 = 0.50;
pub const DEFAULT_CRITICAL: f64 = 0.80;

/// Deviation thresholds, one inclusive lower bound per severity label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdTable {
    pub mild: f64,
    pub moderate: f64,
    pub severe: f64,
    pub critical: f64,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            mild: DEFAULT_MILD,
            moderate: DEFAULT_MODERATE,
            severe: DEFAULT_SEVERE,
            critical: DEFAULT_CRITICAL,
        }
    }
}

/// Minimum reading that reaches a label for a given baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdFloor {
    pub label: SeverityLabel,
    /// Threshold as a fraction of baseline
    pub fraction: f64,
    /// Threshold as a whole percentage, for display
    pub percent: i64,
    /// Lowest reading (BPM) classified at or above `label`
    pub min_bpm: f64,
}

impl ThresholdTable {
    /// Build a table and validate it
    pub fn new(mild: f64, moderate: f64, severe: f64, critical: f64) -> Result<Self> {
        let table = Self {
            mild,
            moderate,
            severe,
            critical,
        };
        table.validate()?;
        Ok(table)
    }

    /// Check that every threshold is finite, positive and strictly above the
    /// one below it.
    pub fn validate(&self) -> Result<()> {
        let entries = self.entries();

        for (label, value) in &entries {
            if !value.is_finite() || *value <= 0.0 {
                return Err(ClassifierError::InvalidThresholds(format!(
                    "{} threshold must be a positive finite fraction, got {}",
                    label, value
                )));
            }
        }

        for pair in entries.windows(2) {
            let (lower_label, lower) = pair[0];
            let (upper_label, upper) = pair[1];
            if upper <= lower {
                return Err(ClassifierError::InvalidThresholds(format!(
                    "{} threshold ({}) must be greater than {} threshold ({})",
                    upper_label, upper, lower_label, lower
                )));
            }
        }

        Ok(())
    }

    /// Threshold for a single label
    pub fn threshold(&self, label: SeverityLabel) -> f64 {
        match label {
            SeverityLabel::Mild => self.mild,
            SeverityLabel::Moderate => self.moderate,
            SeverityLabel::Severe => self.severe,
            SeverityLabel::Critical => self.critical,
        }
    }

    /// `(label, threshold)` pairs, lowest first
    pub fn entries(&self) -> [(SeverityLabel, f64); 4] {
        SeverityLabel::ALL.map(|label| (label, self.threshold(label)))
    }

    /// Map an un-rounded deviation fraction to a severity.
    ///
    /// NaN never satisfies a comparison and lands in `Normal`; callers that
    /// need to reject it must do so before calling.
    pub fn severity_for(&self, deviation: f64) -> Severity {
        self.entries()
            .iter()
            .rev()
            .find(|(_, threshold)| deviation >= *threshold)
            .map(|(label, _)| Severity::Event(*label))
            .unwrap_or(Severity::Normal)
    }

    /// Reading floors for each label at the given baseline, lowest first
    pub fn bpm_floors(&self, baseline: f64) -> Result<Vec<ThresholdFloor>> {
        if !baseline.is_finite() || baseline <= 0.0 {
            return Err(ClassifierError::InvalidBaseline { baseline });
        }

        Ok(self
            .entries()
            .iter()
            .map(|(label, fraction)| ThresholdFloor {
                label: *label,
                fraction: *fraction,
                percent: (fraction * 100.0).round() as i64,
                min_bpm: baseline * (1.0 + fraction),
            })
            .collect())
    }

    /// Human-readable constraint strings, e.g. `moderate>=0.30`
    pub fn describe(&self) -> Vec<String> {
        self.entries()
            .iter()
            .map(|(label, fraction)| format!("{}>={:.2}", label, fraction))
            .collect()
    }
}
