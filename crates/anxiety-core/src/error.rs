//! Error types for severity classification

use thiserror::Error;

/// Errors raised while classifying a reading
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// Baseline is zero, negative, or not a finite number
    #[error("Invalid baseline: {baseline} BPM (must be a positive number)")]
    InvalidBaseline { baseline: f64 },

    /// Reading is NaN or infinite
    #[error("Invalid reading: {reading} BPM (must be a finite number)")]
    InvalidReading { reading: f64 },

    /// Threshold table is not positive and strictly increasing
    #[error("Invalid thresholds: {0}")]
    InvalidThresholds(String),
}

impl ClassifierError {
    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            ClassifierError::InvalidBaseline { .. } => "InvalidBaseline",
            ClassifierError::InvalidReading { .. } => "InvalidReading",
            ClassifierError::InvalidThresholds(_) => "InvalidThresholds",
        }
    }
}

/// Result type alias for classification operations
pub type Result<T> = std::result::Result<T, ClassifierError>;
