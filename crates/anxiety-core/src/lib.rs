//! Anxiety severity classification core
//!
//! Maps a heart-rate reading and a user's resting baseline to an anxiety
//! severity. The deviation `(reading - baseline) / baseline` is compared as an
//! un-rounded fraction against a threshold table, highest threshold first:
//!
//! | Deviation >= | Severity |
//! |---|---|
//! | 0.80 | critical |
//! | 0.50 | severe |
//! | 0.30 | moderate |
//! | 0.20 | mild |
//! | below 0.20 | normal |
//!
//! # Example
//!
//! ```rust
//! use anxiety_core::{classify, Severity, SeverityLabel};
//!
//! let severity = classify(84.0, 70.0).unwrap();
//! assert_eq!(severity, Severity::Event(SeverityLabel::Mild));
//!
//! assert!(classify(100.0, 0.0).is_err());
//! ```
//!
//! A [`Classifier`] holds no mutable state and can be shared across threads.

pub mod classifier;
pub mod error;
pub mod severity;
pub mod thresholds;

pub use classifier::{classify, deviation, Assessment, Classifier};
pub use error::{ClassifierError, Result};
pub use severity::{Severity, SeverityLabel};
pub use thresholds::{ThresholdFloor, ThresholdTable};
