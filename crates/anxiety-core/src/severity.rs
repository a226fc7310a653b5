//! Severity labels and classification outcomes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Anxiety severity label, ordered from least to most intense
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityLabel {
    Mild,
    Moderate,
    Severe,
    Critical,
}

impl SeverityLabel {
    /// All labels, lowest first
    pub const ALL: [SeverityLabel; 4] = [
        SeverityLabel::Mild,
        SeverityLabel::Moderate,
        SeverityLabel::Severe,
        SeverityLabel::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for SeverityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying a reading.
///
/// `Normal` means the deviation stayed below the lowest threshold and no
/// anxiety event is reported. The derived ordering is the severity rank:
/// `normal < mild < moderate < severe < critical`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum Severity {
    #[default]
    Normal,
    Event(SeverityLabel),
}

impl Severity {
    /// Numeric rank, 0 for normal through 4 for critical
    pub fn rank(&self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Event(SeverityLabel::Mild) => 1,
            Self::Event(SeverityLabel::Moderate) => 2,
            Self::Event(SeverityLabel::Severe) => 3,
            Self::Event(SeverityLabel::Critical) => 4,
        }
    }

    /// Label of the anxiety event, if any
    pub fn label(&self) -> Option<SeverityLabel> {
        match self {
            Self::Normal => None,
            Self::Event(label) => Some(*label),
        }
    }

    pub fn is_event(&self) -> bool {
        matches!(self, Self::Event(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Event(label) => label.as_str(),
        }
    }
}

impl From<SeverityLabel> for Severity {
    fn from(label: SeverityLabel) -> Self {
        Self::Event(label)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "mild" => Ok(Self::Event(SeverityLabel::Mild)),
            "moderate" => Ok(Self::Event(SeverityLabel::Moderate)),
            "severe" => Ok(Self::Event(SeverityLabel::Severe)),
            "critical" => Ok(Self::Event(SeverityLabel::Critical)),
            other => Err(format!("Unknown severity: '{}'", other)),
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_matches_ordering() {
        let ordered = [
            Severity::Normal,
            Severity::Event(SeverityLabel::Mild),
            Severity::Event(SeverityLabel::Moderate),
            Severity::Event(SeverityLabel::Severe),
            Severity::Event(SeverityLabel::Critical),
        ];

        for pair in ordered.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].rank() < pair[1].rank());
        }
    }

    #[test]
    fn test_label() {
        assert_eq!(Severity::Normal.label(), None);
        assert!(!Severity::Normal.is_event());
        assert_eq!(
            Severity::Event(SeverityLabel::Severe).label(),
            Some(SeverityLabel::Severe)
        );
    }

    #[test]
    fn test_serde_as_plain_string() {
        let json = serde_json::to_string(&Severity::Event(SeverityLabel::Critical)).unwrap();
        assert_eq!(json, "\"critical\"");

        let parsed: Severity = serde_json::from_str("\"normal\"").unwrap();
        assert_eq!(parsed, Severity::Normal);

        assert!(serde_json::from_str::<Severity>("\"panic\"").is_err());
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "Moderate".parse::<Severity>().unwrap(),
            Severity::Event(SeverityLabel::Moderate)
        );
        assert!("elevated".parse::<Severity>().is_err());
    }
}
