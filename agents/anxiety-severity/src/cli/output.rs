//! Output formatting for the Anxiety Severity Agent CLI
//!
//! JSON and YAML for machines, a colored table for operators.

use anxiety_core::{Assessment, Severity, SeverityLabel};
use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use serde::Serialize;
use std::fmt::Write;

use crate::contracts::{ClassificationOutput, ThresholdsResponse};
use crate::error::{AgentError, Result};

/// Output format options for CLI results
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable table format with colors
    #[default]
    Table,
    /// JSON format for machine processing
    Json,
    /// YAML format
    Yaml,
}

/// Serialize for the machine formats; `None` means render a table
fn serialize<T: Serialize>(value: &T, format: OutputFormat) -> Result<Option<String>> {
    match format {
        OutputFormat::Json => Ok(Some(serde_json::to_string_pretty(value)?)),
        OutputFormat::Yaml => Ok(Some(serde_yaml::to_string(value)?)),
        OutputFormat::Table => Ok(None),
    }
}

fn paint(severity: Severity) -> ColoredString {
    let text = severity.as_str();
    match severity {
        Severity::Normal => text.green(),
        Severity::Event(SeverityLabel::Mild) => text.yellow(),
        Severity::Event(SeverityLabel::Moderate) => text.bright_yellow().bold(),
        Severity::Event(SeverityLabel::Severe) => text.red(),
        Severity::Event(SeverityLabel::Critical) => text.bright_red().bold(),
    }
}

fn signed_percent(percent: i64) -> String {
    if percent > 0 {
        format!("+{}%", percent)
    } else {
        format!("{}%", percent)
    }
}

/// Render a single-reading assessment
pub fn render_assessment(assessment: &Assessment, format: OutputFormat) -> Result<String> {
    if let Some(text) = serialize(assessment, format)? {
        return Ok(text);
    }

    let mut out = String::new();
    writeln!(out, "Reading:    {:.1} BPM", assessment.reading).map_err(fmt_error)?;
    writeln!(out, "Baseline:   {:.1} BPM", assessment.baseline).map_err(fmt_error)?;
    writeln!(
        out,
        "Deviation:  {}",
        signed_percent(assessment.deviation_percent)
    )
    .map_err(fmt_error)?;
    writeln!(out, "Severity:   {}", paint(assessment.severity)).map_err(fmt_error)?;
    Ok(out)
}

/// Render a multi-reading classification
pub fn render_classification(output: &ClassificationOutput, format: OutputFormat) -> Result<String> {
    if let Some(text) = serialize(output, format)? {
        return Ok(text);
    }

    let mut out = String::new();
    writeln!(
        out,
        "Baseline {:.1} BPM, {} reading(s), peak {}",
        output.baseline_bpm,
        output.assessments.len(),
        paint(output.peak_severity)
    )
    .map_err(fmt_error)?;
    writeln!(
        out,
        "{}",
        format!("{:>5}  {:>7}  {:>9}  {}", "#", "BPM", "DEVIATION", "SEVERITY").bold()
    )
    .map_err(fmt_error)?;

    for a in &output.assessments {
        writeln!(
            out,
            "{:>5}  {:>7.1}  {:>9}  {}",
            a.index,
            a.bpm,
            signed_percent(a.deviation_percent),
            paint(a.severity)
        )
        .map_err(fmt_error)?;
    }

    let c = &output.counts;
    writeln!(
        out,
        "Events: {} (mild {}, moderate {}, severe {}, critical {})",
        c.events(),
        c.mild,
        c.moderate,
        c.severe,
        c.critical
    )
    .map_err(fmt_error)?;
    Ok(out)
}

/// Render the reading floors for a baseline
pub fn render_floors(response: &ThresholdsResponse, format: OutputFormat) -> Result<String> {
    if let Some(text) = serialize(response, format)? {
        return Ok(text);
    }

    let mut out = String::new();
    writeln!(out, "Thresholds for baseline {:.1} BPM", response.baseline_bpm)
        .map_err(fmt_error)?;
    writeln!(
        out,
        "{}",
        format!("{:<10}  {:>9}  {:>7}", "SEVERITY", "DEVIATION", "MIN BPM").bold()
    )
    .map_err(fmt_error)?;

    for floor in &response.floors {
        writeln!(
            out,
            "{:<10}  {:>9}  {:>7.1}",
            floor.label.as_str(),
            format!(">= {}%", floor.percent),
            floor.min_bpm
        )
        .map_err(fmt_error)?;
    }
    Ok(out)
}

fn fmt_error(err: std::fmt::Error) -> AgentError {
    AgentError::InternalError(format!("Formatting error: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anxiety_core::{Classifier, ThresholdTable};

    #[test]
    fn test_assessment_json() {
        let assessment = Classifier::default().assess(84.0, 70.0).unwrap();
        let text = render_assessment(&assessment, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["severity"], "mild");
        assert_eq!(value["deviation_percent"], 20);
    }

    #[test]
    fn test_assessment_table() {
        let assessment = Classifier::default().assess(100.0, 70.0).unwrap();
        let text = render_assessment(&assessment, OutputFormat::Table).unwrap();

        assert!(text.contains("+43%"));
        assert!(text.contains("moderate"));
    }

    #[test]
    fn test_floors_table() {
        let response = ThresholdsResponse {
            baseline_bpm: 70.0,
            floors: ThresholdTable::default().bpm_floors(70.0).unwrap(),
        };
        let text = render_floors(&response, OutputFormat::Table).unwrap();

        assert!(text.contains(">= 30%"));
        assert!(text.contains("91.0"));
        assert!(text.contains("126.0"));
    }

    #[test]
    fn test_floors_yaml() {
        let response = ThresholdsResponse {
            baseline_bpm: 70.0,
            floors: ThresholdTable::default().bpm_floors(70.0).unwrap(),
        };
        let text = render_floors(&response, OutputFormat::Yaml).unwrap();
        assert!(text.contains("label: critical"));
    }

    #[test]
    fn test_signed_percent() {
        assert_eq!(signed_percent(12), "+12%");
        assert_eq!(signed_percent(0), "0%");
        assert_eq!(signed_percent(-8), "-8%");
    }
}
