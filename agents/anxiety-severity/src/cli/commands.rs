//! Command definitions and execution for the Anxiety Severity Agent CLI

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use super::output::{self, OutputFormat};
use super::ExitCode;
use crate::config::AgentConfig;
use crate::contracts::{ClassifyRequest, ThresholdsResponse};
use crate::engine::ClassificationEngine;
use crate::error::{AgentError, Result};

/// Anxiety Severity Agent - heart-rate deviation classification
#[derive(Parser, Debug)]
#[command(name = "anxiety-severity")]
#[command(about = "Classify heart-rate readings against a resting baseline")]
#[command(version)]
pub struct SeverityCli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, global = true, env = "ANXIETY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: SeverityCommands,
}

#[derive(Subcommand, Debug)]
pub enum SeverityCommands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Classify a single reading
    Classify {
        /// Current heart rate (BPM)
        #[arg(short, long, allow_negative_numbers = true)]
        reading: f64,

        /// Resting baseline heart rate (BPM)
        #[arg(short, long, allow_negative_numbers = true)]
        baseline: f64,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Classify a document of readings (JSON or YAML)
    Batch {
        /// Path to the request document
        #[arg(short, long)]
        file: PathBuf,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show the minimum reading for each severity at a baseline
    Thresholds {
        /// Resting baseline heart rate (BPM)
        #[arg(short, long, allow_negative_numbers = true)]
        baseline: f64,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

pub fn execute_classify(
    config: &AgentConfig,
    reading: f64,
    baseline: f64,
    format: OutputFormat,
) -> Result<ExitCode> {
    let engine = ClassificationEngine::with_thresholds(config.thresholds)?;
    let assessment = engine.classify_one(reading, baseline)?;

    tracing::debug!(
        reading,
        baseline,
        severity = %assessment.severity,
        "Classified reading"
    );

    print!("{}", output::render_assessment(&assessment, format)?);
    Ok(ExitCode::Success)
}

pub fn execute_batch(config: &AgentConfig, file: &Path, format: OutputFormat) -> Result<ExitCode> {
    let request = read_request(file)?;
    let engine = ClassificationEngine::with_thresholds(config.thresholds)?;
    let input = ClassificationEngine::create_input(request, "cli".to_string());
    let result = engine.classify(&input)?;

    print!("{}", output::render_classification(&result, format)?);
    Ok(ExitCode::Success)
}

pub fn execute_thresholds(
    config: &AgentConfig,
    baseline: f64,
    format: OutputFormat,
) -> Result<ExitCode> {
    let floors = config.thresholds.bpm_floors(baseline)?;
    let response = ThresholdsResponse {
        baseline_bpm: baseline,
        floors,
    };

    print!("{}", output::render_floors(&response, format)?);
    Ok(ExitCode::Success)
}

/// Load a classification request from a JSON or YAML file
pub fn read_request(file: &Path) -> Result<ClassifyRequest> {
    let content = std::fs::read_to_string(file)
        .map_err(|e| AgentError::FileError(format!("Cannot read {}: {}", file.display(), e)))?;

    let is_yaml = file
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    if is_yaml {
        Ok(serde_yaml::from_str(&content)?)
    } else {
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    #[test]
    fn test_cli_definition() {
        SeverityCli::command().debug_assert();
    }

    #[test]
    fn test_parse_classify() {
        let cli = SeverityCli::try_parse_from([
            "anxiety-severity",
            "classify",
            "--reading",
            "100",
            "--baseline",
            "70",
            "-o",
            "json",
        ])
        .unwrap();

        match cli.command {
            SeverityCommands::Classify {
                reading,
                baseline,
                format,
            } => {
                assert_eq!(reading, 100.0);
                assert_eq!(baseline, 70.0);
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_negative_baseline() {
        let cli = SeverityCli::try_parse_from([
            "anxiety-severity",
            "thresholds",
            "--baseline",
            "-70",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            SeverityCommands::Thresholds { baseline, .. } if baseline == -70.0
        ));
    }

    #[test]
    fn test_read_request_yaml() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "baseline_bpm: 70\nreadings:\n  - bpm: 84\n  - bpm: 126\nuser_id: user-1"
        )
        .unwrap();

        let request = read_request(file.path()).unwrap();
        assert_eq!(request.baseline_bpm, 70.0);
        assert_eq!(request.readings.len(), 2);
        assert_eq!(request.user_id.as_deref(), Some("user-1"));
    }

    #[test]
    fn test_read_request_missing_file() {
        let err = read_request(Path::new("/nonexistent/readings.json")).unwrap_err();
        assert!(matches!(err, AgentError::FileError(_)));
    }

    #[test]
    fn test_execute_classify_invalid_baseline() {
        let err = execute_classify(&AgentConfig::default(), 90.0, 0.0, OutputFormat::Json)
            .unwrap_err();
        assert_eq!(ExitCode::from_error(&err), ExitCode::InvalidInput);
    }

    fn request_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{}", json).unwrap();
        file
    }

    #[test]
    fn test_execute_batch() {
        let file = request_file(r#"{"baseline_bpm": 70, "readings": [{"bpm": 84}, {"bpm": 126}]}"#);
        let code = execute_batch(&AgentConfig::default(), file.path(), OutputFormat::Json).unwrap();
        assert_eq!(code, ExitCode::Success);
    }

    #[test]
    fn test_execute_batch_rejected_request() {
        let file = request_file(r#"{"baseline_bpm": 0, "readings": [{"bpm": 84}]}"#);
        let err = execute_batch(&AgentConfig::default(), file.path(), OutputFormat::Table)
            .unwrap_err();
        assert_eq!(err.code(), "InvalidBaseline");
        assert_eq!(ExitCode::from_error(&err), ExitCode::InvalidInput);
    }

    #[test]
    fn test_execute_batch_malformed_document() {
        let file = request_file(r#"{"baseline_bpm": 70"#);
        let err = execute_batch(&AgentConfig::default(), file.path(), OutputFormat::Json)
            .unwrap_err();
        assert_eq!(ExitCode::from_error(&err), ExitCode::ParseError);
    }

    #[test]
    fn test_execute_thresholds() {
        let code = execute_thresholds(&AgentConfig::default(), 70.0, OutputFormat::Table).unwrap();
        assert_eq!(code, ExitCode::Success);
    }

    #[test]
    fn test_execute_thresholds_negative_baseline() {
        let err = execute_thresholds(&AgentConfig::default(), -70.0, OutputFormat::Json)
            .unwrap_err();
        assert_eq!(ExitCode::from_error(&err), ExitCode::InvalidInput);
    }
}
