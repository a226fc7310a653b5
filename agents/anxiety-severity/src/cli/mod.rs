//! CLI module for the Anxiety Severity Agent
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 3: Invalid input (baseline, reading or request rejected)
//! - 4: File not found or inaccessible
//! - 5: Document could not be parsed
//! - 6: Invalid configuration
//! - 10: Internal error

pub mod commands;
pub mod output;

pub use commands::{SeverityCli, SeverityCommands};
pub use output::OutputFormat;

use crate::config::AgentConfig;
use crate::error::{AgentError, Result};
use crate::handler;

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    InvalidInput = 3,
    FileError = 4,
    ParseError = 5,
    ConfigError = 6,
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    pub fn from_error(err: &AgentError) -> Self {
        match err {
            AgentError::Classification(_) | AgentError::InvalidInput(_) => ExitCode::InvalidInput,
            AgentError::FileError(_) => ExitCode::FileError,
            AgentError::ParseError(_) => ExitCode::ParseError,
            AgentError::ConfigError(_) => ExitCode::ConfigError,
            AgentError::InternalError(_) => ExitCode::InternalError,
        }
    }
}

/// Apply CLI overrides and run the selected command
pub async fn run(cli: SeverityCli, mut config: AgentConfig) -> Result<ExitCode> {
    match cli.command {
        SeverityCommands::Serve { port, host } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            config.validate()?;
            handler::serve(&config).await?;
            Ok(ExitCode::Success)
        }
        SeverityCommands::Classify {
            reading,
            baseline,
            format,
        } => commands::execute_classify(&config, reading, baseline, format),
        SeverityCommands::Batch { file, format } => {
            commands::execute_batch(&config, &file, format)
        }
        SeverityCommands::Thresholds { baseline, format } => {
            commands::execute_thresholds(&config, baseline, format)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anxiety_core::ClassifierError;

    #[test]
    fn test_exit_code_conversion() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::InvalidInput), 3);
        assert_eq!(i32::from(ExitCode::InternalError), 10);
    }

    #[test]
    fn test_exit_code_from_error() {
        assert_eq!(
            ExitCode::from_error(&AgentError::from(ClassifierError::InvalidBaseline {
                baseline: 0.0
            })),
            ExitCode::InvalidInput
        );
        assert_eq!(
            ExitCode::from_error(&AgentError::FileError("gone".to_string())),
            ExitCode::FileError
        );
        assert_eq!(
            ExitCode::from_error(&AgentError::config_error("bad")),
            ExitCode::ConfigError
        );
    }
}
