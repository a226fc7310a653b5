//! Error types for the Anxiety Severity Agent

use anxiety_core::ClassifierError;
use thiserror::Error;

/// Main error type for agent operations
#[derive(Error, Debug)]
pub enum AgentError {
    /// Baseline, reading or threshold rejected by the classifier
    #[error(transparent)]
    Classification(#[from] ClassifierError),

    /// Invalid input data or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File access or I/O error
    #[error("File error: {0}")]
    FileError(String),

    /// Request or document parsing error
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AgentError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AgentError::InvalidInput(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        AgentError::ConfigError(msg.into())
    }

    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            AgentError::Classification(e) => e.code(),
            AgentError::InvalidInput(_) => "InvalidInput",
            AgentError::FileError(_) => "FileError",
            AgentError::ParseError(_) => "ParseError",
            AgentError::ConfigError(_) => "ConfigError",
            AgentError::InternalError(_) => "InternalError",
        }
    }

    /// Check if this is a user-facing error (vs internal)
    pub fn is_user_error(&self) -> bool {
        !matches!(self, AgentError::InternalError(_))
    }
}

impl From<std::io::Error> for AgentError {
    fn from(err: std::io::Error) -> Self {
        AgentError::FileError(err.to_string())
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        AgentError::ParseError(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for AgentError {
    fn from(err: serde_yaml::Error) -> Self {
        AgentError::ParseError(format!("YAML error: {}", err))
    }
}

impl From<toml::de::Error> for AgentError {
    fn from(err: toml::de::Error) -> Self {
        AgentError::ParseError(format!("TOML error: {}", err))
    }
}

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifier_error_passes_through() {
        let err: AgentError = ClassifierError::InvalidBaseline { baseline: 0.0 }.into();
        assert_eq!(err.code(), "InvalidBaseline");
        assert!(err.to_string().starts_with("Invalid baseline"));
        assert!(err.is_user_error());
    }

    #[test]
    fn test_is_user_error() {
        assert!(AgentError::invalid_input("empty").is_user_error());
        assert!(AgentError::FileError("missing".to_string()).is_user_error());
        assert!(!AgentError::InternalError("boom".to_string()).is_user_error());
    }

    #[test]
    fn test_parse_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: AgentError = json_err.into();
        assert!(matches!(err, AgentError::ParseError(_)));
        assert_eq!(err.code(), "ParseError");
    }
}
