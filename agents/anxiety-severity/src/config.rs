//! Agent configuration
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. A config file (`.toml`, `.yaml`/`.yml` or `.json`, chosen by extension)
//! 3. Environment variables named `ANXIETY__<SECTION>__<KEY>`, e.g.
//!    `ANXIETY__SERVER__PORT` or `ANXIETY__THRESHOLDS__MILD`
//!
//! CLI flags are applied on top by the binary.

use anxiety_core::ThresholdTable;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AgentError, Result};

/// Prefix for all environment variables
pub const ENV_PREFIX: &str = "ANXIETY";

/// Separator between prefix, section and key
pub const ENV_SEPARATOR: &str = "__";

/// Complete agent configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub server: ServerConfig,
    pub thresholds: ThresholdTable,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8083,
        }
    }
}

/// Decision signal delivery settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Signal sink base URL; emission is disabled when unset
    pub endpoint: Option<String>,

    /// Bearer token for the sink
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Maximum queue size for buffering signals
    pub max_queue_size: usize,

    /// Timeout for a single delivery in milliseconds
    pub timeout_ms: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            max_queue_size: 1000,
            timeout_ms: 5000,
        }
    }
}

impl TelemetryConfig {
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            ..Default::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.endpoint.as_deref().is_some_and(|e| !e.trim().is_empty())
    }
}

/// Build the environment variable name for a section and key
pub fn env_name(section: &str, key: &str) -> String {
    format!(
        "{}{}{}{}{}",
        ENV_PREFIX, ENV_SEPARATOR, section, ENV_SEPARATOR, key
    )
    .replace('-', "_")
    .to_uppercase()
}

impl AgentConfig {
    /// Defaults, then the optional file, then process environment, validated
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_from(std::env::vars())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file, choosing the format from its extension
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AgentError::FileError(format!("Cannot read {}: {}", path.display(), e))
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let config = match extension.as_deref() {
            Some("toml") => toml::from_str(&content)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            other => {
                return Err(AgentError::config_error(format!(
                    "Unsupported config format: {}",
                    other.unwrap_or("<none>")
                )))
            }
        };

        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Apply `ANXIETY__*` overrides from the given variables
    pub fn apply_env_from<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let prefix = format!("{}{}", ENV_PREFIX, ENV_SEPARATOR);

        for (name, value) in vars {
            if !name.starts_with(&prefix) {
                continue;
            }

            if name == env_name("server", "host") {
                self.server.host = value;
            } else if name == env_name("server", "port") {
                self.server.port = parse_env(&name, &value)?;
            } else if name == env_name("thresholds", "mild") {
                self.thresholds.mild = parse_env(&name, &value)?;
            } else if name == env_name("thresholds", "moderate") {
                self.thresholds.moderate = parse_env(&name, &value)?;
            } else if name == env_name("thresholds", "severe") {
                self.thresholds.severe = parse_env(&name, &value)?;
            } else if name == env_name("thresholds", "critical") {
                self.thresholds.critical = parse_env(&name, &value)?;
            } else if name == env_name("telemetry", "endpoint") {
                self.telemetry.endpoint = Some(value).filter(|v| !v.is_empty());
            } else if name == env_name("telemetry", "api_key") {
                self.telemetry.api_key = Some(value).filter(|v| !v.is_empty());
            } else if name == env_name("telemetry", "max_queue_size") {
                self.telemetry.max_queue_size = parse_env(&name, &value)?;
            } else if name == env_name("telemetry", "timeout_ms") {
                self.telemetry.timeout_ms = parse_env(&name, &value)?;
            } else {
                tracing::warn!(variable = %name, "Ignoring unknown configuration variable");
            }
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;

        if self.server.port == 0 {
            return Err(AgentError::config_error("server.port must be non-zero"));
        }
        if self.telemetry.max_queue_size == 0 {
            return Err(AgentError::config_error(
                "telemetry.max_queue_size must be non-zero",
            ));
        }
        if self.telemetry.timeout_ms == 0 {
            return Err(AgentError::config_error(
                "telemetry.timeout_ms must be non-zero",
            ));
        }

        Ok(())
    }
}

fn parse_env<T>(name: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| AgentError::config_error(format!("{}='{}': {}", name, value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_env_name() {
        assert_eq!(env_name("thresholds", "mild"), "ANXIETY__THRESHOLDS__MILD");
        assert_eq!(
            env_name("telemetry", "max-queue-size"),
            "ANXIETY__TELEMETRY__MAX_QUEUE_SIZE"
        );
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AgentConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.thresholds, ThresholdTable::default());
        assert!(!config.telemetry.is_enabled());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AgentConfig::default();
        config
            .apply_env_from(vars(&[
                ("ANXIETY__SERVER__PORT", "9000"),
                ("ANXIETY__THRESHOLDS__MILD", "0.25"),
                ("ANXIETY__TELEMETRY__ENDPOINT", "http://sink:8080"),
                ("PATH", "/usr/bin"),
            ]))
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.thresholds.mild, 0.25);
        assert!(config.telemetry.is_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_parse_failure() {
        let mut config = AgentConfig::default();
        let err = config
            .apply_env_from(vars(&[("ANXIETY__SERVER__PORT", "eighty")]))
            .unwrap_err();
        assert!(matches!(err, AgentError::ConfigError(_)));
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let mut config = AgentConfig::default();
        config
            .apply_env_from(vars(&[("ANXIETY__THRESHOLDS__MODERATE", "0.9")]))
            .unwrap();

        let err = config.validate().unwrap_err();
        assert_eq!(err.code(), "InvalidThresholds");
    }

    #[test]
    fn test_zero_port_rejected() {
        let mut config = AgentConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }
}
