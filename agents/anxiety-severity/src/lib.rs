//! Anxiety Severity Agent
//!
//! Classifies heart-rate readings against a user's resting baseline and emits
//! anxiety_severity_signal decision events.
//!
//! # Design Principles
//! - Deterministic: same baseline and readings always produce the same labels
//! - Stateless: baselines and readings are never stored
//! - Traceable: every HTTP classification yields a DecisionEvent

pub mod cli;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod handler;
pub mod telemetry;

// Re-export contracts
#[path = "../contracts/mod.rs"]
pub mod contracts;

pub use cli::{run, ExitCode, SeverityCli, SeverityCommands};
pub use config::AgentConfig;
pub use contracts::*;
pub use error::{AgentError, Result};
