//! Anxiety Severity Agent entry point
//!
//! ```bash
//! # Serve the HTTP API
//! anxiety-severity serve --port 8083
//!
//! # Classify one reading
//! anxiety-severity classify --reading 100 --baseline 70
//!
//! # Show reading floors for a baseline
//! anxiety-severity thresholds --baseline 70 -o json
//! ```

use anxiety_severity::{run, AgentConfig, ExitCode, SeverityCli, SeverityCommands};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = SeverityCli::parse();
    init_tracing(&cli);

    let config = match AgentConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(ExitCode::from_error(&e).into());
        }
    };

    let exit_code = match run(cli, config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, code = e.code(), "Command failed");
            eprintln!("Error: {}", e);
            ExitCode::from_error(&e)
        }
    };

    std::process::exit(exit_code.into());
}

fn init_tracing(cli: &SeverityCli) {
    let serving = matches!(cli.command, SeverityCommands::Serve { .. });
    let default_level = match (serving, cli.verbose) {
        (_, 3..) => "trace",
        (_, 2) => "debug",
        (true, _) | (false, 1) => "info",
        (false, _) => "warn",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if serving {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
