//! # CTI Bridge - Main Entry Point
//!
//! Runs the agent-contact relay against an in-process event bus and an
//! offline CRM stand-in. Handles CLI parsing, configuration loading and the
//! application lifecycle.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run with default configuration, waiting for Ctrl+C
//! cti-bridge --self-test
//!
//! # Replay a recorded contact and forward offers only
//! cti-bridge --events calls.jsonl --mode offer --log-level debug
//!
//! # JSON logging
//! cti-bridge --json-logs
//! ```
//!
//! ## Configuration
//!
//! The bridge loads configuration from a TOML file (default:
//! `cti-bridge.toml`). If the file doesn't exist, a default configuration
//! will be created.

use tracing::error;

pub mod app;
pub mod cli;
pub mod config;
pub mod dry_run;
pub mod logging;

use app::Application;
use cli::CliArgs;
use config::AppConfig;

pub use config::{DryRunSettings, LoggingSettings};

/// Entry point for the `cti-bridge` binary.
///
/// # Exit Codes
///
/// * **0**: Successful execution and shutdown
/// * **1**: Error during startup, configuration, or runtime
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Logging settings come from the file before the full load below
    let mut logging_settings = AppConfig::load_from_file(&args.config_path)
        .await
        .unwrap_or_default()
        .logging;
    if let Some(level) = &args.log_level {
        logging_settings.level = level.clone();
    }

    if let Err(e) = logging::setup_logging(&logging_settings, args.json_logs) {
        eprintln!("❌ Failed to setup logging: {e}");
        std::process::exit(1);
    }

    match Application::new(args).await {
        Ok(app) => {
            if let Err(e) = app.run().await {
                error!("❌ Application error: {:?}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("❌ Failed to start application: {e:?}");
            std::process::exit(1);
        }
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_reexports() {
        assert_eq!(LoggingSettings::default().level, "info");
        assert!(DryRunSettings::default().apex_return.is_none());
    }
}
