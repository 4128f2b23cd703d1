//! Configuration management for the CTI bridge.
//!
//! This module handles loading and validation of the bridge configuration
//! from TOML files and command-line arguments.

use cti_event_system::context::DEFAULT_LOGGER_NAME;
use cti_event_system::BridgeConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

fn default_logger_name() -> String {
    DEFAULT_LOGGER_NAME.to_string()
}

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Relay settings handed to the bridge
    #[serde(default)]
    pub bridge: BridgeConfig,
    /// Logging configuration settings
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Behaviour of the offline CRM stand-in
    #[serde(default)]
    pub dry_run: DryRunSettings,
}

/// Logging system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to output logs in JSON format
    pub json_format: bool,
    /// Name of the logger shared by the relay components
    #[serde(default = "default_logger_name")]
    pub logger_name: String,
}

/// Settings for the dry-run CRM used when no live CRM is attached.
///
/// `apex_return` is the text the remote procedure answers with, e.g.
/// `{"type":"CaseId","message":"Case found","value":"500xx"}`. Leave it unset
/// to make every remote call fail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DryRunSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apex_return: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            logger_name: default_logger_name(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, creates a default configuration file at the
    /// specified path and returns the default configuration.
    pub async fn load_from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content).await?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// `Ok(())` if the configuration is valid, or an error string describing the issue.
    pub fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            ));
        }

        if self.logging.logger_name.trim().is_empty() {
            return Err("logging.logger_name cannot be empty".to_string());
        }

        self.bridge.validate()
    }
}
