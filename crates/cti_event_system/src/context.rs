//! # Bridge Logging Facility
//!
//! The relay components do not reach for a global logger. A single
//! [`BridgeLogger`] is created at startup, named after the widget that owns
//! it, and handed to every component that needs to log. Output goes through
//! `tracing`, so the subscriber installed by the host decides formatting and
//! filtering.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, trace, warn};

/// Default logger name used by the desktop widget.
pub const DEFAULT_LOGGER_NAME: &str = "sdk-widget-logger";

/// Log levels for bridge messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Named logger shared by the relay components.
///
/// # Examples
///
/// ```rust
/// use cti_event_system::{BridgeLogger, LogLevel};
/// use std::sync::Arc;
///
/// let logger = Arc::new(BridgeLogger::new("sdk-widget-logger"));
/// logger.log(LogLevel::Info, "bridge connected");
/// ```
#[derive(Debug, Clone)]
pub struct BridgeLogger {
    name: String,
}

impl BridgeLogger {
    /// Creates a logger with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the logger's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Logs a message with the specified level.
    pub fn log(&self, level: LogLevel, message: &str) {
        let logger = self.name.as_str();
        match level {
            LogLevel::Trace => trace!(logger = logger, "{}", message),
            LogLevel::Debug => debug!(logger = logger, "{}", message),
            LogLevel::Info => info!(logger = logger, "{}", message),
            LogLevel::Warn => warn!(logger = logger, "{}", message),
            LogLevel::Error => error!(logger = logger, "{}", message),
        }
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

impl Default for BridgeLogger {
    fn default() -> Self {
        Self::new(DEFAULT_LOGGER_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_logger_name() {
        assert_eq!(BridgeLogger::default().name(), "sdk-widget-logger");
    }

    #[test]
    fn test_log_level_serde() {
        let level: LogLevel = serde_json::from_str("\"warn\"").unwrap();
        assert_eq!(level, LogLevel::Warn);
    }

    #[test]
    fn test_logging_without_subscriber_is_silent() {
        let logger = BridgeLogger::new("test");
        for level in [LogLevel::Trace, LogLevel::Debug, LogLevel::Info, LogLevel::Warn, LogLevel::Error] {
            logger.log(level, "no subscriber installed");
        }
    }
}
