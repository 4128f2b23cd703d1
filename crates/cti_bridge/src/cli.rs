//! Command-line interface handling for the CTI bridge.
//!
//! Argument parsing uses the `clap` builder API; every option overrides the
//! matching configuration file setting.

use clap::{Arg, ArgMatches, Command};
use cti_event_system::ForwardingMode;
use std::ffi::OsString;
use std::path::PathBuf;

/// Command line arguments parsed from user input.
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Optional override for log level
    pub log_level: Option<String>,
    /// Whether to force JSON log output
    pub json_logs: bool,
    /// JSON-lines file of lifecycle events to replay
    pub events_file: Option<PathBuf>,
    /// Optional override for the forwarding mode
    pub mode: Option<ForwardingMode>,
    /// Whether to publish the channel self-test message after connecting
    pub self_test: bool,
}

impl CliArgs {
    /// Parses the process arguments, exiting with usage on error.
    pub fn parse() -> Self {
        Self::from_matches(&Self::command().get_matches())
    }

    /// Parses an explicit argument list.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command().try_get_matches_from(args)?;
        Ok(Self::from_matches(&matches))
    }

    fn command() -> Command {
        Command::new("CTI Bridge")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Relays agent-contact lifecycle events to a CRM message channel")
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path")
                    .default_value("cti-bridge.toml"),
            )
            .arg(
                Arg::new("log-level")
                    .short('l')
                    .long("log-level")
                    .value_name("LEVEL")
                    .help("Log level (trace, debug, info, warn, error)"),
            )
            .arg(
                Arg::new("json-logs")
                    .long("json-logs")
                    .help("Output logs in JSON format")
                    .action(clap::ArgAction::SetTrue),
            )
            .arg(
                Arg::new("events")
                    .short('e')
                    .long("events")
                    .value_name("FILE")
                    .help("Replay lifecycle events from a JSON-lines file"),
            )
            .arg(
                Arg::new("mode")
                    .short('m')
                    .long("mode")
                    .value_name("MODE")
                    .help("Which events are forwarded to the CRM")
                    .value_parser(|value: &str| value.parse::<ForwardingMode>()),
            )
            .arg(
                Arg::new("self-test")
                    .long("self-test")
                    .help("Publish a placeholder message on the CRM channel after connecting")
                    .action(clap::ArgAction::SetTrue),
            )
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            config_path: matches
                .get_one::<String>("config")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("cti-bridge.toml")),
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
            events_file: matches.get_one::<String>("events").map(PathBuf::from),
            mode: matches.get_one::<ForwardingMode>("mode").copied(),
            self_test: matches.get_flag("self-test"),
        }
    }
}
