//! Main application logic and lifecycle management.
//!
//! The `Application` wires the relay to an in-process contact event bus and
//! the dry-run CRM, then either replays a recorded event stream or stays
//! connected until a shutdown signal arrives.

use crate::{cli::CliArgs, config::AppConfig, dry_run::{DryRunCrm, DryRunStats}, logging::display_banner};
use cti_event_system::{BridgeLogger, ContactEventBus, ContactEventBusStats, EventBridge, LifecycleEvent};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Outcome of one application run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Events read from the replay file and emitted on the bus
    pub events_replayed: usize,
    /// Replay lines that could not be decoded
    pub events_skipped: usize,
    pub bus: ContactEventBusStats,
    pub crm: DryRunStats,
}

/// Main application struct.
pub struct Application {
    /// Loaded application configuration
    config: AppConfig,
    /// Replay source; `None` keeps the bridge connected until shutdown
    events_file: Option<PathBuf>,
    self_test: bool,
    bus: ContactEventBus,
    crm: Arc<DryRunCrm>,
    bridge: Arc<EventBridge>,
}

impl Application {
    /// Creates a new application instance.
    ///
    /// # Process
    ///
    /// 1. Load configuration from file (creating default if missing)
    /// 2. Apply command-line argument overrides
    /// 3. Validate merged configuration
    /// 4. Display startup banner
    /// 5. Build the bus, CRM stand-in and bridge
    pub async fn new(args: CliArgs) -> Result<Self, Box<dyn std::error::Error>> {
        info!("🔧 Loading configuration from: {}", args.config_path.display());
        let mut config = AppConfig::load_from_file(&args.config_path).await?;

        if let Some(log_level) = args.log_level {
            config.logging.level = log_level;
        }

        if args.json_logs {
            config.logging.json_format = true;
        }

        if let Some(mode) = args.mode {
            config.bridge.forwarding.mode = mode;
        }

        if let Err(e) = config.validate() {
            return Err(format!("Configuration validation failed: {e}").into());
        } else {
            info!("✅ Configuration loaded and validated successfully");
        }

        display_banner();

        Self::with_config(config, args.events_file, args.self_test)
    }

    /// Builds the application from an already validated configuration.
    pub fn with_config(
        config: AppConfig,
        events_file: Option<PathBuf>,
        self_test: bool,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let logger = Arc::new(BridgeLogger::new(config.logging.logger_name.clone()));
        let crm = Arc::new(DryRunCrm::new(&config.dry_run));
        let bridge = Arc::new(EventBridge::new(&config.bridge, crm.clone(), logger)?);

        info!(
            "📂 Channel: {} | Procedure: {}.{} | Mode: {:?}",
            config.bridge.channel_name,
            config.bridge.apex_class,
            config.bridge.method_name,
            config.bridge.forwarding.mode
        );

        Ok(Self {
            config,
            events_file,
            self_test,
            bus: ContactEventBus::new(),
            crm,
            bridge,
        })
    }

    /// Runs the application until the replay ends or a shutdown signal
    /// arrives, then detaches every listener.
    pub async fn run(self) -> Result<RunSummary, Box<dyn std::error::Error>> {
        let attached = self.bridge.connect(&self.bus).await?;
        info!("🔌 Bridge connected with {} listeners", attached);

        self.bridge.subscribe_inbound().await;
        if self.self_test {
            self.bridge.publish_self_test().await;
        }

        let mut summary = RunSummary::default();
        let outcome = match &self.events_file {
            Some(path) => self.replay(path, &mut summary).await,
            None => {
                info!("📡 Waiting for lifecycle events; press Ctrl+C to stop");
                tokio::signal::ctrl_c().await.map_err(Into::into)
            }
        };

        let removed = self.bridge.disconnect(&self.bus).await;
        info!("🧹 Bridge disconnected, {} listeners removed", removed);

        summary.bus = self.bus.get_stats().await;
        summary.crm = self.crm.get_stats().await;
        info!(
            "📊 Events: {} emitted, {} unheard | CRM: {} published, {} remote calls, {} screen pops",
            summary.bus.events_emitted,
            summary.bus.events_without_handlers,
            summary.crm.messages_published,
            summary.crm.remote_calls,
            summary.crm.screen_pops
        );

        outcome?;
        Ok(summary)
    }

    async fn replay(&self, path: &Path, summary: &mut RunSummary) -> Result<(), Box<dyn std::error::Error>> {
        info!("▶️ Replaying lifecycle events from {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;

        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match serde_json::from_str::<LifecycleEvent>(line) {
                Ok(event) => {
                    self.bus.emit(event).await;
                    summary.events_replayed += 1;
                }
                Err(e) => {
                    warn!("⚠️ Skipping line {} of {}: {}", index + 1, path.display(), e);
                    summary.events_skipped += 1;
                }
            }
        }

        // Relays run on their own tasks; let them land before the summary
        let settled = self.bridge.flush().await;
        info!("⏳ {} relays settled after replay", settled);

        if summary.events_skipped > 0 {
            error!(
                "❌ {} of {} replay lines could not be decoded",
                summary.events_skipped,
                summary.events_replayed + summary.events_skipped
            );
        }
        Ok(())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
