//! Offline stand-in for the CRM messaging layer.
//!
//! `DryRunCrm` logs every call it receives instead of talking to a CRM.
//! Published messages are looped back to channel subscribers, and remote
//! procedure calls answer with the text configured in `[dry_run]`.

use crate::config::DryRunSettings;
use async_trait::async_trait;
use cti_event_system::relay::{OutboundMessage, RemoteInvocation, RESULT_FIELD};
use cti_event_system::{CrmBridge, MessageListener, RemoteResult, ScreenPopRequest, TransportError};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Call counters for the dry-run CRM.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct DryRunStats {
    pub messages_published: u64,
    pub remote_calls: u64,
    pub screen_pops: u64,
    pub subscriptions: u64,
}

/// CRM bridge that logs instead of calling out.
pub struct DryRunCrm {
    apex_return: Option<String>,
    listeners: Mutex<HashMap<String, Vec<MessageListener>>>,
    screen_pops: Mutex<Vec<ScreenPopRequest>>,
    stats: Mutex<DryRunStats>,
}

impl std::fmt::Debug for DryRunCrm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DryRunCrm")
            .field("apex_return", &self.apex_return)
            .finish_non_exhaustive()
    }
}

impl DryRunCrm {
    pub fn new(settings: &DryRunSettings) -> Self {
        Self {
            apex_return: settings.apex_return.clone(),
            listeners: Mutex::new(HashMap::new()),
            screen_pops: Mutex::new(Vec::new()),
            stats: Mutex::new(DryRunStats::default()),
        }
    }

    pub async fn get_stats(&self) -> DryRunStats {
        self.stats.lock().await.clone()
    }

    /// Screen-pops requested so far, oldest first.
    pub async fn screen_pops(&self) -> Vec<ScreenPopRequest> {
        self.screen_pops.lock().await.clone()
    }

    fn apex_answer(&self) -> RemoteResult {
        match &self.apex_return {
            Some(text) => RemoteResult::ok(json!({ RESULT_FIELD: text })),
            None => RemoteResult::failed(json!([
                { "message": "dry run: no remote procedure result configured" }
            ])),
        }
    }
}

#[async_trait]
impl CrmBridge for DryRunCrm {
    async fn publish(&self, channel: &str, message: &OutboundMessage) -> Result<RemoteResult, TransportError> {
        let value = serde_json::to_value(message).map_err(|e| TransportError::Rejected(e.to_string()))?;
        info!("📤 [dry-run] publish on {}: {}", channel, value);

        let listeners = self.listeners.lock().await.get(channel).cloned().unwrap_or_default();
        for listener in &listeners {
            listener(value.clone());
        }

        self.stats.lock().await.messages_published += 1;
        Ok(RemoteResult::ok(Value::Null))
    }

    async fn subscribe(&self, channel: &str, listener: MessageListener) -> Result<RemoteResult, TransportError> {
        info!("📥 [dry-run] subscribe to {}", channel);
        self.listeners
            .lock()
            .await
            .entry(channel.to_string())
            .or_default()
            .push(listener);

        self.stats.lock().await.subscriptions += 1;
        Ok(RemoteResult::ok(json!({ "subscribed": channel })))
    }

    async fn run_apex(&self, invocation: &RemoteInvocation) -> Result<RemoteResult, TransportError> {
        info!(
            "⚙️ [dry-run] run {}.{}({})",
            invocation.apex_class, invocation.method_name, invocation.method_params
        );

        let answer = self.apex_answer();
        debug!("[dry-run] remote procedure answered: {:?}", answer);

        self.stats.lock().await.remote_calls += 1;
        Ok(answer)
    }

    async fn screen_pop(&self, request: &ScreenPopRequest) -> Result<(), TransportError> {
        info!("🪟 [dry-run] screen pop {:?}: {}", request.kind, request.params);
        self.screen_pops.lock().await.push(request.clone());
        self.stats.lock().await.screen_pops += 1;
        Ok(())
    }
}
