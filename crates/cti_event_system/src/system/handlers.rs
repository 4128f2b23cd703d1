/// Listener registration
use crate::events::{LifecycleEventKind, LifecycleHandler};
use super::core::ContactEventBus;
use super::AgentContactRuntime;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

impl ContactEventBus {
    /// Attaches a listener for one event kind.
    pub async fn on(&self, kind: LifecycleEventKind, handler: Arc<dyn LifecycleHandler>) {
        let handler_name = handler.handler_name().to_string();

        self.handlers.entry(kind).or_default().push(handler);

        let mut stats = self.stats.write().await;
        stats.total_handlers += 1;

        debug!("📝 Registered listener '{}' for {}", handler_name, kind);
    }
}

#[async_trait]
impl AgentContactRuntime for ContactEventBus {
    async fn add_event_listener(&self, kind: LifecycleEventKind, handler: Arc<dyn LifecycleHandler>) {
        self.on(kind, handler).await;
    }

    async fn remove_all_event_listeners(&self) -> usize {
        let removed = self.clear().await;
        if removed > 0 {
            info!("🗑️ Removed {} agent-contact listeners", removed);
        }
        removed
    }
}
