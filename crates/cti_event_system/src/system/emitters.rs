/// Event emission
use crate::events::LifecycleEvent;
use super::core::ContactEventBus;
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, error, warn};

impl ContactEventBus {
    /// Delivers `event` to every listener attached for its kind.
    ///
    /// Returns the number of listeners that ran. Listener failures are logged
    /// here and go no further.
    pub async fn emit(&self, event: LifecycleEvent) -> usize {
        let kind = event.kind;
        // Clone the list out so no map guard is held across awaits
        let event_handlers = self.handlers.get(&kind).map(|entry| entry.value().clone());

        let Some(event_handlers) = event_handlers.filter(|handlers| !handlers.is_empty()) else {
            warn!("⚠️ No listeners for event: {}", kind);
            let mut stats = self.stats.write().await;
            stats.events_emitted += 1;
            stats.events_without_handlers += 1;
            return 0;
        };

        if cfg!(debug_assertions) {
            debug!("📤 Emitting {} to {} listeners", kind, event_handlers.len());
        }

        let mut futures = FuturesUnordered::new();
        for handler in event_handlers.iter() {
            let handler = handler.clone();
            let event = event.clone();
            futures.push(async move {
                if let Err(e) = handler.handle(event).await {
                    error!("❌ Listener {} failed: {}", handler.handler_name(), e);
                }
            });
        }
        while futures.next().await.is_some() {}

        let mut stats = self.stats.write().await;
        stats.events_emitted += 1;

        event_handlers.len()
    }
}
