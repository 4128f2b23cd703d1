/// Core ContactEventBus implementation
use crate::events::{LifecycleEventKind, LifecycleHandler};
use super::stats::ContactEventBusStats;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-process dispatcher for agent-contact lifecycle events.
///
/// Listeners are keyed by [`LifecycleEventKind`]. Emitting an event runs every
/// listener for that kind; a failing listener is logged and never prevents
/// the others, or later events, from being delivered.
pub struct ContactEventBus {
    /// Map of event kinds to their attached listeners
    pub(super) handlers: DashMap<LifecycleEventKind, Vec<Arc<dyn LifecycleHandler>>>,
    /// Bus statistics for monitoring
    pub(super) stats: RwLock<ContactEventBusStats>,
}

impl std::fmt::Debug for ContactEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactEventBus")
            .field("kinds", &self.handlers.len())
            .field("stats", &"[stats]")
            .finish()
    }
}

impl ContactEventBus {
    /// Creates a new bus with no attached listeners.
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
            stats: RwLock::new(ContactEventBusStats::default()),
        }
    }

    /// Gets the current bus statistics
    #[inline]
    pub async fn get_stats(&self) -> ContactEventBusStats {
        self.stats.read().await.clone()
    }
}

impl Default for ContactEventBus {
    fn default() -> Self {
        Self::new()
    }
}
