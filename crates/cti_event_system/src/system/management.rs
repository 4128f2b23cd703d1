/// Bus management and inspection methods
use crate::events::LifecycleEventKind;
use super::core::ContactEventBus;

impl ContactEventBus {
    /// Detaches every listener and returns how many were removed.
    pub async fn clear(&self) -> usize {
        let removed: usize = self.handlers.iter().map(|entry| entry.value().len()).sum();
        self.handlers.clear();

        let mut stats = self.stats.write().await;
        stats.total_handlers = stats.total_handlers.saturating_sub(removed);

        removed
    }

    /// Gets every kind that currently has at least one listener.
    pub fn registered_kinds(&self) -> Vec<LifecycleEventKind> {
        let mut kinds: Vec<LifecycleEventKind> = self
            .handlers
            .iter()
            .filter(|entry| !entry.value().is_empty())
            .map(|entry| *entry.key())
            .collect();
        kinds.sort();
        kinds
    }

    /// Checks if listeners are attached for `kind`
    #[inline]
    pub fn has_handlers(&self, kind: LifecycleEventKind) -> bool {
        self.handler_count(kind) > 0
    }

    /// Gets the number of listeners attached for `kind`
    #[inline]
    pub fn handler_count(&self, kind: LifecycleEventKind) -> usize {
        self.handlers.get(&kind).map(|entry| entry.value().len()).unwrap_or(0)
    }

    /// Gets the total number of attached listeners
    pub fn total_handlers(&self) -> usize {
        self.handlers.iter().map(|entry| entry.value().len()).sum()
    }
}
