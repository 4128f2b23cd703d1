//! Subscription registry: owns the association between lifecycle events and
//! the relay's handlers on the runtime, with bulk teardown.

use crate::context::BridgeLogger;
use crate::events::{BridgeError, LifecycleEventKind, LifecycleHandler};
use crate::system::AgentContactRuntime;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Registration state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    Unregistered,
    Registered,
}

/// Tracks whether the relay's listeners are attached to a runtime.
///
/// `register_all` on a registered registry is rejected rather than merged;
/// tear down first to replace the handler set. State only changes at
/// connect and disconnect, never while events are being delivered.
#[derive(Debug)]
pub struct SubscriptionRegistry {
    state: Mutex<RegistryState>,
    logger: Arc<BridgeLogger>,
}

impl SubscriptionRegistry {
    pub fn new(logger: Arc<BridgeLogger>) -> Self {
        Self {
            state: Mutex::new(RegistryState::Unregistered),
            logger,
        }
    }

    pub async fn state(&self) -> RegistryState {
        *self.state.lock().await
    }

    /// Attaches every handler in `handlers` to `runtime`.
    ///
    /// Returns the number of listeners attached.
    pub async fn register_all(
        &self,
        runtime: &dyn AgentContactRuntime,
        handlers: BTreeMap<LifecycleEventKind, Arc<dyn LifecycleHandler>>,
    ) -> Result<usize, BridgeError> {
        let mut state = self.state.lock().await;
        if *state == RegistryState::Registered {
            self.logger
                .warn("Ignoring listener registration: listeners are already registered");
            return Err(BridgeError::AlreadyRegistered);
        }

        let count = handlers.len();
        for (kind, handler) in handlers {
            runtime.add_event_listener(kind, handler).await;
        }

        *state = RegistryState::Registered;
        self.logger
            .info(&format!("Registered {} agent-contact listeners", count));
        Ok(count)
    }

    /// Removes every listener from `runtime`.
    ///
    /// Safe to call any number of times, including before any registration.
    /// Returns the number of listeners the runtime reported removing.
    pub async fn teardown_all(&self, runtime: &dyn AgentContactRuntime) -> usize {
        let mut state = self.state.lock().await;
        let removed = runtime.remove_all_event_listeners().await;
        if *state == RegistryState::Registered {
            self.logger
                .info(&format!("Removed {} agent-contact listeners", removed));
        }
        *state = RegistryState::Unregistered;
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{FnLifecycleHandler, LifecycleEvent};
    use crate::system::ContactEventBus;

    fn noop_handlers() -> BTreeMap<LifecycleEventKind, Arc<dyn LifecycleHandler>> {
        LifecycleEventKind::ALL
            .into_iter()
            .map(|kind| {
                let handler: Arc<dyn LifecycleHandler> =
                    Arc::new(FnLifecycleHandler::new(kind.as_str(), |_event: LifecycleEvent| async move {
                        Ok::<(), BridgeError>(())
                    }));
                (kind, handler)
            })
            .collect()
    }

    #[tokio::test]
    async fn test_register_all_attaches_every_handler() {
        let bus = ContactEventBus::new();
        let registry = SubscriptionRegistry::new(Arc::new(BridgeLogger::default()));

        let count = registry.register_all(&bus, noop_handlers()).await.unwrap();

        assert_eq!(count, LifecycleEventKind::ALL.len());
        assert_eq!(registry.state().await, RegistryState::Registered);
        assert_eq!(bus.registered_kinds(), LifecycleEventKind::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_second_registration_is_rejected() {
        let bus = ContactEventBus::new();
        let registry = SubscriptionRegistry::new(Arc::new(BridgeLogger::default()));
        registry.register_all(&bus, noop_handlers()).await.unwrap();

        let second = registry.register_all(&bus, noop_handlers()).await;

        assert!(matches!(second, Err(BridgeError::AlreadyRegistered)));
        assert_eq!(bus.total_handlers(), LifecycleEventKind::ALL.len());
    }

    #[tokio::test]
    async fn test_teardown_twice_leaves_no_listeners() {
        let bus = ContactEventBus::new();
        let registry = SubscriptionRegistry::new(Arc::new(BridgeLogger::default()));
        registry.register_all(&bus, noop_handlers()).await.unwrap();

        assert_eq!(registry.teardown_all(&bus).await, LifecycleEventKind::ALL.len());
        assert_eq!(registry.teardown_all(&bus).await, 0);
        assert_eq!(bus.total_handlers(), 0);
        assert_eq!(registry.state().await, RegistryState::Unregistered);
    }

    #[tokio::test]
    async fn test_teardown_without_registration_is_safe() {
        let bus = ContactEventBus::new();
        let registry = SubscriptionRegistry::new(Arc::new(BridgeLogger::default()));

        assert_eq!(registry.teardown_all(&bus).await, 0);
        assert_eq!(registry.state().await, RegistryState::Unregistered);
    }

    #[tokio::test]
    async fn test_register_after_teardown_succeeds() {
        let bus = ContactEventBus::new();
        let registry = SubscriptionRegistry::new(Arc::new(BridgeLogger::default()));
        registry.register_all(&bus, noop_handlers()).await.unwrap();
        registry.teardown_all(&bus).await;

        let count = registry.register_all(&bus, noop_handlers()).await.unwrap();

        assert_eq!(count, LifecycleEventKind::ALL.len());
        assert_eq!(bus.total_handlers(), LifecycleEventKind::ALL.len());
    }
}
