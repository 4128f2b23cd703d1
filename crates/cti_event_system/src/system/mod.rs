/// Agent-contact event bus - the runtime's listener surface
mod core;
mod emitters;
mod handlers;
mod management;
mod stats;

pub use self::core::ContactEventBus;
pub use stats::ContactEventBusStats;

use crate::events::{LifecycleEventKind, LifecycleHandler};
use async_trait::async_trait;
use std::sync::Arc;

/// The listener surface of the desktop runtime.
///
/// The real runtime lives outside this crate. [`ContactEventBus`] is the
/// in-process implementation used by the application and by tests.
#[async_trait]
pub trait AgentContactRuntime: Send + Sync {
    /// Attaches `handler` to every future event of `kind`.
    async fn add_event_listener(&self, kind: LifecycleEventKind, handler: Arc<dyn LifecycleHandler>);

    /// Detaches every listener. Returns how many were removed.
    async fn remove_all_event_listeners(&self) -> usize;
}
