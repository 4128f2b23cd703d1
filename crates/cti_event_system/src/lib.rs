//! # CTI Event System
//!
//! Relays agent-contact lifecycle events from the contact-center desktop
//! runtime to a CRM messaging channel, and turns the CRM's answers into
//! screen-pops for the agent.
//!
//! ## Architecture Overview
//!
//! - **Events** (`events`): the closed set of lifecycle notifications and the
//!   handler trait listeners implement
//! - **Runtime surface** (`system`): the listener API consumed from the desktop
//!   runtime, plus [`ContactEventBus`], an in-process implementation
//! - **CRM surface** (`crm`): publish/subscribe, remote procedure calls and
//!   screen-pops consumed from the CRM bridge
//! - **Relay** (`relay`): classification, message building, remote invocation,
//!   response routing and the subscription registry, tied together by
//!   [`EventBridge`]
//!
//! ## Quick Start Example
//!
//! ```rust,no_run
//! use cti_event_system::*;
//! use std::sync::Arc;
//!
//! async fn run(crm: Arc<dyn CrmBridge>) -> Result<(), BridgeError> {
//!     let logger = Arc::new(BridgeLogger::new("sdk-widget-logger"));
//!     let bus = ContactEventBus::new();
//!     let bridge = Arc::new(EventBridge::new(&BridgeConfig::default(), crm, logger)?);
//!
//!     bridge.connect(&bus).await?;
//!     bus.emit(LifecycleEvent::new(
//!         LifecycleEventKind::OfferContact,
//!         serde_json::json!({ "interactionId": "abc" }),
//!     ))
//!     .await;
//!     bridge.disconnect(&bus).await;
//!     Ok(())
//! }
//! ```

// tests
#[cfg(test)]
mod test_integration;

#[cfg(test)]
mod testing;

// Core modules
pub mod config;
pub mod context;
pub mod crm;
pub mod events;
pub mod relay;
pub mod system;
pub mod utils;

pub use config::{BridgeConfig, ForwardingSettings};
pub use context::{BridgeLogger, LogLevel};
pub use crm::{CrmBridge, MessageListener, RemoteResult, ScreenPopRequest, ScreenPopType, TransportError};
pub use events::{BridgeError, FnLifecycleHandler, LifecycleEvent, LifecycleEventKind, LifecycleHandler};
pub use relay::{
    Classification, EventBridge, EventClassifier, EventPolicy, ForwardOutcome, ForwardingMode, ForwardingPolicy,
    InvocationAdapter, MessageBuilder, OutboundMessage, PayloadEncoding, RegistryState, RemoteInvocation,
    ResponseRouter, RoutingDecision, SubscriptionRegistry, Unrouted,
};
pub use system::{AgentContactRuntime, ContactEventBus, ContactEventBusStats};
pub use utils::local_time_string;

// External dependencies that hosts commonly need
pub use async_trait::async_trait;
