//! # Lifecycle Events and Handlers
//!
//! This module defines the agent-contact lifecycle events emitted by the
//! desktop runtime, the handler abstraction used to react to them, and the
//! error type shared by the whole bridge.
//!
//! ## Event Kinds
//!
//! The runtime emits a closed set of notifications. Each one is represented by
//! a [`LifecycleEventKind`] variant that carries its wire name (for example
//! `eAgentOfferContact`). Names outside the set are rejected at parse time and
//! never reach the relay.
//!
//! ## Payloads
//!
//! Payloads are owned by the runtime and treated as opaque JSON. The bridge
//! never inspects them beyond forwarding and serializing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::future::Future;
use std::str::FromStr;

use crate::crm::TransportError;

// ============================================================================
// Event Kinds
// ============================================================================

/// Every agent-contact notification the runtime can deliver.
///
/// Serialized using the runtime's own wire names (see [`as_str`]) so that
/// event files and logs line up with what the desktop emits.
///
/// [`as_str`]: LifecycleEventKind::as_str
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum LifecycleEventKind {
    AgentContact,
    ContactAssigned,
    ContactEnded,
    ContactWrappedUp,
    OfferContact,
    OfferContactRona,
    OfferConsult,
    Wrapup,
    ContactHeld,
    ContactUnheld,
    CallRecordingStarted,
    ConsultCreated,
    ConsultConferenced,
    ConsultEnded,
    CtqCancelled,
    Consulting,
    ConsultFailed,
    ConsultEndFailed,
    CtqFailed,
    CtqCancelFailed,
    ConsultConferenceEndFailed,
}

impl LifecycleEventKind {
    /// All kinds, in the order listeners are attached.
    pub const ALL: [LifecycleEventKind; 21] = [
        Self::AgentContact,
        Self::ContactAssigned,
        Self::ContactEnded,
        Self::ContactWrappedUp,
        Self::OfferContact,
        Self::OfferContactRona,
        Self::OfferConsult,
        Self::Wrapup,
        Self::ContactHeld,
        Self::ContactUnheld,
        Self::CallRecordingStarted,
        Self::ConsultCreated,
        Self::ConsultConferenced,
        Self::ConsultEnded,
        Self::CtqCancelled,
        Self::Consulting,
        Self::ConsultFailed,
        Self::ConsultEndFailed,
        Self::CtqFailed,
        Self::CtqCancelFailed,
        Self::ConsultConferenceEndFailed,
    ];

    /// Returns the runtime's wire name for this event.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AgentContact => "eAgentContact",
            Self::ContactAssigned => "eAgentContactAssigned",
            Self::ContactEnded => "eAgentContactEnded",
            Self::ContactWrappedUp => "eAgentContactWrappedUp",
            Self::OfferContact => "eAgentOfferContact",
            Self::OfferContactRona => "eAgentOfferContactRona",
            Self::OfferConsult => "eAgentOfferConsult",
            Self::Wrapup => "eAgentWrapup",
            Self::ContactHeld => "eAgentContactHeld",
            Self::ContactUnheld => "eAgentContactUnHeld",
            Self::CallRecordingStarted => "eCallRecordingStarted",
            Self::ConsultCreated => "eAgentConsultCreated",
            Self::ConsultConferenced => "eAgentConsultConferenced",
            Self::ConsultEnded => "eAgentConsultEnded",
            Self::CtqCancelled => "eAgentCtqCancelled",
            Self::Consulting => "eAgentConsulting",
            Self::ConsultFailed => "eAgentConsultFailed",
            Self::ConsultEndFailed => "eAgentConsultEndFailed",
            Self::CtqFailed => "eAgentCtqFailed",
            Self::CtqCancelFailed => "eAgentCtqCancelFailed",
            Self::ConsultConferenceEndFailed => "eAgentConsultConferenceEndFailed",
        }
    }
}

impl fmt::Display for LifecycleEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleEventKind {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| BridgeError::UnknownEvent(s.to_string()))
    }
}

impl TryFrom<String> for LifecycleEventKind {
    type Error = BridgeError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl From<LifecycleEventKind> for &'static str {
    fn from(kind: LifecycleEventKind) -> Self {
        kind.as_str()
    }
}

// ============================================================================
// Lifecycle Event
// ============================================================================

/// A notification delivered by the runtime.
///
/// The payload is whatever the runtime attached to the notification. It is
/// read-only to the bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    /// Which notification this is
    #[serde(rename = "name")]
    pub kind: LifecycleEventKind,
    /// Opaque runtime data
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl LifecycleEvent {
    /// Creates a new lifecycle event.
    pub fn new(kind: LifecycleEventKind, payload: serde_json::Value) -> Self {
        Self { kind, payload }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Handler trait for reacting to lifecycle events.
///
/// Handlers are attached per event kind on an
/// [`AgentContactRuntime`](crate::system::AgentContactRuntime). Errors returned
/// from `handle` are logged by the dispatcher and do not stop delivery of
/// later events.
#[async_trait]
pub trait LifecycleHandler: Send + Sync + Debug + 'static {
    /// Handles a single event.
    async fn handle(&self, event: LifecycleEvent) -> Result<(), BridgeError>;

    /// Returns a human-readable name for this handler for debugging.
    fn handler_name(&self) -> &str;
}

/// Adapts an async closure into a [`LifecycleHandler`].
///
/// # Examples
///
/// ```rust
/// use cti_event_system::{BridgeError, FnLifecycleHandler, LifecycleEvent};
///
/// let handler = FnLifecycleHandler::new("print", |event: LifecycleEvent| async move {
///     println!("{}", event.kind);
///     Ok::<(), BridgeError>(())
/// });
/// ```
pub struct FnLifecycleHandler<F> {
    name: String,
    handler: F,
}

impl<F> FnLifecycleHandler<F> {
    pub fn new(name: impl Into<String>, handler: F) -> Self {
        Self {
            name: name.into(),
            handler,
        }
    }
}

impl<F> Debug for FnLifecycleHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnLifecycleHandler")
            .field("name", &self.name)
            .finish()
    }
}

#[async_trait]
impl<F, Fut> LifecycleHandler for FnLifecycleHandler<F>
where
    F: Fn(LifecycleEvent) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), BridgeError>> + Send + 'static,
{
    async fn handle(&self, event: LifecycleEvent) -> Result<(), BridgeError> {
        (self.handler)(event).await
    }

    fn handler_name(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur inside the bridge.
///
/// None of these are fatal to the process. The relay logs them and carries on
/// with the next event.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// A payload could not be serialized for the remote call
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The CRM transport rejected or failed a call
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    /// `register_all` was called on a registry that already holds listeners
    #[error("Listeners are already registered; tear down before registering again")]
    AlreadyRegistered,
    /// An event name outside the known set
    #[error("Unknown lifecycle event: {0}")]
    UnknownEvent(String),
    /// A handler failed while processing an event
    #[error("Handler execution error: {0}")]
    HandlerExecution(String),
}
