//! Per-event forwarding policy.
//!
//! Deployments differ in which lifecycle events reach the CRM and whether the
//! payload is converted to JSON text before it is forwarded. That choice is a
//! named [`ForwardingMode`] plus optional per-event overrides, never something
//! inferred from which widget build happens to be deployed.

use crate::events::LifecycleEventKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a single event kind is treated by the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPolicy {
    /// Whether the event is published and sent to the remote procedure
    pub forward: bool,
    /// Whether the payload is turned into JSON text before forwarding
    #[serde(default)]
    pub stringify_first: bool,
}

impl EventPolicy {
    pub const FORWARD_RAW: EventPolicy = EventPolicy { forward: true, stringify_first: false };
    pub const FORWARD_TEXT: EventPolicy = EventPolicy { forward: true, stringify_first: true };
    pub const LOG_ONLY: EventPolicy = EventPolicy { forward: false, stringify_first: false };
}

/// Named forwarding presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForwardingMode {
    /// Every lifecycle event is forwarded with its raw payload
    #[default]
    AllEvents,
    /// Only the contact offer is forwarded, as JSON text
    OfferOnly,
    /// Every event is subscribed and logged, none is forwarded
    LogOnly,
}

impl ForwardingMode {
    /// The policy this mode applies to `kind`.
    pub fn policy_for(&self, kind: LifecycleEventKind) -> EventPolicy {
        match self {
            ForwardingMode::AllEvents => EventPolicy::FORWARD_RAW,
            ForwardingMode::OfferOnly if kind == LifecycleEventKind::OfferContact => EventPolicy::FORWARD_TEXT,
            ForwardingMode::OfferOnly | ForwardingMode::LogOnly => EventPolicy::LOG_ONLY,
        }
    }
}

impl std::str::FromStr for ForwardingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" | "all_events" => Ok(ForwardingMode::AllEvents),
            "offer" | "offer_only" => Ok(ForwardingMode::OfferOnly),
            "log" | "log_only" => Ok(ForwardingMode::LogOnly),
            other => Err(format!("Unknown forwarding mode: {other}. Must be one of: all, offer, log")),
        }
    }
}

/// The full event-name to policy mapping used by the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardingPolicy {
    mode: ForwardingMode,
    overrides: BTreeMap<LifecycleEventKind, EventPolicy>,
}

impl ForwardingPolicy {
    pub fn new(mode: ForwardingMode) -> Self {
        Self {
            mode,
            overrides: BTreeMap::new(),
        }
    }

    /// Replaces the mode's policy for one event kind.
    pub fn with_override(mut self, kind: LifecycleEventKind, policy: EventPolicy) -> Self {
        self.overrides.insert(kind, policy);
        self
    }

    /// Looks up the effective policy for `kind`.
    pub fn get(&self, kind: LifecycleEventKind) -> EventPolicy {
        self.overrides
            .get(&kind)
            .copied()
            .unwrap_or_else(|| self.mode.policy_for(kind))
    }

    /// Kinds that will be forwarded under this policy.
    pub fn forwarded_kinds(&self) -> Vec<LifecycleEventKind> {
        LifecycleEventKind::ALL
            .into_iter()
            .filter(|kind| self.get(*kind).forward)
            .collect()
    }
}

impl Default for ForwardingPolicy {
    fn default() -> Self {
        Self::new(ForwardingMode::default())
    }
}
