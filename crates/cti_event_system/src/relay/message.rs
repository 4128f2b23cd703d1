//! Outbound CRM message construction.

use crate::config::BridgeConfig;
use crate::utils::local_time_string;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tag carried by every message this bridge publishes.
pub const INBOUND_KIND: &str = "INBOUND";

/// Envelope published on the CRM message channel.
///
/// Built fresh for each forwarded event and dropped once handed to the
/// transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Fixed string identifying this bridge
    pub from: String,
    /// Always [`INBOUND_KIND`]
    #[serde(rename = "type")]
    pub kind: String,
    /// The event payload, or the placeholder when there is none
    pub payload: Value,
    /// Local wall-clock time at construction
    pub time: String,
}

/// Builds [`OutboundMessage`]s.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    origin: String,
    placeholder: Value,
}

impl MessageBuilder {
    pub fn new(origin: impl Into<String>, placeholder: Value) -> Self {
        Self {
            origin: origin.into(),
            placeholder,
        }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(config.origin.clone(), Value::String(config.placeholder_payload.clone()))
    }

    /// Builds a message around `payload`.
    ///
    /// A missing or JSON `null` payload is replaced by the placeholder. This is
    /// what the connectivity self-test publishes.
    pub fn build(&self, payload: Option<&Value>) -> OutboundMessage {
        let payload = match payload {
            Some(value) if !value.is_null() => value.clone(),
            _ => self.placeholder.clone(),
        };

        OutboundMessage {
            from: self.origin.clone(),
            kind: INBOUND_KIND.to_string(),
            payload,
            time: local_time_string(),
        }
    }
}

impl Default for MessageBuilder {
    fn default() -> Self {
        Self::from_config(&BridgeConfig::default())
    }
}
