//! # CRM Bridge Interface
//!
//! The CRM messaging layer (publish/subscribe, remote procedure calls and
//! screen-pops) is an external collaborator. This module defines the surface
//! the relay consumes from it and the shapes exchanged across that surface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;

use crate::relay::{OutboundMessage, RemoteInvocation};

/// Listener invoked for each message received on a subscribed channel.
pub type MessageListener = Arc<dyn Fn(serde_json::Value) + Send + Sync>;

/// Result delivered to every CRM callback.
///
/// The CRM answers publish, subscribe and remote calls with the same shape: a
/// success flag plus either a return value or an error payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

impl RemoteResult {
    /// A successful result carrying `return_value`.
    pub fn ok(return_value: serde_json::Value) -> Self {
        Self {
            success: true,
            return_value: Some(return_value),
            errors: None,
        }
    }

    /// A failed result carrying `errors`.
    pub fn failed(errors: serde_json::Value) -> Self {
        Self {
            success: false,
            return_value: None,
            errors: Some(errors),
        }
    }
}

/// Screen-pop targets supported by the CRM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenPopType {
    #[serde(rename = "SOBJECT")]
    SObject,
    #[serde(rename = "URL")]
    Url,
}

/// A screen-pop request as handed to the CRM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenPopRequest {
    #[serde(rename = "type")]
    pub kind: ScreenPopType,
    pub params: serde_json::Value,
}

impl ScreenPopRequest {
    /// Pops the record with the given id.
    pub fn record(record_id: &str) -> Self {
        Self {
            kind: ScreenPopType::SObject,
            params: serde_json::json!({ "recordId": record_id }),
        }
    }

    /// Pops the given in-app URL.
    pub fn url(url: &str) -> Self {
        Self {
            kind: ScreenPopType::Url,
            params: serde_json::json!({ "url": url }),
        }
    }
}

/// Failures raised by the CRM transport itself, as opposed to failed results.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("CRM rejected the call: {0}")]
    Rejected(String),
    #[error("CRM bridge unavailable: {0}")]
    Unavailable(String),
}

/// The CRM messaging surface consumed by the relay.
#[async_trait]
pub trait CrmBridge: Send + Sync + Debug {
    /// Publishes a message on a message channel.
    async fn publish(&self, channel: &str, message: &OutboundMessage) -> Result<RemoteResult, TransportError>;

    /// Subscribes `listener` to a message channel.
    async fn subscribe(&self, channel: &str, listener: MessageListener) -> Result<RemoteResult, TransportError>;

    /// Runs a server-side procedure.
    async fn run_apex(&self, invocation: &RemoteInvocation) -> Result<RemoteResult, TransportError>;

    /// Surfaces a record or URL to the agent.
    async fn screen_pop(&self, request: &ScreenPopRequest) -> Result<(), TransportError>;
}
