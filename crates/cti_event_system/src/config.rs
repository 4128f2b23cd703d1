//! Bridge configuration.
//!
//! Every value has a fixed default matching the deployed widget; a host may
//! override them from its own configuration file.

use crate::events::{BridgeError, LifecycleEventKind};
use crate::relay::{EventPolicy, ForwardingMode, ForwardingPolicy, PayloadEncoding};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// CRM message channel the bridge publishes on.
pub const DEFAULT_CHANNEL: &str = "CallDetails__c";
/// `from` field of every outbound message.
pub const DEFAULT_ORIGIN: &str = "LightningMessageService_OpenCTI_TestPage";
/// Payload used when there is none (connectivity self-test).
pub const DEFAULT_PLACEHOLDER: &str = "test";
/// Server-side class handling forwarded events.
pub const DEFAULT_APEX_CLASS: &str = "callHandler";
/// Method invoked on [`DEFAULT_APEX_CLASS`].
pub const DEFAULT_METHOD_NAME: &str = "newEvent";
/// Parameter name the serialized payload is bound to.
pub const DEFAULT_PARAM_NAME: &str = "eventData";

fn default_channel() -> String { DEFAULT_CHANNEL.to_string() }
fn default_origin() -> String { DEFAULT_ORIGIN.to_string() }
fn default_placeholder() -> String { DEFAULT_PLACEHOLDER.to_string() }
fn default_apex_class() -> String { DEFAULT_APEX_CLASS.to_string() }
fn default_method_name() -> String { DEFAULT_METHOD_NAME.to_string() }
fn default_param_name() -> String { DEFAULT_PARAM_NAME.to_string() }

/// Settings recognised by the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// CRM message channel name
    #[serde(default = "default_channel")]
    pub channel_name: String,
    /// Origin string stamped on outbound messages
    #[serde(default = "default_origin")]
    pub origin: String,
    /// Placeholder payload for messages without one
    #[serde(default = "default_placeholder")]
    pub placeholder_payload: String,
    /// Remote procedure class
    #[serde(default = "default_apex_class")]
    pub apex_class: String,
    /// Remote procedure method
    #[serde(default = "default_method_name")]
    pub method_name: String,
    /// Parameter name for the serialized payload
    #[serde(default = "default_param_name")]
    pub param_name: String,
    /// How payloads are serialized for the remote procedure
    #[serde(default)]
    pub payload_encoding: PayloadEncoding,
    /// Which events are forwarded
    #[serde(default)]
    pub forwarding: ForwardingSettings,
}

/// Forwarding choice: a named mode plus per-event overrides keyed by the
/// runtime's event name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForwardingSettings {
    #[serde(default)]
    pub mode: ForwardingMode,
    #[serde(default)]
    pub overrides: BTreeMap<String, EventPolicy>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            channel_name: default_channel(),
            origin: default_origin(),
            placeholder_payload: default_placeholder(),
            apex_class: default_apex_class(),
            method_name: default_method_name(),
            param_name: default_param_name(),
            payload_encoding: PayloadEncoding::default(),
            forwarding: ForwardingSettings::default(),
        }
    }
}

impl BridgeConfig {
    /// Resolves the forwarding settings into a policy.
    pub fn forwarding_policy(&self) -> Result<ForwardingPolicy, BridgeError> {
        self.forwarding
            .overrides
            .iter()
            .try_fold(ForwardingPolicy::new(self.forwarding.mode), |policy, (name, rule)| {
                let kind: LifecycleEventKind = name.parse()?;
                Ok(policy.with_override(kind, *rule))
            })
    }

    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// `Ok(())` if the configuration is valid, or an error string describing the issue.
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("channel_name", &self.channel_name),
            ("origin", &self.origin),
            ("apex_class", &self.apex_class),
            ("method_name", &self.method_name),
            ("param_name", &self.param_name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(format!("bridge.{} cannot be empty", field));
            }
        }

        self.forwarding_policy().map_err(|e| format!("bridge.forwarding.overrides: {}", e))?;
        Ok(())
    }
}
