//! Remote procedure invocation for forwarded events.

use crate::config::BridgeConfig;
use crate::crm::{CrmBridge, RemoteResult};
use crate::events::BridgeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a payload is turned into the text sent to the remote procedure.
///
/// `AlwaysEncode` JSON-encodes every payload, so a payload that is already
/// text arrives double-encoded (`"\"...\""`). Handlers deployed against the
/// widget expect that, so it stays the default. `PassThroughText` sends text
/// payloads unchanged and encodes everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadEncoding {
    #[default]
    AlwaysEncode,
    PassThroughText,
}

/// Parameters for one remote procedure call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteInvocation {
    pub apex_class: String,
    pub method_name: String,
    /// `<param>=<serialized payload>`
    pub method_params: String,
    #[serde(skip)]
    serialized_payload: String,
}

impl RemoteInvocation {
    /// The payload text embedded in `method_params`.
    pub fn serialized_payload(&self) -> &str {
        &self.serialized_payload
    }
}

/// Prepares and dispatches [`RemoteInvocation`]s.
///
/// The procedure and method are fixed by configuration; only the payload
/// changes between calls.
#[derive(Debug, Clone)]
pub struct InvocationAdapter {
    apex_class: String,
    method_name: String,
    param_name: String,
    encoding: PayloadEncoding,
}

impl InvocationAdapter {
    pub fn new(
        apex_class: impl Into<String>,
        method_name: impl Into<String>,
        param_name: impl Into<String>,
        encoding: PayloadEncoding,
    ) -> Self {
        Self {
            apex_class: apex_class.into(),
            method_name: method_name.into(),
            param_name: param_name.into(),
            encoding,
        }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(
            config.apex_class.clone(),
            config.method_name.clone(),
            config.param_name.clone(),
            config.payload_encoding,
        )
    }

    pub fn encoding(&self) -> PayloadEncoding {
        self.encoding
    }

    /// Builds the invocation for `payload`.
    pub fn prepare(&self, payload: &Value) -> Result<RemoteInvocation, BridgeError> {
        let serialized_payload = match (self.encoding, payload) {
            (PayloadEncoding::PassThroughText, Value::String(text)) => text.clone(),
            _ => serde_json::to_string(payload)?,
        };

        Ok(RemoteInvocation {
            apex_class: self.apex_class.clone(),
            method_name: self.method_name.clone(),
            method_params: format!("{}={}", self.param_name, serialized_payload),
            serialized_payload,
        })
    }

    /// Prepares the invocation and hands it to the CRM transport.
    ///
    /// Resolves once the remote procedure answers; the caller routes the
    /// result.
    pub async fn dispatch(&self, crm: &dyn CrmBridge, payload: &Value) -> Result<RemoteResult, BridgeError> {
        let invocation = self.prepare(payload)?;
        let result = crm.run_apex(&invocation).await?;
        Ok(result)
    }
}

impl Default for InvocationAdapter {
    fn default() -> Self {
        Self::from_config(&BridgeConfig::default())
    }
}
