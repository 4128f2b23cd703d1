//! # Response Routing
//!
//! Decodes the result of the remote procedure into a [`RoutingDecision`] and
//! carries it out. The remote side answers with a JSON document nested as
//! text inside the result:
//!
//! ```text
//! { "success": true, "returnValue": { "runApex": "{\"type\":\"CaseId\",\"message\":\"...\",\"value\":\"500xx\"}" } }
//! ```
//!
//! `type` selects the follow-up UI action. Unknown types are not errors; they
//! are logged with full context so the mapping can be extended.

use crate::context::BridgeLogger;
use crate::crm::{CrmBridge, RemoteResult, ScreenPopRequest};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Field of `returnValue` holding the serialized routing document.
pub const RESULT_FIELD: &str = "runApex";
/// Routing type that pops a record.
pub const CASE_ID_TYPE: &str = "CaseId";
/// Routing type that pops a custom tab.
pub const CUSTOM_TAB_TYPE: &str = "CustomTab";
/// Prefix applied to custom tab names to form the in-app URL.
pub const CUSTOM_TAB_PREFIX: &str = "#/n/";

/// Follow-up action derived from one remote result.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutingDecision {
    /// Pop the record with this id
    ScreenPopRecord { record_id: String },
    /// Pop this in-app URL
    ScreenPopUrl { url: String },
    /// No UI action
    Unknown(Unrouted),
}

/// Why a result produced no UI action.
#[derive(Debug, Clone, PartialEq)]
pub enum Unrouted {
    /// The remote call reported failure
    RemoteCallFailed { errors: Value },
    /// The nested routing document could not be decoded
    Malformed { raw: String, reason: String },
    /// The document decoded but its type is not mapped
    UnrecognizedType { kind: String, message: String, value: String },
}

impl RoutingDecision {
    /// The screen-pop request this decision calls for, if any.
    pub fn screen_pop(&self) -> Option<ScreenPopRequest> {
        match self {
            RoutingDecision::ScreenPopRecord { record_id } => Some(ScreenPopRequest::record(record_id)),
            RoutingDecision::ScreenPopUrl { url } => Some(ScreenPopRequest::url(url)),
            RoutingDecision::Unknown(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RoutingDocument {
    #[serde(rename = "type", default)]
    kind: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
    #[serde(default)]
    value: Option<Value>,
}

fn text_of(value: &Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Turns remote results into UI actions.
#[derive(Debug, Clone)]
pub struct ResponseRouter {
    logger: Arc<BridgeLogger>,
}

impl ResponseRouter {
    pub fn new(logger: Arc<BridgeLogger>) -> Self {
        Self { logger }
    }

    /// Decodes `result` into a decision. Never panics; every failure degrades
    /// to [`RoutingDecision::Unknown`].
    pub fn route(&self, result: &RemoteResult) -> RoutingDecision {
        if !result.success {
            let errors = result.errors.clone().unwrap_or(Value::Null);
            self.logger.error(&format!("Remote call failed: {}", errors));
            return RoutingDecision::Unknown(Unrouted::RemoteCallFailed { errors });
        }

        let raw = match result.return_value.as_ref().and_then(|value| value.get(RESULT_FIELD)) {
            Some(Value::String(raw)) => raw.as_str(),
            Some(other) => {
                return self.malformed(other.to_string(), format!("'{}' is not a string", RESULT_FIELD));
            }
            None => {
                let raw = result.return_value.as_ref().map(Value::to_string).unwrap_or_default();
                return self.malformed(raw, format!("return value has no '{}' field", RESULT_FIELD));
            }
        };

        let document: RoutingDocument = match serde_json::from_str(raw) {
            Ok(document) => document,
            Err(e) => return self.malformed(raw.to_string(), e.to_string()),
        };

        let kind = text_of(&document.kind);
        let message = text_of(&document.message);
        let value = text_of(&document.value);

        match kind.as_str() {
            CASE_ID_TYPE => {
                self.logger
                    .info(&format!("POP CASE: Message: {} | Value: {}", message, value));
                RoutingDecision::ScreenPopRecord { record_id: value }
            }
            CUSTOM_TAB_TYPE => {
                self.logger
                    .info(&format!("POP TAB: Message: {} | Value: {}", message, value));
                RoutingDecision::ScreenPopUrl {
                    url: format!("{}{}", CUSTOM_TAB_PREFIX, value),
                }
            }
            _ => {
                self.logger.warn(&format!(
                    "Routing type not found: {} | Message: {} | Value: {}",
                    kind, message, value
                ));
                RoutingDecision::Unknown(Unrouted::UnrecognizedType { kind, message, value })
            }
        }
    }

    fn malformed(&self, raw: String, reason: String) -> RoutingDecision {
        self.logger
            .error(&format!("Malformed remote result ({}): {}", reason, raw));
        RoutingDecision::Unknown(Unrouted::Malformed { raw, reason })
    }

    /// Issues the screen-pop `decision` calls for.
    ///
    /// Returns whether a UI action was issued. Transport failures are logged
    /// and reported as `false`.
    pub async fn execute(&self, crm: &dyn CrmBridge, decision: &RoutingDecision) -> bool {
        let Some(request) = decision.screen_pop() else {
            return false;
        };

        match crm.screen_pop(&request).await {
            Ok(()) => true,
            Err(e) => {
                self.logger.error(&format!("Screen pop failed: {}", e));
                false
            }
        }
    }
}

impl Default for ResponseRouter {
    fn default() -> Self {
        Self::new(Arc::new(BridgeLogger::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn routed(document: Value) -> RemoteResult {
        RemoteResult::ok(json!({ RESULT_FIELD: document.to_string() }))
    }

    #[test]
    fn test_failure_carries_errors() {
        let errors = json!([{ "message": "Apex class not found" }]);
        let decision = ResponseRouter::default().route(&RemoteResult::failed(errors.clone()));

        assert_eq!(decision, RoutingDecision::Unknown(Unrouted::RemoteCallFailed { errors }));
        assert!(decision.screen_pop().is_none());
    }

    #[test]
    fn test_case_id_pops_record() {
        let decision = ResponseRouter::default().route(&routed(json!({ "type": "CaseId", "value": "001xx" })));

        assert_eq!(decision, RoutingDecision::ScreenPopRecord { record_id: "001xx".to_string() });
        assert_eq!(decision.screen_pop(), Some(ScreenPopRequest::record("001xx")));
    }

    #[test]
    fn test_custom_tab_pops_url() {
        let decision = ResponseRouter::default().route(&routed(json!({ "type": "CustomTab", "value": "home" })));

        assert_eq!(decision, RoutingDecision::ScreenPopUrl { url: "#/n/home".to_string() });
        assert_eq!(decision.screen_pop(), Some(ScreenPopRequest::url("#/n/home")));
    }

    #[test]
    fn test_unrecognized_type_is_reported_not_popped() {
        let decision = ResponseRouter::default()
            .route(&routed(json!({ "type": "Other", "message": "m", "value": "v" })));

        assert_eq!(
            decision,
            RoutingDecision::Unknown(Unrouted::UnrecognizedType {
                kind: "Other".to_string(),
                message: "m".to_string(),
                value: "v".to_string(),
            })
        );
        assert!(decision.screen_pop().is_none());
    }

    #[test]
    fn test_malformed_nested_result_keeps_raw_text() {
        let result = RemoteResult::ok(json!({ RESULT_FIELD: "{not json" }));
        let decision = ResponseRouter::default().route(&result);

        match decision {
            RoutingDecision::Unknown(Unrouted::Malformed { raw, .. }) => assert_eq!(raw, "{not json"),
            other => panic!("expected malformed decision, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_nested_field_is_malformed() {
        let decision = ResponseRouter::default().route(&RemoteResult::ok(json!({ "other": 1 })));
        assert!(matches!(decision, RoutingDecision::Unknown(Unrouted::Malformed { .. })));

        let decision = ResponseRouter::default().route(&RemoteResult {
            success: true,
            return_value: None,
            errors: None,
        });
        assert!(matches!(decision, RoutingDecision::Unknown(Unrouted::Malformed { .. })));
    }

    #[test]
    fn test_empty_value_still_pops() {
        let router = ResponseRouter::default();

        let decision = router.route(&routed(json!({ "type": "CaseId", "message": "m", "value": "" })));
        assert_eq!(decision, RoutingDecision::ScreenPopRecord { record_id: String::new() });

        let decision = router.route(&routed(json!({ "type": "CustomTab", "message": "m", "value": "" })));
        assert_eq!(decision, RoutingDecision::ScreenPopUrl { url: "#/n/".to_string() });
        assert_eq!(decision.screen_pop(), Some(ScreenPopRequest::url("#/n/")));
    }

    #[test]
    fn test_missing_value_pops_with_empty_id() {
        let decision = ResponseRouter::default().route(&routed(json!({ "type": "CaseId" })));
        assert_eq!(decision, RoutingDecision::ScreenPopRecord { record_id: String::new() });
    }

    #[test]
    fn test_missing_type_is_unrecognized() {
        let decision = ResponseRouter::default().route(&routed(json!({ "value": "v" })));
        assert!(matches!(
            decision,
            RoutingDecision::Unknown(Unrouted::UnrecognizedType { ref kind, .. }) if kind.is_empty()
        ));
    }

    #[test]
    fn test_numeric_value_is_rendered_as_text() {
        let decision = ResponseRouter::default().route(&routed(json!({ "type": "CaseId", "value": 42 })));
        assert_eq!(decision, RoutingDecision::ScreenPopRecord { record_id: "42".to_string() });
    }
}
