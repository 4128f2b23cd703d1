//! Event relay and response routing.
//!
//! Lifecycle events flow classifier → message builder → CRM publish, and in
//! parallel → invocation adapter → remote call → response router → UI action.

mod bridge;
mod classifier;
mod invocation;
mod message;
mod policy;
mod registry;
mod router;

pub use bridge::{EventBridge, ForwardOutcome};
pub use classifier::{Classification, EventClassifier};
pub use invocation::{InvocationAdapter, PayloadEncoding, RemoteInvocation};
pub use message::{MessageBuilder, OutboundMessage, INBOUND_KIND};
pub use policy::{EventPolicy, ForwardingMode, ForwardingPolicy};
pub use registry::{RegistryState, SubscriptionRegistry};
pub use router::{
    ResponseRouter, RoutingDecision, Unrouted, CASE_ID_TYPE, CUSTOM_TAB_PREFIX, CUSTOM_TAB_TYPE, RESULT_FIELD,
};
