//! # Event Bridge
//!
//! Ties the relay together. For every lifecycle event the runtime delivers:
//!
//! 1. log the event and classify it
//! 2. optionally convert the payload to JSON text
//! 3. build the outbound message and publish it on the CRM channel
//! 4. in parallel, send the payload to the remote procedure and route the
//!    answer into a screen-pop (or nothing)
//!
//! Publishing and the remote call are independent; neither waits for the
//! other. Each delivered event is relayed on its own task, so the runtime's
//! delivery call returns at once and a slow or hung CRM never holds up the
//! next event. Failures end in a log line.

use super::classifier::EventClassifier;
use super::invocation::InvocationAdapter;
use super::message::{MessageBuilder, OutboundMessage};
use super::registry::{RegistryState, SubscriptionRegistry};
use super::router::{ResponseRouter, RoutingDecision};
use crate::config::BridgeConfig;
use crate::context::BridgeLogger;
use crate::crm::{CrmBridge, MessageListener};
use crate::events::{BridgeError, LifecycleEvent, LifecycleEventKind, LifecycleHandler};
use crate::system::AgentContactRuntime;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::{JoinError, JoinSet};
use tracing::{info_span, Instrument};
use uuid::Uuid;

/// What happened to one delivered event.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardOutcome {
    pub kind: LifecycleEventKind,
    /// Whether the classifier let the event through
    pub forwarded: bool,
    /// Whether the CRM accepted the published message
    pub published: bool,
    /// Routing decision, present only when the remote call returned
    pub decision: Option<RoutingDecision>,
    /// Whether a screen-pop was issued
    pub screen_popped: bool,
}

impl ForwardOutcome {
    fn skipped(kind: LifecycleEventKind) -> Self {
        Self {
            kind,
            forwarded: false,
            published: false,
            decision: None,
            screen_popped: false,
        }
    }
}

/// Relays runtime lifecycle events to the CRM and acts on its answers.
#[derive(Debug)]
pub struct EventBridge {
    channel: String,
    classifier: EventClassifier,
    messages: MessageBuilder,
    invocations: InvocationAdapter,
    router: ResponseRouter,
    registry: SubscriptionRegistry,
    crm: Arc<dyn CrmBridge>,
    logger: Arc<BridgeLogger>,
    in_flight: Mutex<JoinSet<()>>,
}

impl EventBridge {
    /// Builds a bridge from configuration.
    ///
    /// Fails only when the configured forwarding overrides name an unknown
    /// event.
    pub fn new(
        config: &BridgeConfig,
        crm: Arc<dyn CrmBridge>,
        logger: Arc<BridgeLogger>,
    ) -> Result<Self, BridgeError> {
        let policy = config.forwarding_policy()?;
        Ok(Self {
            channel: config.channel_name.clone(),
            classifier: EventClassifier::new(policy),
            messages: MessageBuilder::from_config(config),
            invocations: InvocationAdapter::from_config(config),
            router: ResponseRouter::new(logger.clone()),
            registry: SubscriptionRegistry::new(logger.clone()),
            crm,
            logger,
            in_flight: Mutex::new(JoinSet::new()),
        })
    }

    pub async fn registry_state(&self) -> RegistryState {
        self.registry.state().await
    }

    /// Attaches one relay listener per lifecycle event kind to `runtime`.
    pub async fn connect(self: &Arc<Self>, runtime: &dyn AgentContactRuntime) -> Result<usize, BridgeError> {
        let handlers: BTreeMap<LifecycleEventKind, Arc<dyn LifecycleHandler>> = LifecycleEventKind::ALL
            .into_iter()
            .map(|kind| {
                let handler: Arc<dyn LifecycleHandler> = Arc::new(RelayHandler {
                    name: format!("relay::{}", kind),
                    bridge: self.clone(),
                });
                (kind, handler)
            })
            .collect();

        self.registry.register_all(runtime, handlers).await
    }

    /// Detaches every listener from `runtime`.
    pub async fn disconnect(&self, runtime: &dyn AgentContactRuntime) -> usize {
        self.registry.teardown_all(runtime).await
    }

    /// Starts relaying `event` on its own task and returns without waiting
    /// for the CRM.
    pub async fn dispatch(self: &Arc<Self>, event: LifecycleEvent) {
        let bridge = self.clone();
        let mut tasks = self.in_flight.lock().await;
        while let Some(finished) = tasks.try_join_next() {
            self.report(finished);
        }
        tasks.spawn(async move {
            bridge.forward(event).await;
        });
    }

    /// Waits for every dispatched event to finish relaying.
    ///
    /// Returns the number of relays awaited.
    pub async fn flush(&self) -> usize {
        let mut tasks = self.in_flight.lock().await;
        let mut settled = 0;
        while let Some(finished) = tasks.join_next().await {
            self.report(finished);
            settled += 1;
        }
        settled
    }

    fn report(&self, finished: Result<(), JoinError>) {
        if let Err(e) = finished {
            let error = BridgeError::HandlerExecution(e.to_string());
            self.logger.error(&format!("Relay task ended abnormally: {}", error));
        }
    }

    /// Relays one event and waits for the outcome.
    pub async fn forward(&self, event: LifecycleEvent) -> ForwardOutcome {
        let kind = event.kind;
        let span = info_span!("forward", lifecycle_event = %kind, dispatch_id = %Uuid::new_v4());

        async move {
            self.logger.info(&format!("Received {}", kind));

            let classification = self.classifier.classify(kind);
            if !classification.forward {
                self.logger
                    .debug(&format!("{} is not forwarded: {}", kind, event.payload));
                return ForwardOutcome::skipped(kind);
            }

            let payload = if classification.stringify_first && !event.payload.is_null() {
                Value::String(event.payload.to_string())
            } else {
                event.payload
            };

            let message = self.messages.build(Some(&payload));
            let (published, routed) = tokio::join!(self.publish(&message), self.call_remote(&payload));
            let (decision, screen_popped) = match routed {
                Some((decision, popped)) => (Some(decision), popped),
                None => (None, false),
            };

            ForwardOutcome {
                kind,
                forwarded: true,
                published,
                decision,
                screen_popped,
            }
        }
        .instrument(span)
        .await
    }

    /// Publishes the placeholder message to check the channel end to end.
    pub async fn publish_self_test(&self) -> bool {
        self.logger.info("Sending self-test message to the CRM channel");
        let message = self.messages.build(None);
        self.publish(&message).await
    }

    /// Subscribes to the CRM channel and logs every message received on it.
    pub async fn subscribe_inbound(&self) -> bool {
        let logger = self.logger.clone();
        let listener: MessageListener = Arc::new(move |message: Value| {
            logger.info(&format!("CRM message received: {}", message));
        });

        match self.crm.subscribe(&self.channel, listener).await {
            Ok(result) if result.success => {
                self.logger.info(&format!(
                    "Subscribed to {}: {}",
                    self.channel,
                    result.return_value.unwrap_or(Value::Null)
                ));
                true
            }
            Ok(result) => {
                self.logger.warn(&format!(
                    "Subscription to {} failed: {}",
                    self.channel,
                    result.errors.unwrap_or(Value::Null)
                ));
                false
            }
            Err(e) => {
                self.logger
                    .error(&format!("Subscription to {} failed: {}", self.channel, e));
                false
            }
        }
    }

    async fn publish(&self, message: &OutboundMessage) -> bool {
        match self.crm.publish(&self.channel, message).await {
            Ok(result) if result.success => {
                self.logger.debug(&format!(
                    "Published to {}: {}",
                    self.channel,
                    result.return_value.unwrap_or(Value::Null)
                ));
                true
            }
            Ok(result) => {
                self.logger.warn(&format!(
                    "Publish to {} was refused: {}",
                    self.channel,
                    result.errors.unwrap_or(Value::Null)
                ));
                false
            }
            Err(e) => {
                self.logger
                    .error(&format!("Publish to {} failed: {}", self.channel, e));
                false
            }
        }
    }

    async fn call_remote(&self, payload: &Value) -> Option<(RoutingDecision, bool)> {
        self.logger
            .debug(&format!("Sending payload to remote procedure: {}", payload));

        match self.invocations.dispatch(self.crm.as_ref(), payload).await {
            Ok(result) => {
                let decision = self.router.route(&result);
                let popped = self.router.execute(self.crm.as_ref(), &decision).await;
                Some((decision, popped))
            }
            Err(e) => {
                self.logger.error(&format!("Remote call failed: {}", e));
                None
            }
        }
    }
}

/// Runtime listener that hands every event to the bridge.
#[derive(Debug)]
struct RelayHandler {
    name: String,
    bridge: Arc<EventBridge>,
}

#[async_trait]
impl LifecycleHandler for RelayHandler {
    async fn handle(&self, event: LifecycleEvent) -> Result<(), BridgeError> {
        self.bridge.dispatch(event).await;
        Ok(())
    }

    fn handler_name(&self) -> &str {
        &self.name
    }
}
