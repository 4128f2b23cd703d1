//! Recording CRM double shared by the unit tests.

use crate::crm::{CrmBridge, MessageListener, RemoteResult, ScreenPopRequest, TransportError};
use crate::relay::{OutboundMessage, RemoteInvocation};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Recorded {
    published: Vec<(String, OutboundMessage)>,
    invocations: Vec<RemoteInvocation>,
    screen_pops: Vec<ScreenPopRequest>,
    subscriptions: Vec<String>,
    listeners: Vec<MessageListener>,
}

/// CRM bridge that records every call and answers with a fixed result.
pub(crate) struct MockCrm {
    answer: Result<RemoteResult, TransportError>,
    stall_remote: bool,
    recorded: Arc<Mutex<Recorded>>,
}

impl std::fmt::Debug for MockCrm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockCrm").field("answer", &self.answer).finish()
    }
}

impl MockCrm {
    /// Every call succeeds at the transport level and returns `result`.
    pub(crate) fn answering(result: RemoteResult) -> Self {
        Self {
            answer: Ok(result),
            stall_remote: false,
            recorded: Arc::new(Mutex::new(Recorded::default())),
        }
    }

    /// Like [`MockCrm::answering`], except remote calls never complete.
    pub(crate) fn stalling(result: RemoteResult) -> Self {
        Self {
            stall_remote: true,
            ..Self::answering(result)
        }
    }

    /// Every call fails at the transport level with `error`.
    pub(crate) fn failing(error: TransportError) -> Self {
        Self {
            answer: Err(error),
            stall_remote: false,
            recorded: Arc::new(Mutex::new(Recorded::default())),
        }
    }

    pub(crate) fn published(&self) -> Vec<(String, OutboundMessage)> {
        self.recorded.lock().unwrap().published.clone()
    }

    pub(crate) fn invocations(&self) -> Vec<RemoteInvocation> {
        self.recorded.lock().unwrap().invocations.clone()
    }

    pub(crate) fn screen_pops(&self) -> Vec<ScreenPopRequest> {
        self.recorded.lock().unwrap().screen_pops.clone()
    }

    pub(crate) fn subscriptions(&self) -> Vec<String> {
        self.recorded.lock().unwrap().subscriptions.clone()
    }

    /// Pushes an inbound channel message to every subscribed listener.
    pub(crate) fn deliver(&self, message: serde_json::Value) {
        let listeners = self.recorded.lock().unwrap().listeners.clone();
        for listener in listeners {
            listener(message.clone());
        }
    }
}

#[async_trait]
impl CrmBridge for MockCrm {
    async fn publish(&self, channel: &str, message: &OutboundMessage) -> Result<RemoteResult, TransportError> {
        self.recorded
            .lock()
            .unwrap()
            .published
            .push((channel.to_string(), message.clone()));
        self.answer.clone()
    }

    async fn subscribe(&self, channel: &str, listener: MessageListener) -> Result<RemoteResult, TransportError> {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.subscriptions.push(channel.to_string());
        recorded.listeners.push(listener);
        self.answer.clone()
    }

    async fn run_apex(&self, invocation: &RemoteInvocation) -> Result<RemoteResult, TransportError> {
        self.recorded.lock().unwrap().invocations.push(invocation.clone());
        if self.stall_remote {
            futures::future::pending::<()>().await;
        }
        self.answer.clone()
    }

    async fn screen_pop(&self, request: &ScreenPopRequest) -> Result<(), TransportError> {
        self.recorded.lock().unwrap().screen_pops.push(request.clone());
        self.answer.clone().map(|_| ())
    }
}
