use super::*;
use crate::relay::RESULT_FIELD;
use crate::testing::MockCrm;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

fn apex_answer(document: serde_json::Value) -> RemoteResult {
    RemoteResult::ok(json!({ RESULT_FIELD: document.to_string() }))
}

async fn connected(config: BridgeConfig, crm: Arc<MockCrm>) -> (Arc<EventBridge>, ContactEventBus) {
    let logger = Arc::new(BridgeLogger::default());
    let bridge = Arc::new(EventBridge::new(&config, crm, logger).unwrap());
    let bus = ContactEventBus::new();
    bridge.connect(&bus).await.unwrap();
    (bridge, bus)
}

#[tokio::test]
async fn test_every_event_kind_is_relayed_once() {
    let crm = Arc::new(MockCrm::answering(apex_answer(json!({ "type": "Noop" }))));
    let (bridge, bus) = connected(BridgeConfig::default(), crm.clone()).await;

    for kind in LifecycleEventKind::ALL {
        bus.emit(LifecycleEvent::new(kind, json!({ "event": kind.as_str() }))).await;
    }
    assert_eq!(bridge.flush().await, LifecycleEventKind::ALL.len());

    let published = crm.published();
    let invocations = crm.invocations();
    assert_eq!(published.len(), LifecycleEventKind::ALL.len());
    assert_eq!(invocations.len(), LifecycleEventKind::ALL.len());
    assert!(crm.screen_pops().is_empty());

    for (kind, (channel, message)) in LifecycleEventKind::ALL.iter().zip(published.iter()) {
        assert_eq!(channel, "CallDetails__c");
        assert_eq!(message.payload["event"], kind.as_str());
        assert_eq!(message.kind, "INBOUND");
    }
}

#[tokio::test]
async fn test_custom_tab_answer_pops_url() {
    let crm = Arc::new(MockCrm::answering(apex_answer(
        json!({ "type": "CustomTab", "message": "open tab", "value": "Agent_Home" }),
    )));
    let (bridge, bus) = connected(BridgeConfig::default(), crm.clone()).await;

    bus.emit(LifecycleEvent::new(LifecycleEventKind::OfferContact, json!({ "ani": "5551234" })))
        .await;
    bridge.flush().await;

    assert_eq!(crm.screen_pops(), vec![ScreenPopRequest::url("#/n/Agent_Home")]);
}

#[tokio::test]
async fn test_malformed_answer_does_not_stop_later_events() {
    let crm = Arc::new(MockCrm::answering(RemoteResult::ok(json!({ RESULT_FIELD: "{not json" }))));
    let (bridge, bus) = connected(BridgeConfig::default(), crm.clone()).await;

    bus.emit(LifecycleEvent::new(LifecycleEventKind::ContactHeld, json!({}))).await;
    bus.emit(LifecycleEvent::new(LifecycleEventKind::ContactUnheld, json!({}))).await;
    bridge.flush().await;

    assert_eq!(crm.published().len(), 2);
    assert_eq!(crm.invocations().len(), 2);
    assert!(crm.screen_pops().is_empty());
    assert_eq!(bus.get_stats().await.events_emitted, 2);
}

#[tokio::test]
async fn test_pass_through_encoding_with_offer_only() {
    let crm = Arc::new(MockCrm::answering(apex_answer(json!({ "type": "CaseId", "value": "500xx" }))));
    let mut config = BridgeConfig::default();
    config.forwarding.mode = ForwardingMode::OfferOnly;
    config.payload_encoding = PayloadEncoding::PassThroughText;
    let (bridge, bus) = connected(config, crm.clone()).await;

    bus.emit(LifecycleEvent::new(LifecycleEventKind::OfferContact, json!({ "id": 1 }))).await;
    bus.emit(LifecycleEvent::new(LifecycleEventKind::ContactEnded, json!({ "id": 1 }))).await;
    bridge.flush().await;

    let invocations = crm.invocations();
    assert_eq!(invocations.len(), 1);
    assert_eq!(invocations[0].method_params, r#"eventData={"id":1}"#);
    assert_eq!(crm.screen_pops(), vec![ScreenPopRequest::record("500xx")]);
}

#[tokio::test]
async fn test_disconnect_stops_relaying() {
    let crm = Arc::new(MockCrm::answering(apex_answer(json!({ "type": "Noop" }))));
    let (bridge, bus) = connected(BridgeConfig::default(), crm.clone()).await;

    bridge.disconnect(&bus).await;
    bridge.disconnect(&bus).await;
    bus.emit(LifecycleEvent::new(LifecycleEventKind::Wrapup, json!({}))).await;

    assert!(crm.published().is_empty());
    assert_eq!(bridge.registry_state().await, RegistryState::Unregistered);
}

#[tokio::test]
async fn test_pending_remote_call_does_not_hold_up_later_events() {
    let crm = Arc::new(MockCrm::stalling(apex_answer(json!({ "type": "CaseId", "value": "500xx" }))));
    let (_bridge, bus) = connected(BridgeConfig::default(), crm.clone()).await;

    let first = timeout(
        Duration::from_millis(300),
        bus.emit(LifecycleEvent::new(LifecycleEventKind::OfferContact, json!({ "id": 1 }))),
    )
    .await;
    assert!(matches!(first, Ok(1)), "delivery of the first event did not return");

    let second = timeout(
        Duration::from_millis(300),
        bus.emit(LifecycleEvent::new(LifecycleEventKind::ContactAssigned, json!({ "id": 1 }))),
    )
    .await;
    assert!(matches!(second, Ok(1)), "delivery of the second event did not return");

    let relayed = timeout(Duration::from_secs(1), async {
        while crm.published().len() < 2 || crm.invocations().len() < 2 {
            tokio::task::yield_now().await;
        }
    })
    .await;
    assert!(relayed.is_ok(), "both events should reach the CRM");
    assert_eq!(crm.published()[1].1.payload, json!({ "id": 1 }));
    assert!(crm.screen_pops().is_empty());
    assert_eq!(bus.get_stats().await.events_emitted, 2);
}
