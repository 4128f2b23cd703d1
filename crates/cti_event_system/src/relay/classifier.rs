//! Event classification: decides whether and how a lifecycle event is relayed.

use super::policy::{EventPolicy, ForwardingPolicy};
use crate::events::LifecycleEventKind;

/// Outcome of classifying one event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub forward: bool,
    pub stringify_first: bool,
}

impl From<EventPolicy> for Classification {
    fn from(policy: EventPolicy) -> Self {
        Self {
            forward: policy.forward,
            stringify_first: policy.stringify_first,
        }
    }
}

/// Pure lookup from event kind to [`Classification`].
///
/// The default classifier forwards every kind. Callers never branch on event
/// names themselves, so narrowing what is forwarded only touches the policy.
#[derive(Debug, Clone, Default)]
pub struct EventClassifier {
    policy: ForwardingPolicy,
}

impl EventClassifier {
    pub fn new(policy: ForwardingPolicy) -> Self {
        Self { policy }
    }

    pub fn classify(&self, kind: LifecycleEventKind) -> Classification {
        self.policy.get(kind).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::ForwardingMode;

    #[test]
    fn test_default_classifier_forwards_every_kind() {
        let classifier = EventClassifier::default();
        for kind in LifecycleEventKind::ALL {
            assert!(classifier.classify(kind).forward, "{kind} should be forwarded");
            assert!(!classifier.classify(kind).stringify_first);
        }
    }

    #[test]
    fn test_classifier_follows_policy() {
        let classifier = EventClassifier::new(ForwardingPolicy::new(ForwardingMode::OfferOnly));
        let offer = classifier.classify(LifecycleEventKind::OfferContact);
        assert!(offer.forward);
        assert!(offer.stringify_first);
        assert!(!classifier.classify(LifecycleEventKind::ContactHeld).forward);
    }
}
