/// Statistics tracking for the contact event bus
use serde::{Deserialize, Serialize};

/// Event bus statistics for monitoring
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactEventBusStats {
    /// Number of currently attached listeners
    pub total_handlers: usize,
    /// Total number of events emitted since the bus was created
    pub events_emitted: u64,
    /// Events emitted while no listener was attached for their kind
    pub events_without_handlers: u64,
}
