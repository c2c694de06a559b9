//! Cumulative lifecycle counters for one family.
//!
//! [`FamilyMetrics`] is updated by every lifecycle operation and never
//! reset; hosts read it through
//! [`Family::metrics()`](crate::Family::metrics) for telemetry and to
//! spot a misbehaving solver (non-zero `rejected_*` counters).

/// Lifecycle counters since the family was constructed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FamilyMetrics {
    /// Actors registered and reported as created.
    pub actors_created: u64,
    /// Actors unregistered and reported as destroyed.
    pub actors_destroyed: u64,
    /// Split events that resolved their parent and were applied.
    pub split_events: u64,
    /// Non-split events that were ignored.
    pub ignored_events: u64,
    /// Split events rejected as a whole: missing payload, missing parent
    /// user data, or a parent this family does not track.
    pub rejected_events: u64,
    /// Individual null children skipped inside otherwise valid splits.
    pub rejected_children: u64,
    /// Events delivered while the family was not spawned.
    pub events_while_unspawned: u64,
}

impl FamilyMetrics {
    /// Actors created minus actors destroyed.
    pub fn live_actors(&self) -> u64 {
        self.actors_created.saturating_sub(self.actors_destroyed)
    }
}
