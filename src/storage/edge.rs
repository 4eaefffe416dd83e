use serde::Serialize;

use crate::primitives::TimeInterval;
use crate::types::{DeviceId, NodeId, Timestamp};

/// Time-scoped composition fact: `target` sits in slot `name` of `owner`
/// during `[begin, end)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Edge {
    /// Device holding the slot.
    pub owner: DeviceId,
    /// Slot name, unique per owner at any instant.
    pub name: String,
    /// Device or sample installed in the slot.
    pub target: NodeId,
    /// Installation time (inclusive).
    pub begin: Timestamp,
    /// Removal time (exclusive); `None` while still installed.
    pub end: Option<Timestamp>,
}

impl Edge {
    /// Creates an open-ended edge starting at `begin`.
    pub fn new(
        owner: DeviceId,
        name: impl Into<String>,
        target: impl Into<NodeId>,
        begin: Timestamp,
    ) -> Self {
        Self {
            owner,
            name: name.into(),
            target: target.into(),
            begin,
            end: None,
        }
    }

    /// Sets the removal time.
    pub fn until(mut self, end: Timestamp) -> Self {
        self.end = Some(end);
        self
    }

    /// The interval during which the edge is active.
    pub fn interval(&self) -> TimeInterval {
        TimeInterval::new(Some(self.begin), self.end)
    }

    /// True when the edge is active at `at`.
    pub fn is_active_at(&self, at: Timestamp) -> bool {
        self.interval().contains(at)
    }
}
