//! Errors returned by composition queries.

use thiserror::Error;

use crate::primitives::{IntervalError, TimeInterval};
use crate::storage::StoreError;
use crate::types::{DeviceId, NodeId, SlotPath, Timestamp};

/// Result alias used by every traversal entry point.
pub type Result<T> = std::result::Result<T, CompositionError>;

/// Errors surfaced by the composition engine.
///
/// Any error aborts the whole traversal; no partial results are returned.
#[derive(Debug, Error)]
pub enum CompositionError {
    /// Interval narrowing was asked to intersect disjoint intervals.
    #[error(transparent)]
    Interval(#[from] IntervalError),
    /// No device occupies the slot path for the entire window.
    #[error("No device at \"{path}\" in range: {window}")]
    PathNotFound {
        /// Path walked so far, ending with the unresolved segment.
        path: SlotPath,
        /// Window that had to be covered.
        window: TimeInterval,
    },
    /// More than one device occupies the slot path for the window.
    #[error("{candidates} devices occupy \"{path}\" in range: {window}")]
    PathAmbiguous {
        /// Path walked so far, ending with the ambiguous segment.
        path: SlotPath,
        /// Window that had to be covered.
        window: TimeInterval,
        /// Number of covering edges found.
        candidates: usize,
    },
    /// The edge set contains a containment cycle.
    #[error("composition cycle through {node} via \"{path}\"")]
    CycleDetected {
        /// Node that was reached a second time.
        node: NodeId,
        /// Slot path from the traversal origin to the repeated node.
        path: SlotPath,
    },
    /// Recursion went deeper than the configured limit.
    #[error("traversal exceeded the depth limit of {limit}")]
    DepthLimitExceeded {
        /// Configured maximum depth.
        limit: usize,
    },
    /// A device has more than one active parent at a single instant.
    #[error("{device} has more than one parent at {at}")]
    MultipleParents {
        /// Device being looked up.
        device: DeviceId,
        /// Instant of the lookup.
        at: Timestamp,
    },
    /// A window whose begin lies after its end.
    #[error("invalid window: begin {begin} is after end {end}")]
    InvalidWindow {
        /// Requested begin.
        begin: Timestamp,
        /// Requested end.
        end: Timestamp,
    },
    /// Edge store failure, propagated unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CompositionError {
    /// Returns a machine-readable code for the error variant.
    pub fn code(&self) -> &'static str {
        match self {
            CompositionError::Interval(err) => err.code(),
            CompositionError::PathNotFound { .. } => "PathNotFound",
            CompositionError::PathAmbiguous { .. } => "PathAmbiguous",
            CompositionError::CycleDetected { .. } => "CycleDetected",
            CompositionError::DepthLimitExceeded { .. } => "DepthLimitExceeded",
            CompositionError::MultipleParents { .. } => "MultipleParents",
            CompositionError::InvalidWindow { .. } => "InvalidWindow",
            CompositionError::Store(err) => err.code(),
        }
    }
}
