//! Time-aware traversal of the device/sample composition graph.
//!
//! Every traversal is a tree of boxed async calls. Sibling branches (children
//! of one device, owners of one node, root candidates) are dispatched together
//! and joined with `try_join_all`, so a single failing branch aborts the whole
//! call. Branches never share mutable state; each builds its own hit lists and
//! the lists are concatenated after the join.

use serde::Serialize;

use crate::config::TraversalConfig;
use crate::error::{CompositionError, Result};
use crate::primitives::{IntervalError, TimeInterval};
use crate::storage::EdgeStore;
use crate::types::{DeviceId, NodeId, SampleId, SlotPath};

mod components;
mod downward;
mod path;
mod roots;
mod upward;
mod usage;

pub use roots::Root;
pub use usage::{group, Usage};

/// Entry point to all composition queries over an [`EdgeStore`].
///
/// Stateless apart from the store handle and configuration; independent calls
/// share nothing.
#[derive(Debug, Clone)]
pub struct Composition<S> {
    store: S,
    config: TraversalConfig,
}

impl<S: EdgeStore> Composition<S> {
    /// Wraps `store` with the default traversal limits.
    pub fn new(store: S) -> Self {
        Self::with_config(store, TraversalConfig::default())
    }

    /// Wraps `store` with explicit traversal limits.
    pub fn with_config(store: S, config: TraversalConfig) -> Self {
        Self { store, config }
    }

    /// The backing edge store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Active traversal limits.
    pub fn config(&self) -> &TraversalConfig {
        &self.config
    }
}

/// Checks a caller-supplied window, rejecting a begin after the end.
pub fn check_window(window: TimeInterval) -> Result<TimeInterval> {
    match window.validate() {
        Ok(window) => Ok(window),
        Err(IntervalError::Inverted { begin, end }) => {
            Err(CompositionError::InvalidWindow { begin, end })
        }
        Err(err) => Err(err.into()),
    }
}

/// Raw discovery record: `id` was connected during `interval`, reached by
/// `path`.
///
/// Hits produced by downward collection always carry a `begin`, since every
/// edge has an installation time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Hit<I> {
    /// Discovered node.
    pub id: I,
    /// When the connection held.
    #[serde(flatten)]
    pub interval: TimeInterval,
    /// Slot path from the traversal origin.
    pub path: SlotPath,
}

impl<I> Hit<I> {
    /// Builds a hit.
    pub fn new(id: I, interval: TimeInterval, path: SlotPath) -> Self {
        Self { id, interval, path }
    }

    fn widen<J: From<I>>(self) -> Hit<J> {
        Hit {
            id: self.id.into(),
            interval: self.interval,
            path: self.path,
        }
    }
}

/// Samples and devices found by a downward collection, each with the slot
/// path from the starting device.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Properties {
    /// Samples held anywhere below the device.
    pub samples: Vec<Hit<SampleId>>,
    /// Devices installed anywhere below the device.
    pub devices: Vec<Hit<DeviceId>>,
}

impl Properties {
    fn extend(&mut self, other: Properties) {
        self.samples.extend(other.samples);
        self.devices.extend(other.devices);
    }

    /// All hits as node hits, samples first.
    pub fn into_nodes(self) -> Vec<Hit<NodeId>> {
        self.samples
            .into_iter()
            .map(Hit::widen)
            .chain(self.devices.into_iter().map(Hit::widen))
            .collect()
    }
}

/// Nodes on the current branch, from the traversal origin to the node being
/// expanded.
#[derive(Clone, Debug)]
struct Ancestry {
    nodes: Vec<NodeId>,
}

impl Ancestry {
    fn root(node: NodeId) -> Self {
        Self { nodes: vec![node] }
    }

    fn descend(&self, node: NodeId, path: &SlotPath, config: &TraversalConfig) -> Result<Self> {
        if self.nodes.len() >= config.max_depth {
            return Err(CompositionError::DepthLimitExceeded {
                limit: config.max_depth,
            });
        }
        if config.detect_cycles && self.nodes.contains(&node) {
            return Err(CompositionError::CycleDetected {
                node,
                path: path.clone(),
            });
        }
        let mut nodes = Vec::with_capacity(self.nodes.len() + 1);
        nodes.extend_from_slice(&self.nodes);
        nodes.push(node);
        Ok(Self { nodes })
    }
}
