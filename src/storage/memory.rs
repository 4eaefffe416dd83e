use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use smallvec::SmallVec;
use tracing::trace;

use super::{Edge, EdgeStore, StoreError};
use crate::types::{DeviceId, NodeId};

type EdgeList = SmallVec<[usize; 8]>;

/// In-memory edge store indexed by owner and by target.
///
/// Inserts validate that `end > begin` and, unless the store was created with
/// [`MemoryEdgeStore::lenient`], that no other edge occupies the same slot
/// during an overlapping interval.
#[derive(Debug, Default)]
pub struct MemoryEdgeStore {
    inner: RwLock<Inner>,
    lenient: bool,
}

#[derive(Debug, Default)]
struct Inner {
    edges: Vec<Edge>,
    by_owner: HashMap<DeviceId, EdgeList>,
    by_target: HashMap<NodeId, EdgeList>,
}

impl MemoryEdgeStore {
    /// Creates an empty validating store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that skips the slot-exclusivity check.
    ///
    /// Useful for replaying data whose consistency is checked elsewhere and
    /// for reproducing inconsistent states.
    pub fn lenient() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            lenient: true,
        }
    }

    /// Builds a validating store from a batch of edges.
    pub fn from_edges(edges: impl IntoIterator<Item = Edge>) -> Result<Self, StoreError> {
        let store = Self::new();
        for edge in edges {
            store.insert(edge)?;
        }
        Ok(store)
    }

    /// Adds an edge after validating it.
    pub fn insert(&self, edge: Edge) -> Result<(), StoreError> {
        if let Some(end) = edge.end {
            if end <= edge.begin {
                return Err(StoreError::InvalidEdge(format!(
                    "slot '{}' of {} ends at {end}, not after its begin {}",
                    edge.name, edge.owner, edge.begin
                )));
            }
        }
        if edge.target == NodeId::Device(edge.owner) {
            return Err(StoreError::InvalidEdge(format!(
                "{} cannot be installed in itself",
                edge.owner
            )));
        }

        let mut inner = self.inner.write();
        if !self.lenient {
            if let Some(existing) = inner.conflicting(&edge) {
                let at = existing.begin.max(edge.begin);
                return Err(StoreError::SlotConflict {
                    owner: edge.owner,
                    name: edge.name,
                    at,
                });
            }
        }

        let idx = inner.edges.len();
        inner.by_owner.entry(edge.owner).or_default().push(idx);
        inner.by_target.entry(edge.target).or_default().push(idx);
        trace!(owner = %edge.owner, name = %edge.name, target = %edge.target, "store.memory.insert");
        inner.edges.push(edge);
        Ok(())
    }

    /// Number of stored edges.
    pub fn len(&self) -> usize {
        self.inner.read().edges.len()
    }

    /// True when no edges are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Inner {
    fn conflicting(&self, edge: &Edge) -> Option<&Edge> {
        let interval = edge.interval();
        self.by_owner
            .get(&edge.owner)?
            .iter()
            .map(|&idx| &self.edges[idx])
            .find(|other| other.name == edge.name && other.interval().overlaps(&interval))
    }

    fn collect(&self, indices: Option<&EdgeList>) -> Vec<Edge> {
        indices
            .map(|list| list.iter().map(|&idx| self.edges[idx].clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EdgeStore for MemoryEdgeStore {
    async fn find_by_owner(&self, owner: DeviceId) -> Result<Vec<Edge>, StoreError> {
        let inner = self.inner.read();
        Ok(inner.collect(inner.by_owner.get(&owner)))
    }

    async fn find_by_target(&self, target: NodeId) -> Result<Vec<Edge>, StoreError> {
        let inner = self.inner.read();
        Ok(inner.collect(inner.by_target.get(&target)))
    }

    async fn find_by_owner_and_name(
        &self,
        owner: DeviceId,
        name: &str,
    ) -> Result<Vec<Edge>, StoreError> {
        let inner = self.inner.read();
        Ok(inner
            .by_owner
            .get(&owner)
            .map(|list| {
                list.iter()
                    .map(|&idx| &inner.edges[idx])
                    .filter(|edge| edge.name == name)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
