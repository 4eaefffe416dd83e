//! Edge storage seam used by the traversal engine.
//!
//! The engine only needs three lookups. Anything that can answer them
//! (a SQL table, a remote service, the in-memory store below) can back a
//! [`Composition`](crate::traversal::Composition).

use std::sync::Arc;

use async_trait::async_trait;

use crate::types::{DeviceId, NodeId};

mod edge;
mod error;
pub mod import;
mod memory;

pub use edge::Edge;
pub use error::StoreError;
pub use memory::MemoryEdgeStore;

/// Read access to composition edges.
///
/// Implementations must be safe to query concurrently; the engine fans out
/// sibling lookups without any locking of its own.
#[async_trait]
pub trait EdgeStore: Send + Sync {
    /// Every edge whose owner is `owner`, in any order.
    async fn find_by_owner(&self, owner: DeviceId) -> Result<Vec<Edge>, StoreError>;

    /// Every edge whose target is `target`, in any order.
    async fn find_by_target(&self, target: NodeId) -> Result<Vec<Edge>, StoreError>;

    /// Every edge of `owner` using slot `name`, in any order.
    async fn find_by_owner_and_name(
        &self,
        owner: DeviceId,
        name: &str,
    ) -> Result<Vec<Edge>, StoreError>;
}

#[async_trait]
impl<S: EdgeStore + ?Sized> EdgeStore for Arc<S> {
    async fn find_by_owner(&self, owner: DeviceId) -> Result<Vec<Edge>, StoreError> {
        (**self).find_by_owner(owner).await
    }

    async fn find_by_target(&self, target: NodeId) -> Result<Vec<Edge>, StoreError> {
        (**self).find_by_target(target).await
    }

    async fn find_by_owner_and_name(
        &self,
        owner: DeviceId,
        name: &str,
    ) -> Result<Vec<Edge>, StoreError> {
        (**self).find_by_owner_and_name(owner, name).await
    }
}
