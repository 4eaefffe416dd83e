use futures_util::future::{try_join_all, BoxFuture, FutureExt};
use serde::Serialize;
use tracing::{debug, trace};

use super::{check_window, Ancestry, Composition};
use crate::error::Result;
use crate::primitives::TimeInterval;
use crate::storage::{Edge, EdgeStore};
use crate::types::{DeviceId, NodeId, SlotPath};

/// A top-level device and the slot path leading from it down to the queried
/// node.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Root {
    /// Device with no owner during the (narrowed) window.
    pub device: DeviceId,
    /// Slot names from `device` down to the queried node.
    pub path: SlotPath,
}

impl<S: EdgeStore> Composition<S> {
    /// Finds every device at the top of an ownership chain containing `id`
    /// during `window`.
    ///
    /// A device with no owner in the window is its own root (with an empty
    /// path). A sample that is not held by anything has no roots. The window
    /// narrows at each step, so an ancestor that only held an intermediate
    /// device outside the time the queried node was inside it is not a root.
    pub async fn find_root_devices(
        &self,
        id: impl Into<NodeId>,
        window: TimeInterval,
    ) -> Result<Vec<Root>> {
        let id = id.into();
        let window = check_window(window)?;
        let roots = self
            .find_roots(id, window, SlotPath::new(), Ancestry::root(id))
            .await?;
        debug!(node = %id, %window, roots = roots.len(), "traversal.find_roots.done");
        Ok(roots)
    }

    fn find_roots<'a>(
        &'a self,
        id: NodeId,
        window: TimeInterval,
        path: SlotPath,
        ancestry: Ancestry,
    ) -> BoxFuture<'a, Result<Vec<Root>>> {
        async move {
            // Strict on both sides: an edge ending exactly at the window begin,
            // or starting exactly at the window end, is not a usage.
            let usages: Vec<Edge> = self
                .store
                .find_by_target(id)
                .await?
                .into_iter()
                .filter(|edge| edge.interval().overlaps(&window))
                .collect();
            trace!(node = %id, %window, usages = usages.len(), "traversal.roots.visit");

            if usages.is_empty() {
                return Ok(match id {
                    NodeId::Device(device) => vec![Root { device, path }],
                    NodeId::Sample(_) => Vec::new(),
                });
            }

            let mut branches = Vec::with_capacity(usages.len());
            for edge in usages {
                let narrowed = edge.interval().narrow(&window)?;
                let owner = NodeId::Device(edge.owner);
                let owner_path = path.parent(&edge.name);
                let owner_ancestry = ancestry.descend(owner, &owner_path, &self.config)?;
                branches.push(self.find_roots(owner, narrowed, owner_path, owner_ancestry));
            }
            Ok(try_join_all(branches).await?.into_iter().flatten().collect())
        }
        .boxed()
    }
}
