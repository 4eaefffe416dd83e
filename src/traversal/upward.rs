use futures_util::future::{try_join_all, BoxFuture, FutureExt};
use tracing::trace;

use super::{Ancestry, Composition, Hit, Properties};
use crate::error::Result;
use crate::primitives::TimeInterval;
use crate::storage::EdgeStore;
use crate::types::{NodeId, SlotPath};

impl<S: EdgeStore> Composition<S> {
    /// Climbs from `start` to every owner that held it during `window` and
    /// descends again from each visited device.
    ///
    /// Descending from every device on the way up (not only from the top)
    /// matters: the window narrows differently depending on which ancestor a
    /// sibling subtree is reached from. A device start reports itself with an
    /// empty path. `trail` holds the slot names climbed so far and only feeds
    /// cycle diagnostics.
    pub(super) fn collect_up<'a>(
        &'a self,
        start: NodeId,
        window: TimeInterval,
        trail: SlotPath,
        ancestry: Ancestry,
    ) -> BoxFuture<'a, Result<Properties>> {
        async move {
            let mut found = Properties::default();
            if let NodeId::Device(device) = start {
                found.devices.push(Hit::new(device, window, SlotPath::new()));
            }

            let edges = self.store.find_by_target(start).await?;
            trace!(node = %start, %window, owners = edges.len(), "traversal.up.visit");

            let mut branches = Vec::with_capacity(edges.len() + 1);
            for edge in edges {
                let interval = edge.interval();
                if !interval.overlaps(&window) {
                    continue;
                }
                let narrowed = interval.narrow(&window)?;
                let owner = NodeId::Device(edge.owner);
                let owner_trail = trail.parent(&edge.name);
                let owner_ancestry = ancestry.descend(owner, &owner_trail, &self.config)?;
                branches.push(self.collect_up(owner, narrowed, owner_trail, owner_ancestry));
            }

            if let NodeId::Device(device) = start {
                branches.push(self.collect_down(
                    device,
                    window,
                    SlotPath::new(),
                    Ancestry::root(start),
                ));
            }

            for branch in try_join_all(branches).await? {
                found.extend(branch);
            }
            Ok(found)
        }
        .boxed()
    }
}
