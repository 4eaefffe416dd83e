use futures_util::future::{try_join_all, BoxFuture, FutureExt};
use tracing::{debug, trace};

use super::{check_window, Ancestry, Composition, Hit, Properties};
use crate::error::Result;
use crate::primitives::TimeInterval;
use crate::storage::EdgeStore;
use crate::types::{DeviceId, NodeId, SlotPath};

impl<S: EdgeStore> Composition<S> {
    /// Lists every sample and device installed below `device` during `window`,
    /// regardless of where `device` itself is installed.
    ///
    /// Intervals are narrowed along the way, so a grandchild is only reported
    /// for the time its parent was installed too. Hits are not merged; the
    /// same node can appear several times with different intervals.
    pub async fn collect_properties_with_path(
        &self,
        device: DeviceId,
        window: TimeInterval,
    ) -> Result<Properties> {
        let window = check_window(window)?;
        let properties = self
            .collect_down(
                device,
                window,
                SlotPath::new(),
                Ancestry::root(device.into()),
            )
            .await?;
        debug!(
            %device,
            %window,
            samples = properties.samples.len(),
            devices = properties.devices.len(),
            "traversal.collect_properties.done"
        );
        Ok(properties)
    }

    pub(super) fn collect_down<'a>(
        &'a self,
        device: DeviceId,
        window: TimeInterval,
        path: SlotPath,
        ancestry: Ancestry,
    ) -> BoxFuture<'a, Result<Properties>> {
        async move {
            let edges = self.store.find_by_owner(device).await?;
            trace!(%device, %window, edges = edges.len(), "traversal.down.visit");

            let mut found = Properties::default();
            let mut branches = Vec::new();
            for edge in edges {
                let interval = edge.interval();
                if !interval.overlaps(&window) {
                    continue;
                }
                let narrowed = interval.narrow(&window)?;
                let child_path = path.child(&edge.name);

                match edge.target {
                    NodeId::Sample(sample) => {
                        found.samples.push(Hit::new(sample, narrowed, child_path));
                    }
                    NodeId::Device(child) => {
                        let child_ancestry =
                            ancestry.descend(edge.target, &child_path, &self.config)?;
                        found
                            .devices
                            .push(Hit::new(child, narrowed, child_path.clone()));
                        branches.push(self.collect_down(
                            child,
                            narrowed,
                            child_path,
                            child_ancestry,
                        ));
                    }
                }
            }

            for branch in try_join_all(branches).await? {
                found.extend(branch);
            }
            Ok(found)
        }
        .boxed()
    }
}
