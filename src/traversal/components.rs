use std::collections::BTreeSet;

use tracing::debug;

use super::{check_window, Composition, Hit, Root};
use crate::error::{CompositionError, Result};
use crate::primitives::TimeInterval;
use crate::storage::{Edge, EdgeStore};
use crate::types::{DeviceId, NodeId, SlotPath, Timestamp};

impl<S: EdgeStore> Composition<S> {
    /// The device holding `device` at `at`, if any.
    pub async fn parent(&self, device: DeviceId, at: Timestamp) -> Result<Option<DeviceId>> {
        let mut owners: Vec<DeviceId> = self
            .store
            .find_by_target(device.into())
            .await?
            .into_iter()
            .filter(|edge| edge.is_active_at(at))
            .map(|edge| edge.owner)
            .collect();
        if owners.len() > 1 {
            return Err(CompositionError::MultipleParents { device, at });
        }
        Ok(owners.pop())
    }

    /// Slots of `device` filled at `at`, ordered by slot name.
    pub async fn active_slots(&self, device: DeviceId, at: Timestamp) -> Result<Vec<Edge>> {
        let mut slots: Vec<Edge> = self
            .store
            .find_by_owner(device)
            .await?
            .into_iter()
            .filter(|edge| edge.is_active_at(at))
            .collect();
        slots.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(slots)
    }

    /// Everything installed below `device` during `window`.
    ///
    /// With `include_overlaps` unset only components present for the whole
    /// window are kept; a window without an end then requires components that
    /// were never removed.
    pub async fn components(
        &self,
        device: DeviceId,
        window: TimeInterval,
        include_overlaps: bool,
    ) -> Result<Vec<Hit<NodeId>>> {
        let window = check_window(window)?;
        let mut found = self
            .collect_properties_with_path(device, window)
            .await?
            .into_nodes();
        if !include_overlaps {
            found.retain(|hit| hit.interval.covers(&window));
        }
        debug!(%device, %window, include_overlaps, components = found.len(), "traversal.components.done");
        Ok(found)
    }

    /// Every node that was ever installed at exactly `path` below `device`.
    pub async fn components_in_slot(
        &self,
        device: DeviceId,
        path: &SlotPath,
    ) -> Result<Vec<Hit<NodeId>>> {
        let mut found = self
            .collect_properties_with_path(device, TimeInterval::unbounded())
            .await?
            .into_nodes();
        found.retain(|hit| &hit.path == path);
        Ok(found)
    }

    /// The outermost device containing `id` at `at`.
    ///
    /// Returns `None` for a device that is not installed anywhere and for a
    /// sample that is not held by anything.
    pub async fn top_level_device(
        &self,
        id: impl Into<NodeId>,
        at: Timestamp,
    ) -> Result<Option<Root>> {
        let id = id.into();
        let root = self
            .find_root_devices(id, TimeInterval::instant(at))
            .await?
            .into_iter()
            .next();
        Ok(root.filter(|root| NodeId::Device(root.device) != id))
    }

    /// Devices that must not be installed into `device` during `window`:
    /// the device itself and every root above it.
    pub async fn install_exclusions(
        &self,
        device: DeviceId,
        window: TimeInterval,
    ) -> Result<BTreeSet<DeviceId>> {
        let mut excluded: BTreeSet<DeviceId> = self
            .find_root_devices(device, window)
            .await?
            .into_iter()
            .map(|root| root.device)
            .collect();
        excluded.insert(device);
        Ok(excluded)
    }
}
