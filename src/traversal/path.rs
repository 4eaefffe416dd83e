use tracing::{debug, trace};

use super::{check_window, Composition};
use crate::error::{CompositionError, Result};
use crate::primitives::{narrow, TimeInterval};
use crate::storage::EdgeStore;
use crate::types::{DeviceId, SlotPath, Timestamp};

impl<S: EdgeStore> Composition<S> {
    /// Resolves the device occupying `path` below `start` for the entire
    /// window `[begin, end)`.
    ///
    /// Each segment must be filled by exactly one device whose installation
    /// spans the whole (narrowed) window. Partial coverage does not count.
    pub async fn resolve_device_at_path<P: AsRef<str>>(
        &self,
        start: DeviceId,
        path: &[P],
        begin: Timestamp,
        end: Timestamp,
    ) -> Result<DeviceId> {
        let mut window = check_window(TimeInterval::between(begin, end))?;
        let mut current = start;
        let mut walked = SlotPath::new();
        for segment in path {
            let segment = segment.as_ref();
            walked.push(segment);

            let mut covering: Vec<_> = self
                .store
                .find_by_owner_and_name(current, segment)
                .await?
                .into_iter()
                .filter(|edge| edge.interval().covers(&window))
                .filter_map(|edge| edge.target.as_device().map(|target| (target, edge)))
                .collect();
            trace!(device = %current, segment, candidates = covering.len(), "traversal.path.segment");

            let (target, edge) = match covering.len() {
                0 => {
                    return Err(CompositionError::PathNotFound {
                        path: walked,
                        window,
                    })
                }
                1 => covering.remove(0),
                candidates => {
                    return Err(CompositionError::PathAmbiguous {
                        path: walked,
                        window,
                        candidates,
                    })
                }
            };

            window = narrow(&[Some(edge.begin), window.begin], &[edge.end, window.end])?;
            current = target;
        }

        debug!(%start, path = %walked, device = %current, "traversal.resolve_path.done");
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{composition, edge, t};
    use super::*;
    use crate::storage::{Edge, MemoryEdgeStore};
    use crate::types::SampleId;

    fn fixture() -> Composition<MemoryEdgeStore> {
        composition(vec![
            edge(2, "slot of d2 for d3", DeviceId(3), 3, Some(10)),
            edge(2, "slot of d2 for d4", DeviceId(4), 2, Some(7)),
            edge(1, "slot of d1 for d2", DeviceId(2), 1, Some(5)),
        ])
    }

    #[tokio::test]
    async fn resolves_fully_covered_paths() -> Result<()> {
        let comp = fixture();
        assert_eq!(
            comp.resolve_device_at_path(
                DeviceId(1),
                &["slot of d1 for d2", "slot of d2 for d4"],
                t(2),
                t(5)
            )
            .await?,
            DeviceId(4)
        );
        assert_eq!(
            comp.resolve_device_at_path(
                DeviceId(1),
                &["slot of d1 for d2", "slot of d2 for d3"],
                t(3),
                t(4)
            )
            .await?,
            DeviceId(3)
        );
        let empty: [&str; 0] = [];
        assert_eq!(
            comp.resolve_device_at_path(DeviceId(1), &empty, t(0), t(1))
                .await?,
            DeviceId(1)
        );
        Ok(())
    }

    #[tokio::test]
    async fn partial_coverage_is_not_found() {
        let err = fixture()
            .resolve_device_at_path(
                DeviceId(1),
                &["slot of d1 for d2", "slot of d2 for d3"],
                t(1),
                t(4),
            )
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "No device at \"slot of d1 for d2 > slot of d2 for d3\" in range: [{}, {})",
                t(1),
                t(4)
            )
        );
        assert!(matches!(err, CompositionError::PathNotFound { ref path, .. } if path.len() == 2));
    }

    #[tokio::test]
    async fn samples_do_not_resolve() {
        let comp = composition(vec![edge(1, "sample", SampleId(1), 1, None)]);
        let err = comp
            .resolve_device_at_path(DeviceId(1), &["sample"], t(2), t(3))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "PathNotFound");
    }

    #[tokio::test]
    async fn duplicate_slot_assignment_is_ambiguous() {
        let store = MemoryEdgeStore::lenient();
        store
            .insert(Edge::new(DeviceId(1), "slot", DeviceId(2), t(1)))
            .unwrap();
        store
            .insert(Edge::new(DeviceId(1), "slot", DeviceId(3), t(0)))
            .unwrap();
        let err = Composition::new(store)
            .resolve_device_at_path(DeviceId(1), &["slot"], t(2), t(3))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CompositionError::PathAmbiguous { candidates: 2, .. }
        ));
    }

    #[tokio::test]
    async fn rejects_inverted_window() {
        let err = fixture()
            .resolve_device_at_path(DeviceId(1), &["slot of d1 for d2"], t(4), t(3))
            .await
            .unwrap_err();
        assert!(matches!(err, CompositionError::InvalidWindow { .. }));
    }
}
