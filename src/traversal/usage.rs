use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::{check_window, Ancestry, Composition, Hit};
use crate::error::Result;
use crate::primitives::{merge, TimeInterval, Timeframe};
use crate::storage::EdgeStore;
use crate::types::{DeviceId, NodeId, SampleId, SlotPath};

/// One connected node with every interval it was connected during.
///
/// Timeframes are merged, sorted by begin and pairwise disjoint (touching
/// intervals are merged too).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Usage<T> {
    /// Connected node.
    pub target: T,
    /// When it was connected and via which slot path.
    pub timeframes: Vec<Timeframe>,
}

/// Buckets raw hits by id and merges each bucket.
///
/// Buckets come back in id order. See [`merge`] for which path survives when
/// timeframes are combined.
pub fn group<I: Ord>(hits: Vec<Hit<I>>) -> BTreeMap<I, Vec<Timeframe>> {
    let mut buckets: BTreeMap<I, Vec<Timeframe>> = BTreeMap::new();
    for hit in hits {
        buckets
            .entry(hit.id)
            .or_default()
            .push(Timeframe::new(hit.interval, hit.path));
    }
    for timeframes in buckets.values_mut() {
        *timeframes = merge(std::mem::take(timeframes));
    }
    buckets
}

fn into_usages<I: Ord>(hits: Vec<Hit<I>>) -> Vec<Usage<I>> {
    group(hits)
        .into_iter()
        .map(|(target, timeframes)| Usage { target, timeframes })
        .collect()
}

impl<S: EdgeStore> Composition<S> {
    /// Every sample used together with `device` during `window`: held by the
    /// device, by anything below it, or by anything installed alongside it in
    /// a common ancestor.
    pub async fn collect_samples(
        &self,
        device: DeviceId,
        window: TimeInterval,
    ) -> Result<Vec<Usage<SampleId>>> {
        let window = check_window(window)?;
        let start = NodeId::Device(device);
        let found = self
            .collect_up(start, window, SlotPath::new(), Ancestry::root(start))
            .await?;
        let hits = found.samples.len();
        let usages = into_usages(found.samples);
        debug!(%device, %window, hits, samples = usages.len(), "traversal.collect_samples.done");
        Ok(usages)
    }

    /// Every device `sample` was used together with during `window`.
    pub async fn collect_devices(
        &self,
        sample: SampleId,
        window: TimeInterval,
    ) -> Result<Vec<Usage<DeviceId>>> {
        let window = check_window(window)?;
        let start = NodeId::Sample(sample);
        let found = self
            .collect_up(start, window, SlotPath::new(), Ancestry::root(start))
            .await?;
        let hits = found.devices.len();
        let usages = into_usages(found.devices);
        debug!(%sample, %window, hits, devices = usages.len(), "traversal.collect_devices.done");
        Ok(usages)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::t;
    use super::*;

    #[test]
    fn groups_by_id_and_merges_each_bucket() {
        let hit = |id: u64, begin: i64, end: i64, slot: &str| {
            Hit::new(
                SampleId(id),
                TimeInterval::between(t(begin), t(end)),
                [slot].into_iter().collect::<SlotPath>(),
            )
        };
        let grouped = group(vec![
            hit(2, 4, 6, "late"),
            hit(1, 1, 5, "sample1"),
            hit(1, 7, 8, "sample1"),
            hit(1, 10, 15, "sample2"),
            hit(2, 1, 4, "early"),
        ]);

        assert_eq!(grouped.len(), 2);
        let first: Vec<_> = grouped[&SampleId(1)]
            .iter()
            .map(|tf| (tf.interval, tf.path.to_string()))
            .collect();
        assert_eq!(
            first,
            vec![
                (TimeInterval::between(t(1), t(5)), "sample1".to_owned()),
                (TimeInterval::between(t(7), t(8)), "sample1".to_owned()),
                (TimeInterval::between(t(10), t(15)), "sample2".to_owned()),
            ]
        );
        assert_eq!(
            grouped[&SampleId(2)],
            vec![Timeframe::new(
                TimeInterval::between(t(1), t(6)),
                ["early"].into_iter().collect()
            )]
        );
    }
}
