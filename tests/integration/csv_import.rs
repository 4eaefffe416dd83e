#![allow(missing_docs)]

use std::fs;

use sombra_lineage::storage::import::{load_store, read_edges, EdgeColumns, EdgeImportConfig};
use sombra_lineage::{
    Composition, DeviceId, EdgeStore, NodeId, SampleId, StoreError, TimeInterval, Timestamp,
};
use tempfile::TempDir;

#[tokio::test]
async fn loads_file_into_queryable_store() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("edges.csv");
    fs::write(
        &path,
        "owner,name,target,begin,end\n\
         device:1,furnace,device:2,2024-01-01T00:00:00Z,\n\
         device:2,tube,sample:7,2024-01-02T00:00:00Z,2024-01-03T00:00:00Z\n",
    )
    .expect("write edges");

    let (store, summary) = load_store(&EdgeImportConfig::new(&path)).expect("import");
    assert_eq!(summary.edges_imported, 2);
    assert_eq!(summary.open_edges, 1);

    let by_target = store
        .find_by_target(NodeId::Sample(SampleId(7)))
        .await
        .expect("lookup");
    assert_eq!(by_target.len(), 1);
    assert_eq!(by_target[0].owner, DeviceId(2));

    let comp = Composition::new(store);
    let usages = comp
        .collect_samples(DeviceId(1), TimeInterval::unbounded())
        .await
        .expect("collect");
    assert_eq!(usages.len(), 1);
    let frame = &usages[0].timeframes[0];
    assert_eq!(
        frame.interval.begin,
        Some("2024-01-02T00:00:00Z".parse::<Timestamp>().unwrap())
    );
    assert_eq!(frame.path, ["furnace", "tube"]);
}

#[test]
fn custom_column_names() {
    let columns = EdgeColumns {
        owner: "parent".into(),
        name: "slot".into(),
        target: "child".into(),
        begin: "installed".into(),
        end: "removed".into(),
    };
    let csv = "child,slot,parent,installed,removed\nsample:1,s,device:9,5,7\n";
    let edges = read_edges(csv.as_bytes(), &columns).expect("parse");
    assert_eq!(edges[0].owner, DeviceId(9));
    assert_eq!(edges[0].target, NodeId::Sample(SampleId(1)));
    assert_eq!(edges[0].interval(), TimeInterval::between(Timestamp(5), Timestamp(7)));
}

#[test]
fn rejects_inverted_and_self_contained_edges() {
    let dir = TempDir::new().expect("tempdir");

    let inverted = dir.path().join("inverted.csv");
    fs::write(&inverted, "owner,name,target,begin,end\ndevice:1,s,sample:1,5,5\n").unwrap();
    let err = load_store(&EdgeImportConfig::new(&inverted)).unwrap_err();
    assert!(matches!(err, StoreError::InvalidEdge(_)), "{err}");

    let looped = dir.path().join("looped.csv");
    fs::write(&looped, "owner,name,target,begin,end\ndevice:1,s,device:1,1,\n").unwrap();
    let err = load_store(&EdgeImportConfig::new(&looped)).unwrap_err();
    assert_eq!(err.code(), "InvalidEdge");
}

#[test]
fn missing_file_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    let err = load_store(&EdgeImportConfig::new(dir.path().join("absent.csv"))).unwrap_err();
    assert_eq!(err.code(), "Csv");
}
