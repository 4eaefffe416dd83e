#![allow(missing_docs)]

use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

const EDGES: &str = "\
owner,name,target,begin,end
device:2,sample,sample:1,1,3
device:2,sample,sample:3,3,
device:1,slot,device:2,1,3
device:4,sample,sample:5,1,
device:3,holder,device:4,1,5
";

fn setup(name: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join(format!("{name}.csv"));
    fs::write(&path, EDGES).expect("write edges");
    (dir, path)
}

fn run_json(args: &[&str]) -> Value {
    let output = cargo_bin_cmd!("lineage")
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).expect("valid json")
}

#[test]
fn samples_json_only_lists_meaningful_usage() {
    let (_dir, edges) = setup("samples");
    let json = run_json(&[
        "--edges",
        edges.to_str().unwrap(),
        "--format",
        "json",
        "samples",
        "device:1",
    ]);
    let usages = json.as_array().expect("array");
    assert_eq!(usages.len(), 1);
    assert_eq!(usages[0]["target"], "sample:1");
    let frame = &usages[0]["timeframes"][0];
    assert_eq!(frame["begin"], 1);
    assert_eq!(frame["end"], 3);
    assert_eq!(frame["path"], serde_json::json!(["slot", "sample"]));
}

#[test]
fn devices_text_lists_holders() {
    let (_dir, edges) = setup("devices");
    cargo_bin_cmd!("lineage")
        .args(["--edges", edges.to_str().unwrap(), "devices", "sample:5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("device:3"))
        .stdout(predicate::str::contains("device:4"));
}

#[test]
fn roots_respect_window() {
    let (_dir, edges) = setup("roots");
    let json = run_json(&[
        "--edges",
        edges.to_str().unwrap(),
        "--format",
        "json",
        "roots",
        "sample:5",
        "--begin",
        "2",
        "--end",
        "4",
    ]);
    assert_eq!(json[0]["device"], "device:3");
    assert_eq!(json[0]["path"], serde_json::json!(["holder", "sample"]));

    let json = run_json(&[
        "--edges",
        edges.to_str().unwrap(),
        "--format",
        "json",
        "roots",
        "sample:5",
        "--begin",
        "5",
    ]);
    assert_eq!(json[0]["device"], "device:4");
}

#[test]
fn resolve_reports_missing_path() {
    let (_dir, edges) = setup("resolve");
    cargo_bin_cmd!("lineage")
        .args([
            "--edges",
            edges.to_str().unwrap(),
            "resolve",
            "device:3",
            "--begin",
            "1",
            "--end",
            "5",
            "holder",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("device:4"));

    cargo_bin_cmd!("lineage")
        .args([
            "--edges",
            edges.to_str().unwrap(),
            "resolve",
            "device:3",
            "--begin",
            "1",
            "--end",
            "6",
            "holder",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("error: No device at \"holder\""));
}

#[test]
fn parent_and_components() {
    let (_dir, edges) = setup("parent");
    cargo_bin_cmd!("lineage")
        .args(["--edges", edges.to_str().unwrap(), "parent", "device:2", "--at", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("device:1"));

    cargo_bin_cmd!("lineage")
        .args(["--edges", edges.to_str().unwrap(), "parent", "device:2", "--at", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(none)"));

    let json = run_json(&[
        "--edges",
        edges.to_str().unwrap(),
        "--format",
        "json",
        "components",
        "device:3",
        "--begin",
        "2",
        "--end",
        "6",
    ]);
    assert_eq!(json.as_array().expect("array").len(), 0);

    let json = run_json(&[
        "--edges",
        edges.to_str().unwrap(),
        "--format",
        "json",
        "components",
        "device:3",
        "--begin",
        "2",
        "--end",
        "6",
        "--include-overlaps",
    ]);
    assert_eq!(json.as_array().expect("array").len(), 2);
}

#[test]
fn rejects_conflicting_slots_unless_lenient() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("conflict.csv");
    fs::write(
        &path,
        "owner,name,target,begin,end\ndevice:1,slot,sample:1,1,5\ndevice:1,slot,sample:2,4,\n",
    )
    .expect("write edges");

    cargo_bin_cmd!("lineage")
        .args(["--edges", path.to_str().unwrap(), "samples", "device:1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already occupied"));

    cargo_bin_cmd!("lineage")
        .args([
            "--edges",
            path.to_str().unwrap(),
            "--lenient",
            "samples",
            "device:1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("sample:2"));
}

#[test]
fn config_file_limits_depth() {
    let (dir, edges) = setup("config");
    let config = dir.path().join("lineage.toml");
    fs::write(&config, "[traversal]\nmax_depth = 1\n").expect("write config");

    cargo_bin_cmd!("lineage")
        .args([
            "--edges",
            edges.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "roots",
            "sample:5",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("depth limit of 1"));
}

#[test]
fn missing_edge_file_is_an_error() {
    cargo_bin_cmd!("lineage")
        .args(["samples", "device:1"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("--edges"));
}

#[test]
fn inverted_window_is_rejected() {
    let (_dir, edges) = setup("inverted");
    cargo_bin_cmd!("lineage")
        .args([
            "--edges",
            edges.to_str().unwrap(),
            "roots",
            "device:2",
            "--begin",
            "5",
            "--end",
            "3",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid window"));
}

#[test]
fn strict_limits_deep_chains() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("chain.csv");
    let mut csv = String::from("owner,name,target,begin,end\n");
    for id in 1..40 {
        csv.push_str(&format!("device:{id},inner,device:{},1,\n", id + 1));
    }
    csv.push_str("device:40,sample,sample:1,1,\n");
    fs::write(&path, csv).expect("write edges");

    cargo_bin_cmd!("lineage")
        .args(["--edges", path.to_str().unwrap(), "roots", "sample:1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("device:1"));

    cargo_bin_cmd!("lineage")
        .args(["--edges", path.to_str().unwrap(), "--strict", "roots", "sample:1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("depth limit of 32"));
}

#[test]
fn slots_lists_filled_slots_at_instant() {
    let (_dir, edges) = setup("slots");
    cargo_bin_cmd!("lineage")
        .args(["--edges", edges.to_str().unwrap(), "slots", "device:2", "--at", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sample = sample:3"))
        .stdout(predicate::str::contains("sample:1").not());

    let json = run_json(&[
        "--edges",
        edges.to_str().unwrap(),
        "--format",
        "json",
        "slots",
        "device:2",
        "--at",
        "1",
    ]);
    assert_eq!(json[0]["target"], "sample:1");
}
