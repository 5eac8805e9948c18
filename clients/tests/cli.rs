//! Smoke tests for the `eln2crate` binary.

#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const CONFIG: &str = r#"
[namespace]
base = "https://example.org/eln"

[[institutions]]
key = "uni"
name = "Example University"

[[persons]]
key = "jane doe"
given_name = "Jane"
family_name = "Doe"
affiliation = "uni"
"#;

const EXPERIMENT: &str = r#"{
  "id": 42,
  "title": "Calcium imaging",
  "category": "Success",
  "tags": "mouse",
  "lastchange": "2021-02-01 10:00:00",
  "body": "<h1>General information</h1><table><tr><td>Researcher</td><td>Jane Doe</td></tr></table><h1>Protocol</h1><h2>Preparation</h2><table><tr><th>D</th><th>T</th></tr><tr><td>Wash with <a href=\"database.php?mode=view&id=1\">PBS</a></td><td>09:00</td></tr></table>",
  "links": [{ "itemid": 1 }],
  "uploads": []
}"#;

const ITEM: &str = r#"{
  "id": 1,
  "title": "PBS",
  "category": "Chemical",
  "lastchange": "2021-01-21 16:00:20",
  "body": "<table><tr><td>ontology-item</td><td>http://purl.obolibrary.org/obo/CHEBI_53258</td></tr></table>"
}"#;

fn setup(root: &Path) {
    fs::write(root.join("config.toml"), CONFIG).unwrap();
    fs::write(root.join("experiment.json"), EXPERIMENT).unwrap();
    fs::create_dir_all(root.join("items")).unwrap();
    fs::write(root.join("items/1.json"), ITEM).unwrap();
    fs::create_dir_all(root.join("package/Data")).unwrap();
    fs::write(root.join("package/Data/trace.csv"), "t,v\n0,1\n").unwrap();
}

fn run(root: &Path, format: &str) -> Output {
    Command::new(env!("CARGO_BIN_EXE_eln2crate"))
        .arg("--experiment")
        .arg(root.join("experiment.json"))
        .arg("--items")
        .arg(root.join("items"))
        .arg("--config")
        .arg(root.join("config.toml"))
        .arg("--package")
        .arg(root.join("package"))
        .arg("--out")
        .arg(root.join("out"))
        .arg("--format")
        .arg(format)
        .output()
        .unwrap()
}

#[test]
fn writes_json_ld_metadata() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path());
    let output = run(dir.path(), "jsonld");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let text = fs::read_to_string(dir.path().join("out/ro-crate-metadata.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    let graph = json["@graph"].as_array().unwrap();
    assert!(graph.iter().any(|node| node["@id"] == "Data/trace.csv"));
    assert!(graph
        .iter()
        .any(|node| node["@id"] == "https://example.org/eln/42/preparation/1"));
}

#[test]
fn writes_ntriples() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path());
    let output = run(dir.path(), "ntriples");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let nt = fs::read_to_string(dir.path().join("out/ro-crate-metadata.nt")).unwrap();
    assert!(nt.lines().all(|line| line.ends_with(" .")));
    assert!(nt.contains(
        "<https://example.org/eln/42/preparation/1> <http://www.w3.org/ns/prov#used> <https://example.org/eln/database/1> ."
    ));
}

#[test]
fn fatal_conversion_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path());
    let broken = EXPERIMENT.replace("Preparation", "Random Stage");
    fs::write(dir.path().join("experiment.json"), broken).unwrap();
    let output = run(dir.path(), "turtle");
    assert!(!output.status.success());
    assert!(!dir.path().join("out/ro-crate-metadata.ttl").exists());
}
