// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use geomap_dry_tests::{point, square, two_field_query, GeometryBuilder};
use predicates::prelude::*;
use tempfile::TempDir;

fn geomap(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("geomap").unwrap();
    cmd.arg("--config-dir")
        .arg(config_dir)
        .env_remove("RUST_LOG");
    cmd
}

fn write_payload(dir: &TempDir, name: &str, json: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, json).unwrap();
    path
}

#[test]
fn tree_lists_fields_hidden_until_shown() {
    let dir = TempDir::new().unwrap();
    let file = write_payload(&dir, "query.json", &two_field_query().to_json());

    geomap(dir.path())
        .arg("tree")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("session: Query 1"))
        .stdout(predicate::str::contains("Geo By Field"))
        .stdout(predicate::str::contains("FIELD1"))
        .stdout(predicate::str::contains("FIELD2"))
        .stdout(predicate::str::contains("#1976d2"))
        .stdout(predicate::str::contains("yes").not());

    geomap(dir.path())
        .args(["tree", "--show-all"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("yes"));
}

#[test]
fn bounds_reports_none_then_union() {
    let dir = TempDir::new().unwrap();
    let file = write_payload(&dir, "query.json", &two_field_query().to_json());

    geomap(dir.path())
        .arg("bounds")
        .arg(&file)
        .assert()
        .success()
        .stdout("none\n");

    geomap(dir.path())
        .args(["bounds", "--show-all"])
        .arg(&file)
        .assert()
        .success()
        .stdout("[[0.0,0.0],[6.0,6.0]]\n");

    geomap(dir.path())
        .args(["bounds", "--show-all", "--path", "0/1"])
        .arg(&file)
        .assert()
        .success()
        .stdout("[[5.0,5.0],[6.0,6.0]]\n");
}

#[test]
fn geometry_payloads_show_the_submitted_geometry() {
    let dir = TempDir::new().unwrap();
    let json = GeometryBuilder::new()
        .geometry(square("g", [1.0, 2.0], [3.0, 4.0]))
        .range_tier("1", point("r", 9.0, 9.0))
        .to_json();
    let file = write_payload(&dir, "geometry.json", &json);

    geomap(dir.path())
        .args(["bounds", "--kind", "geometry"])
        .arg(&file)
        .assert()
        .success()
        .stdout("[[1.0,2.0],[3.0,4.0]]\n");
}

#[test]
fn decorate_prints_labels_and_type_names() {
    let dir = TempDir::new().unwrap();
    let file = write_payload(&dir, "query.json", &two_field_query().to_json());

    geomap(dir.path())
        .arg("decorate")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""typeName": "GeoQueryFeatures""#))
        .stdout(predicate::str::contains(r#""label": "FIELD2""#))
        .stdout(predicate::str::contains(r#""typeName": "GeoTerms""#));
}

#[test]
fn payload_can_come_from_stdin() {
    let dir = TempDir::new().unwrap();
    geomap(dir.path())
        .args(["bounds", "--show-all", "-"])
        .write_stdin(two_field_query().to_json())
        .assert()
        .success()
        .stdout("[[0.0,0.0],[6.0,6.0]]\n");
}

#[test]
fn malformed_payload_fails_with_context() {
    let dir = TempDir::new().unwrap();
    let file = write_payload(&dir, "broken.json", r#"{"geoByField": []}"#);

    geomap(dir.path())
        .arg("tree")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken.json"))
        .stderr(predicate::str::contains("GeoQueryFeatures"));
}

#[test]
fn missing_file_fails() {
    let dir = TempDir::new().unwrap();
    geomap(dir.path())
        .args(["tree", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.json"));
}

#[test]
fn reports_fall_back_to_default_prefs_without_a_config_dir() {
    let dir = TempDir::new().unwrap();
    let file = write_payload(&dir, "query.json", &two_field_query().to_json());
    let blocker = write_payload(&dir, "not-a-dir", "");
    let unusable = blocker.join("geomap");

    geomap(&unusable)
        .arg("tree")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("session: Query 1"))
        .stdout(predicate::str::contains("#1976d2"))
        .stderr(predicate::str::contains("using default prefs"));

    geomap(&unusable)
        .args(["bounds", "--show-all"])
        .arg(&file)
        .assert()
        .success()
        .stdout("[[0.0,0.0],[6.0,6.0]]\n");

    geomap(&unusable)
        .arg("prefs")
        .assert()
        .failure()
        .stderr(predicate::str::contains("opening config store"));
}

#[test]
fn prefs_print_defaults_and_reset_overrides() {
    let dir = TempDir::new().unwrap();
    geomap(dir.path())
        .arg("prefs")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Query Lookup \""));

    fs::write(
        dir.path().join("map-prefs.json"),
        r##"{"layerStyle": {"color": "#ff0000"}, "naming": {"query": "Run "}}"##,
    )
    .unwrap();
    let file = write_payload(&dir, "query.json", &two_field_query().to_json());
    geomap(dir.path())
        .arg("tree")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("session: Run 1"))
        .stdout(predicate::str::contains("#ff0000"));

    geomap(dir.path())
        .args(["prefs", "--reset"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#1976d2"));
    assert!(fs::read_to_string(dir.path().join("map-prefs.json"))
        .unwrap()
        .contains("#1976d2"));
}
