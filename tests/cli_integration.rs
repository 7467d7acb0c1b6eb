//! Integration tests for the cfgraph binary.
//!
//! These tests run the CLI against manifests written to temporary
//! directories and check its output and exit status.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const SERVICES: &str = r#"
[[node]]
key = ["app", "root"]

[[node]]
key = ["app", "x"]
properties = { replicas = 2 }

[[node]]
key = ["app", "y"]

[[node]]
key = ["app", "z"]

[[edge]]
parent = ["app", "root"]
child = ["app", "x"]

[[edge]]
parent = ["app", "root"]
child = ["app", "y"]

[[edge]]
parent = ["app", "x"]
child = ["app", "z"]
title = "depends"
"#;

const DANGLING: &str = r#"
[[node]]
key = ["service", "a"]

[[edge]]
parent = ["service", "a"]
child = ["service", "b"]
"#;

/// Get a command for running cfgraph, isolated from user config.
fn cfgraph(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cfgraph").unwrap();
    cmd.env_remove("CFGRAPH_CONFIG")
        .env_remove("CFGRAPH_LOG")
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("xdg"));
    cmd
}

fn manifest(dir: &TempDir, name: &str, text: &str) -> std::path::PathBuf {
    let file = dir.child(name);
    file.write_str(text).unwrap();
    file.path().to_path_buf()
}

#[test]
fn help_flag_works() {
    let dir = TempDir::new().unwrap();
    cfgraph(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("configuration graphs"));
}

#[test]
fn check_accepts_a_valid_manifest() {
    let dir = TempDir::new().unwrap();
    let path = manifest(&dir, "services.toml", SERVICES);
    cfgraph(&dir)
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("ok (4 nodes, 3 edges)"));
}

#[test]
fn check_reports_dangling_edges_with_their_site() {
    let dir = TempDir::new().unwrap();
    let path = manifest(&dir, "dangling.toml", DANGLING);
    cfgraph(&dir)
        .arg("check")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("dangling.toml: edge[0]"))
        .stderr(predicate::str::contains(
            "edge service:a -> service:b references undeclared child node",
        ));
}

#[test]
fn check_json_lists_errors() {
    let dir = TempDir::new().unwrap();
    let path = manifest(&dir, "dangling.toml", DANGLING);
    let output = cfgraph(&dir)
        .args(["--json", "check"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(!output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["ok"], false);
    assert_eq!(report["errors"].as_array().unwrap().len(), 1);
}

#[test]
fn walk_breadth_and_depth() {
    let dir = TempDir::new().unwrap();
    let path = manifest(&dir, "services.toml", SERVICES);

    cfgraph(&dir)
        .arg("walk")
        .arg(&path)
        .arg("app:root")
        .assert()
        .success()
        .stdout("app:root\napp:x\napp:y\napp:z\n");

    cfgraph(&dir)
        .arg("walk")
        .arg(&path)
        .args(["app:root", "--topology", "depth"])
        .assert()
        .success()
        .stdout("app:z\napp:x\napp:y\napp:root\n");
}

#[test]
fn walk_uses_configured_defaults() {
    let dir = TempDir::new().unwrap();
    let path = manifest(&dir, "services.toml", SERVICES);
    let config = dir.child("cfgraph.toml");
    config
        .write_str("[query]\norder = \"~def\"\ntopology = \"breadth\"\n")
        .unwrap();

    cfgraph(&dir)
        .arg("--config")
        .arg(config.path())
        .arg("walk")
        .arg(&path)
        .arg("app:root")
        .assert()
        .success()
        .stdout("app:root\napp:y\napp:x\napp:z\n");
}

#[test]
fn walk_rejects_unknown_order() {
    let dir = TempDir::new().unwrap();
    let path = manifest(&dir, "services.toml", SERVICES);
    cfgraph(&dir)
        .arg("walk")
        .arg(&path)
        .args(["app:root", "--order", "newest"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid order 'newest'"));
}

#[test]
fn children_and_parents() {
    let dir = TempDir::new().unwrap();
    let path = manifest(&dir, "services.toml", SERVICES);

    cfgraph(&dir)
        .arg("children")
        .arg(&path)
        .args(["app:root", "--order", "~key"])
        .assert()
        .success()
        .stdout("app:y\napp:x\n");

    let output = cfgraph(&dir)
        .args(["--json", "parents"])
        .arg(&path)
        .arg("app:z")
        .output()
        .unwrap();
    assert!(output.status.success());
    let parents: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parents[0]["key"], "app:x");
    assert_eq!(parents[0]["properties"]["replicas"], 2);
}

#[test]
fn query_commands_refuse_broken_manifests() {
    let dir = TempDir::new().unwrap();
    let path = manifest(&dir, "dangling.toml", DANGLING);
    cfgraph(&dir)
        .arg("walk")
        .arg(&path)
        .arg("service:a")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to finalize"));
}

#[test]
fn export_emits_graph_document() {
    let dir = TempDir::new().unwrap();
    let path = manifest(&dir, "services.toml", SERVICES);
    let output = cfgraph(&dir).arg("export").arg(&path).output().unwrap();
    assert!(output.status.success());

    let document: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(document["nodes"].as_array().unwrap().len(), 4);
    assert_eq!(document["edges"][2]["title"], "depends");
    assert!(document["edges"][0].get("title").is_none());
}

#[test]
fn config_shows_defaults() {
    let dir = TempDir::new().unwrap();
    cfgraph(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("query.order = def"))
        .stdout(predicate::str::contains("query.topology = breadth"));
}

#[test]
fn completion_generates_script() {
    let dir = TempDir::new().unwrap();
    cfgraph(&dir)
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cfgraph"));
}
