//! Integration tests for the bundle-index binary.

use assert_cmd::Command;
use bundle_test_utils::inventory::TestInventory;
use predicates::prelude::*;

fn bundle_index(inv: &TestInventory) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("bundle-index"));
    cmd.current_dir(inv.root())
        .env_remove("BUNDLE_INDEX_DEBUG")
        .env_remove("BUNDLE_INDEX_ROOT")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn widget_inventory() -> TestInventory {
    let inv = TestInventory::new();
    inv.add_bundle(
        "dependencies/org.example.widget/widget-1.0.0.jar",
        "org.example.widget",
        "1.0.0",
    );
    inv.add_bundle(
        "dependencies/org.example.widget/widget-1.2.0.jar",
        "org.example.widget",
        "1.2.0",
    );
    inv
}

#[test]
fn test_help_output() {
    let inv = TestInventory::new();
    bundle_index(&inv)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("index"))
        .stdout(predicate::str::contains("release"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_index_writes_documents() {
    let inv = widget_inventory();

    bundle_index(&inv)
        .arg("index")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote index.xml"));

    inv.assert_file_exists("index.xml");
    inv.assert_file_exists("index.xml.gz");
    inv.assert_file_exists("index.xml.sha");
    inv.assert_file_exists("dependencies/org.example.widget/maven-metadata.xml");
}

#[test]
fn test_missing_inventory_exits_nonzero() {
    let inv = TestInventory::new();

    bundle_index(&inv)
        .args(["index", "nowhere"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Inventory directory not found"));
}

#[test]
fn test_invalid_config_exits_nonzero() {
    let inv = widget_inventory();
    inv.write_file("bundle-index.toml", b"extractors = []\n");

    bundle_index(&inv)
        .arg("index")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_forced_index_reports_json() {
    let inv = widget_inventory();

    bundle_index(&inv)
        .args(["index", "--force", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"strategy\": \"forced\""))
        .stdout(predicate::str::contains("\"regenerated\": 2"));
}

#[test]
fn test_dry_run_prints_diff_only() {
    let inv = widget_inventory();

    bundle_index(&inv)
        .args(["index", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+++ index.xml"))
        .stdout(predicate::str::contains("No files written"));

    inv.assert_file_not_exists("index.xml");
}

#[test]
fn test_release_uses_release_inventory() {
    let inv = TestInventory::new();
    inv.add_bundle("release/org.example.core/core-2.0.jar", "org.example.core", "2.0");

    bundle_index(&inv).arg("release").assert().success();

    inv.assert_file_exists("release-index.xml");
    inv.assert_file_not_exists("index.xml");
}

#[test]
fn test_list_shows_latest_version() {
    let inv = widget_inventory();
    bundle_index(&inv).arg("index").assert().success();

    bundle_index(&inv)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("org.example.widget"))
        .stdout(predicate::str::contains("1.2.0"))
        .stdout(predicate::str::contains("(2 versions)"));
}

#[test]
fn test_list_without_index_fails() {
    let inv = TestInventory::new();

    bundle_index(&inv)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No index"));
}

#[test]
fn test_root_flag_selects_repository() {
    let inv = widget_inventory();
    let elsewhere = TestInventory::new();

    bundle_index(&elsewhere)
        .args(["--root", inv.root().to_str().unwrap(), "index"])
        .assert()
        .success();

    inv.assert_file_exists("index.xml");
    elsewhere.assert_file_not_exists("index.xml");
}

#[test]
fn test_debug_toggle_logs_detection_counts() {
    let inv = widget_inventory();

    bundle_index(&inv)
        .arg("index")
        .env("BUNDLE_INDEX_DEBUG", "1")
        .assert()
        .success()
        .stderr(predicate::str::contains("Detected changes"));
}

#[test]
fn test_default_run_is_quiet_on_stderr() {
    let inv = widget_inventory();

    bundle_index(&inv)
        .arg("index")
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}
