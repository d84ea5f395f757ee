//! Integration tests for the bundlectl binary.
//!
//! These tests exercise the actual compiled binary using assert_cmd.

use std::fs;

use assert_cmd::Command;
use bundle_test_utils::{BundleDir, JarBuilder};
use predicates::prelude::*;
use tempfile::TempDir;

/// A bundlectl command isolated from the caller's environment.
fn bundlectl(cwd: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_bundlectl"));
    cmd.current_dir(cwd.path())
        .env_remove("BUNDLE_WATCH_DIR")
        .env_remove("BUNDLE_CONFIG")
        .env_remove("BUNDLE_CATALOG")
        .env_remove("RUST_LOG");
    cmd
}

fn populated() -> BundleDir {
    let dir = BundleDir::new();
    dir.write_jar("A.jar", &JarBuilder::new().export("util.io;version=\"1.0.0\""));
    dir.write_jar(
        "B.jar",
        &JarBuilder::new()
            .import("util.io;version=\"[1.0.0,2.0.0)\"")
            .import("log.api;version=\"[3.0,4.0)\""),
    );
    dir.write_bytes("README.txt", b"not an archive");
    dir
}

// ============================================================================
// Help
// ============================================================================

#[test]
fn test_help_output() {
    let cwd = tempfile::tempdir().unwrap();
    bundlectl(&cwd)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bundle registry"));
}

#[test]
fn test_missing_command_fails() {
    let cwd = tempfile::tempdir().unwrap();
    bundlectl(&cwd).assert().failure();
}

// ============================================================================
// scan
// ============================================================================

#[test]
fn test_scan_lists_bundles_and_writes_catalog() {
    let cwd = tempfile::tempdir().unwrap();
    let dir = populated();
    let catalog = cwd.path().join("out").join("catalog.json");

    bundlectl(&cwd)
        .args(["scan", "--dir"])
        .arg(dir.path())
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("A.jar (1 exports, 0 imports)"))
        .stdout(predicate::str::contains("B.jar (0 exports, 2 imports)"))
        .stdout(predicate::str::contains("README.txt").not());

    let text = fs::read_to_string(&catalog).unwrap();
    assert!(text.contains("\"util.io\""), "catalog was:\n{text}");
}

#[test]
fn test_scan_empty_directory_writes_empty_catalog() {
    let cwd = tempfile::tempdir().unwrap();
    let dir = BundleDir::new();
    let catalog = cwd.path().join("catalog.toml");

    bundlectl(&cwd)
        .args(["scan", "--dir"])
        .arg(dir.path())
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .success()
        .stdout("");

    assert!(catalog.is_file());
}

#[test]
fn test_scan_missing_directory() {
    let cwd = tempfile::tempdir().unwrap();
    bundlectl(&cwd)
        .args(["scan", "--dir", "no-such-dir"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bundle directory not found"));
}

#[test]
fn test_scan_reads_config_file() {
    let cwd = tempfile::tempdir().unwrap();
    let dir = populated();
    let catalog = cwd.path().join("from-config.yaml");
    let config = cwd.path().join("service.toml");
    fs::write(
        &config,
        format!(
            "watch_dir = {:?}\ncatalog_path = {:?}\n",
            dir.path().display().to_string(),
            catalog.display().to_string()
        ),
    )
    .unwrap();

    bundlectl(&cwd)
        .args(["scan", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("A.jar"));

    assert!(catalog.is_file());
}

#[test]
fn test_explicit_missing_config_fails() {
    let cwd = tempfile::tempdir().unwrap();
    bundlectl(&cwd)
        .args(["scan", "--config", "absent.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration not found"));
}

// ============================================================================
// resolve
// ============================================================================

#[test]
fn test_resolve_finds_provider() {
    let cwd = tempfile::tempdir().unwrap();
    let dir = populated();

    bundlectl(&cwd)
        .args(["resolve", "util.io", "--range", "[1.0.0,2.0.0)", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::ends_with("A.jar\n"));
}

#[test]
fn test_resolve_without_range_matches_any_version() {
    let cwd = tempfile::tempdir().unwrap();
    let dir = populated();

    bundlectl(&cwd)
        .args(["resolve", "util.io", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("A.jar"));
}

#[test]
fn test_resolve_unresolved_exits_one() {
    let cwd = tempfile::tempdir().unwrap();
    let dir = populated();

    bundlectl(&cwd)
        .args(["resolve", "util.io", "--range", "[2.0.0,3.0.0)", "--dir"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stdout("none\n");
}

#[test]
fn test_resolve_rejects_malformed_range() {
    let cwd = tempfile::tempdir().unwrap();
    let dir = populated();

    bundlectl(&cwd)
        .args(["resolve", "util.io", "--range", "[x,y)", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// ============================================================================
// imports
// ============================================================================

#[test]
fn test_imports_report() {
    let cwd = tempfile::tempdir().unwrap();
    let dir = populated();

    bundlectl(&cwd)
        .args(["imports", "B.jar", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("log.api [3.0,4.0) -> none"))
        .stdout(predicate::str::is_match(r"util\.io \[1\.0\.0,2\.0\.0\) -> .*A\.jar").unwrap());
}

#[test]
fn test_imports_of_unregistered_archive() {
    let cwd = tempfile::tempdir().unwrap();
    let dir = populated();

    bundlectl(&cwd)
        .args(["imports", "README.txt", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a registered bundle"));
}
