//! CLI integration tests
//!
//! Exercises the argument surface of both binaries and the bootstrap flow of
//! `reel-feed-init` against a temporary database file.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_server_version_flag() {
    let mut cmd = cargo_bin_cmd!("reel-feed");
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_server_help_flag() {
    let mut cmd = cargo_bin_cmd!("reel-feed");
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--host"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_server_rejects_invalid_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("config.toml");
    std::fs::write(&config, "[server\nport = ").unwrap();

    let mut cmd = cargo_bin_cmd!("reel-feed");
    cmd.current_dir(temp_dir.path());
    cmd.args(["--config", config.to_str().unwrap()]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_init_help_flag() {
    let mut cmd = cargo_bin_cmd!("reel-feed-init");
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--seed"))
        .stdout(predicate::str::contains("--check"));
}

#[test]
fn test_init_check_reports_sqlite_version() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("check.db");
    let url = format!("sqlite://{}", db_path.display());

    let mut cmd = cargo_bin_cmd!("reel-feed-init");
    cmd.current_dir(temp_dir.path());
    cmd.args(["--check", "--database-url", &url]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Database connection OK"));
}

#[test]
fn test_init_seeds_once() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("reels.db");
    let url = format!("sqlite://{}", db_path.display());

    let mut first = cargo_bin_cmd!("reel-feed-init");
    first.current_dir(temp_dir.path());
    first.args(["--seed", "--database-url", &url]);
    first
        .assert()
        .success()
        .stdout(predicate::str::contains("Inserted 5 sample reels"));

    assert!(db_path.exists());

    let mut second = cargo_bin_cmd!("reel-feed-init");
    second.current_dir(temp_dir.path());
    second.args(["--seed", "--database-url", &url]);
    second
        .assert()
        .success()
        .stdout(predicate::str::contains("skipping sample data"))
        .stdout(predicate::str::contains("catalog reels: 5"));
}

#[test]
fn test_init_check_conflicts_with_seed() {
    let mut cmd = cargo_bin_cmd!("reel-feed-init");
    cmd.args(["--check", "--seed"]);

    cmd.assert().failure();
}
