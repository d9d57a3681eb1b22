use std::path::Path;
use std::process::{Command, Stdio};

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn coursework_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("coursework"));
    cmd.env("HOME", home)
        .env("USERPROFILE", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_flags() {
    let home = TempDir::new().expect("home");
    coursework_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--dry-run"))
        .stdout(contains("--config-dir"));
}

#[test]
fn version_is_printed() {
    let home = TempDir::new().expect("home");
    coursework_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_flag_is_rejected() {
    let home = TempDir::new().expect("home");
    coursework_cmd(home.path())
        .arg("--all")
        .assert()
        .failure()
        .stderr(contains("--all"));
}

#[test]
fn missing_secret_without_terminal_is_reported_and_not_saved() {
    let home = TempDir::new().expect("home");
    let config = TempDir::new().expect("config");

    coursework_cmd(home.path())
        .arg("--config-dir")
        .arg(config.path())
        .stdin(Stdio::null())
        .assert()
        .success()
        .stderr(contains("notion.key"))
        .stderr(contains("✗"));

    assert!(!config.path().join("notion.key").exists());
    assert!(!config.path().join("canvas.key").exists());
}

#[test]
fn blank_cached_secret_counts_as_missing() {
    let home = TempDir::new().expect("home");
    let config = TempDir::new().expect("config");
    std::fs::write(config.path().join("notion.key"), "  \n").expect("seed blank key");

    coursework_cmd(home.path())
        .arg("--config-dir")
        .arg(config.path())
        .arg("--dry-run")
        .stdin(Stdio::null())
        .assert()
        .success()
        .stderr(contains("notion.key").and(contains("cancelled")));

    let contents = std::fs::read_to_string(config.path().join("notion.key")).expect("read key");
    assert_eq!(contents, "  \n", "a failed prompt must not touch the file");
}
