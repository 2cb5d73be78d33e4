use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn logdiff_cmd(cwd: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("logdiff"));
    cmd.current_dir(cwd)
        .env("NO_COLOR", "1")
        .env("CLICOLOR", "0")
        .env("XDG_CONFIG_HOME", cwd.join(".config"))
        .env_remove("RUST_LOG");
    cmd
}

fn write_pair(dir: &Path, pre: &str, post: &str) {
    fs::write(dir.join("pre.log"), pre).expect("write pre");
    fs::write(dir.join("post.log"), post).expect("write post");
}

#[test]
fn compare_prints_side_by_side_and_stats() {
    let dir = TempDir::new().expect("dir");
    write_pair(dir.path(), "a\nb\nc\n", "a\nc\nd\n");

    logdiff_cmd(dir.path())
        .args(["compare", "pre.log", "post.log"])
        .assert()
        .success()
        .stdout(contains("2 difference(s): 1 added, 1 deleted, 0 changed"))
        .stdout(contains("- b"))
        .stdout(contains("+ d"));
}

#[test]
fn compare_json_is_machine_readable() {
    let dir = TempDir::new().expect("dir");
    write_pair(dir.path(), "a\nb\nc\n", "a\nc\nd\n");

    let assert = logdiff_cmd(dir.path())
        .args(["compare", "pre.log", "post.log", "--json"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout utf8");
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid json");

    assert_eq!(json["stats"]["total"], 2);
    assert_eq!(json["stats"]["added"], 1);
    assert_eq!(json["stats"]["deleted"], 1);
    assert_eq!(json["stats"]["changed"], 0);
    let left = json["left"].as_array().expect("left rows");
    let right = json["right"].as_array().expect("right rows");
    assert_eq!(left.len(), right.len());
    assert_eq!(left[1]["kind"], "deleted");
    assert_eq!(right[1]["kind"], "empty");
}

#[test]
fn identical_files_report_no_differences() {
    let dir = TempDir::new().expect("dir");
    write_pair(dir.path(), "same\n", "same\n");

    logdiff_cmd(dir.path())
        .args(["compare", "pre.log", "post.log"])
        .assert()
        .success()
        .stdout(contains("no differences"));
}

#[test]
fn changes_only_hides_identical_rows() {
    let dir = TempDir::new().expect("dir");
    write_pair(dir.path(), "keep-me\nold\n", "keep-me\nnew\n");

    logdiff_cmd(dir.path())
        .args(["compare", "pre.log", "post.log", "--changes-only"])
        .assert()
        .success()
        .stdout(contains("keep-me").not())
        .stdout(contains("identical line(s) hidden"));
}

#[test]
fn missing_file_fails_without_partial_output() {
    let dir = TempDir::new().expect("dir");
    fs::write(dir.path().join("pre.log"), "a\n").expect("write pre");

    logdiff_cmd(dir.path())
        .args(["compare", "pre.log", "post.log"])
        .assert()
        .failure()
        .stdout("")
        .stderr(contains("source not found"));
}

#[test]
fn compare_needs_two_paths_or_sample() {
    let dir = TempDir::new().expect("dir");
    logdiff_cmd(dir.path())
        .args(["compare", "pre.log"])
        .assert()
        .failure();
}

#[test]
fn compare_sample_uses_bundled_logs() {
    let dir = TempDir::new().expect("dir");
    logdiff_cmd(dir.path())
        .args(["compare", "--sample"])
        .assert()
        .success()
        .stdout(contains("sample_preCheck.log"))
        .stdout(contains("difference(s)"));
}

#[test]
fn sample_prints_requested_side() {
    let dir = TempDir::new().expect("dir");
    logdiff_cmd(dir.path())
        .args(["sample", "pre"])
        .assert()
        .success()
        .stdout(contains("show version"))
        .stdout(contains("17.03.04a"));
    logdiff_cmd(dir.path())
        .args(["sample", "post"])
        .assert()
        .success()
        .stdout(contains("17.06.05"));
}

#[test]
fn explicit_missing_config_is_an_error() {
    let dir = TempDir::new().expect("dir");
    write_pair(dir.path(), "a\n", "a\n");

    logdiff_cmd(dir.path())
        .args(["--config", "absent.yaml", "compare", "pre.log", "post.log"])
        .assert()
        .failure()
        .stderr(contains("failed to load configuration"));
}

#[test]
fn local_config_file_is_picked_up() {
    let dir = TempDir::new().expect("dir");
    write_pair(dir.path(), "keep-me\nold\n", "keep-me\nnew\n");
    fs::write(dir.path().join("logdiff.yaml"), "report:\n  changes_only: true\n")
        .expect("write config");

    logdiff_cmd(dir.path())
        .args(["compare", "pre.log", "post.log"])
        .assert()
        .success()
        .stdout(contains("keep-me").not());
}
