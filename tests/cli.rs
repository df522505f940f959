//! CLI surface tests.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_promote_command() {
    let mut cmd = Command::cargo_bin("promover").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("promote"));
}

#[test]
fn test_promote_requires_experiment_and_model() {
    let mut cmd = Command::cargo_bin("promover").unwrap();
    cmd.arg("promote")
        .env_remove("S3_BUCKET_NAME")
        .env_remove("GITOPS_REPO_URL")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--experiment"));
}

#[test]
fn test_promote_fails_cleanly_when_registry_is_unreachable() {
    let mut cmd = Command::cargo_bin("promover").unwrap();
    cmd.args([
        "promote",
        "--experiment",
        "E",
        "--model",
        "m",
        "--bucket",
        "bucket",
        "--repo",
        "https://example.invalid/gitops.git",
        "--registry-url",
        "http://127.0.0.1:1",
        "--timeout",
        "2",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("resolve"));
}
