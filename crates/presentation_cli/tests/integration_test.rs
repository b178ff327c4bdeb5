//! Integration tests for the CLI
//!
//! These tests run the built binary in a scratch directory and inspect its
//! JSON output.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::{path::Path, process::Command};

use serde_json::Value;

fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_moderation-cli"));
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("MODERATION_CONFIG")
        .env("MODERATION_DATABASE__URL", "sqlite::memory:")
        .env("MODERATION_DATABASE__MAX_CONNECTIONS", "1")
        .env("MODERATION_DATABASE__WAL_MODE", "false");
    cmd
}

fn run_json(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("failed to run moderation-cli");
    assert!(
        output.status.success(),
        "moderation-cli failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn normalize_collapses_stretched_words() {
    let dir = tempfile::tempdir().unwrap();
    let json = run_json(cli(dir.path()).args(["normalize", "  super!!!!!  "]));
    assert_eq!(json["text"], "super!!");
}

#[test]
fn simplify_replaces_formal_words() {
    let dir = tempfile::tempdir().unwrap();
    let json = run_json(cli(dir.path()).args(["simplify", "Međutim, kasnimo."]));
    assert_eq!(json["text"], "Ali, kasnimo.");
}

#[test]
fn pii_masks_email_and_warns() {
    let dir = tempfile::tempdir().unwrap();
    let json = run_json(cli(dir.path()).args(["pii", "pišite na marko@example.com"]));

    assert_eq!(json["result"]["detected"], true);
    assert_eq!(json["result"]["masked"], "pišite na [EMAIL]");
    assert!(json["warning"].as_str().unwrap().contains("email"));
}

#[test]
fn check_dry_run_reports_decision_and_age() {
    let dir = tempfile::tempdir().unwrap();
    let json = run_json(cli(dir.path()).args([
        "check",
        "ubiću te",
        "--age",
        "12",
        "--dry-run",
    ]));

    assert_eq!(json["severity"], "critical");
    assert_eq!(json["decision"]["action"], "flag");
    assert_eq!(json["age"]["appropriate"], false);
    assert!(json.get("record_id").is_none());
}

#[test]
fn check_writes_record_for_blocked_content() {
    let dir = tempfile::tempdir().unwrap();
    let json = run_json(cli(dir.path()).args(["check", "niko te ne voli"]));

    assert_eq!(json["decision"]["action"], "block");
    assert!(json["record_id"].is_string());
}

#[test]
fn validate_tiers_summarizes_table() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("tiers.json");
    std::fs::write(
        &table,
        r#"{"version":"t-9","terms":[{"term":"otrov","tier":"violence"}],
            "patterns":[{"name":"go_away","pattern":"(?i)\\bidi odavde\\b","tier":"bullying"}]}"#,
    )
    .unwrap();

    let json = run_json(cli(dir.path()).args(["validate-tiers", table.to_str().unwrap()]));
    assert_eq!(json["version"], "t-9");
    assert_eq!(json["terms"], 1);
    assert_eq!(json["patterns"], 1);
}

#[test]
fn validate_tiers_rejects_bad_regex() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("tiers.json");
    std::fs::write(
        &table,
        r#"{"version":"t-9","patterns":[{"name":"broken","pattern":"(unclosed","tier":"bullying"}]}"#,
    )
    .unwrap();

    let output = cli(dir.path())
        .args(["validate-tiers", table.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn review_rejects_pending_status() {
    let dir = tempfile::tempdir().unwrap();
    let output = cli(dir.path())
        .args([
            "review",
            "00000000-0000-4000-8000-000000000000",
            "--reviewer",
            "00000000-0000-4000-8000-000000000001",
            "--role",
            "teacher",
            "--status",
            "pending",
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid status"));
}

#[test]
fn invalid_log_filter_is_rejected_by_validation() {
    let dir = tempfile::tempdir().unwrap();
    let output = cli(dir.path())
        .env("MODERATION_LOGGING__FILTER", "moderation=loud")
        .args(["normalize", "zdravo"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid logging.filter"));
}
