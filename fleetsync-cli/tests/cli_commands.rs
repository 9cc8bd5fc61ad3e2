//! Binary-level behaviour: argument handling, dry runs, and error reporting.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

const INVENTORY: &str = r#"
- acct_id: "111111111111"
  acct_email: ops@example.com
  acct_name: ops
  acct_status: active
- acct_id: "222222222222"
  acct_email: legacy@example.com
  acct_name: legacy
  acct_status: suspended
"#;

/// Unreachable API root; every request fails at connect time.
const DEAD_API: &str = "http://127.0.0.1:1/api/v2";

fn fleetsync_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fleetsync"));
    for var in [
        "TFE_ACCT_IMPORT_WORKSPACE",
        "BASE_OUTPUT_PATH",
        "ACCT_INVENTORY_FILE",
        "ACCT_STATUS_ATTRIBUTE",
        "TFE_IMPORT_VAR_NAME",
        "TFE_BASE_URL",
        "TFE_AUTH_TOKEN",
        "TFE_AUTH_TOKEN_SECRET",
        "TFE_AUTH_TOKEN_FILE",
        "FLEETSYNC_JSON_LOGS",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("RUST_LOG", "warn");
    cmd
}

fn write_inventory(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("inventory.yaml");
    fs::write(&path, INVENTORY).unwrap();
    path
}

// ---------------------------------------------------------------------------
// import
// ---------------------------------------------------------------------------

#[test]
fn import_dry_run_renders_and_archives_without_token() {
    let dir = TempDir::new().unwrap();
    let inventory = write_inventory(dir.path());
    let out = dir.path().join("out");

    fleetsync_cmd()
        .args(["import", "--dry-run", "--workspace", "ws-abc"])
        .arg("--output-dir")
        .arg(&out)
        .arg("--inventory")
        .arg(&inventory)
        .env("TFE_BASE_URL", DEAD_API)
        .assert()
        .success()
        .stdout(contains("[dry-run] ✓ rendered 1 account(s)"))
        .stdout(contains("import_accounts.tf"));

    let rendered = fs::read_to_string(out.join("tf_import").join("import_accounts.tf")).unwrap();
    assert!(rendered.contains("111111111111"));
    assert!(!rendered.contains("222222222222"));
    assert!(out.join("tf_import").join("import_accounts.tar.gz").exists());
}

#[test]
fn import_reads_settings_from_environment_and_prints_json() {
    let dir = TempDir::new().unwrap();
    let inventory = write_inventory(dir.path());

    let output = fleetsync_cmd()
        .args(["import", "--dry-run", "--json"])
        .env("TFE_ACCT_IMPORT_WORKSPACE", "ws-env")
        .env("BASE_OUTPUT_PATH", dir.path())
        .env("ACCT_INVENTORY_FILE", &inventory)
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let outcome: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(outcome["account_count"], 1);
    assert_eq!(outcome["archive_entries"], serde_json::json!(["import_accounts.tf"]));
    assert!(outcome["configuration_version_id"].is_null());
}

#[test]
fn import_without_token_fails_before_upload() {
    let dir = TempDir::new().unwrap();
    let inventory = write_inventory(dir.path());

    fleetsync_cmd()
        .args(["import", "--workspace", "ws-abc", "--base-url", DEAD_API])
        .arg("--output-dir")
        .arg(dir.path())
        .arg("--inventory")
        .arg(&inventory)
        .assert()
        .failure()
        .stderr(contains("TFE_AUTH_TOKEN").and(contains("not set")));
}

#[test]
fn import_with_missing_inventory_names_the_file() {
    let dir = TempDir::new().unwrap();

    fleetsync_cmd()
        .args(["import", "--dry-run", "--workspace", "ws-abc"])
        .arg("--output-dir")
        .arg(dir.path())
        .arg("--inventory")
        .arg(dir.path().join("absent.yaml"))
        .assert()
        .failure()
        .stderr(contains("absent.yaml"));
}

// ---------------------------------------------------------------------------
// update / registry
// ---------------------------------------------------------------------------

#[test]
fn update_without_account_fields_fails() {
    fleetsync_cmd()
        .args([
            "update",
            "--organization",
            "acme",
            "--workspace",
            "accounts",
            "--var-name",
            "tfe_import_accounts",
        ])
        .assert()
        .failure()
        .stderr(contains("--acct-id is required"));
}

#[test]
fn update_from_event_file_reports_transport_error() {
    let dir = TempDir::new().unwrap();
    let event = dir.path().join("event.json");
    fs::write(
        &event,
        r#"{"tfe_orginization_name":"acme","tfe_workspace":"accounts",
            "acct_describe":{"results":{"acct_id":"1","acct_email":"a@x.com","acct_name":"A"}}}"#,
    )
    .unwrap();
    let token = dir.path().join("token");
    fs::write(&token, "secret-token\n").unwrap();

    fleetsync_cmd()
        .args(["update", "--var-name", "tfe_import_accounts", "--base-url", DEAD_API])
        .arg("--event")
        .arg(&event)
        .arg("--token-file")
        .arg(&token)
        .assert()
        .failure()
        .stderr(contains("merging account 1 into acme/accounts failed"))
        .stderr(contains("transport error"))
        .stderr(contains("secret-token").not());
}

#[test]
fn registry_against_unreachable_api_fails() {
    fleetsync_cmd()
        .args([
            "registry",
            "--organization",
            "acme",
            "--workspace",
            "accounts",
            "--var-name",
            "tfe_import_accounts",
            "--base-url",
            DEAD_API,
        ])
        .env("TFE_AUTH_TOKEN", "t")
        .assert()
        .failure()
        .stderr(contains("reading registry from acme/accounts failed"));
}
