//! Configuration sync orchestrator: step ordering, failure propagation, and
//! the end-to-end success path.

mod common;

use std::fs;
use std::path::Path;

use fleetsync_core::{AccountRecord, ImportSettings, StaticAccounts};
use fleetsync_sync::{archive, pipeline, ImportMode, SyncError};
use fleetsync_tfe::{Method, TfeError};
use serde_json::json;
use tempfile::TempDir;

use common::{api_error, FakeTfe};

const UPLOAD_URL: &str = "https://archivist.example/v1/object/presigned-token";

fn fleet() -> StaticAccounts {
    StaticAccounts(vec![
        AccountRecord::new("1", "a@x.com", "A"),
        AccountRecord::new("2", "b@y.com", "B"),
    ])
}

fn settings(out: &Path) -> ImportSettings {
    ImportSettings::new("ws-abc123", out)
}

fn created_response() -> serde_json::Value {
    json!({
        "data": {
            "id": "cv-42",
            "type": "configuration-versions",
            "attributes": {"upload-url": UPLOAD_URL, "status": "pending"}
        }
    })
}

// ---------------------------------------------------------------------------
// 1. Happy path
// ---------------------------------------------------------------------------

#[test]
fn end_to_end_upload_succeeds() {
    let out = TempDir::new().unwrap();
    let settings = settings(out.path());
    let api = FakeTfe::new(200, |_| Ok(created_response()));

    let outcome = pipeline::run(&fleet(), &api, &settings, ImportMode::Upload).expect("import");

    // rendered file lists both accounts in source order
    let rendered = fs::read_to_string(settings.rendered_path()).unwrap();
    let first = rendered.find(r#"id = "1""#).expect("account 1 rendered");
    let second = rendered.find(r#"id = "2""#).expect("account 2 rendered");
    assert!(first < second);

    // archive holds exactly one flat entry
    assert_eq!(outcome.archive_entries, vec!["import_accounts.tf".to_string()]);
    assert_eq!(
        archive::list_entries(&settings.archive_path()).unwrap(),
        vec!["import_accounts.tf".to_string()]
    );

    // one POST with the wire body, then one upload of the archive bytes
    let posts = api.calls_with(Method::Post);
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].endpoint, "workspaces/ws-abc123/configuration-versions");
    assert_eq!(
        posts[0].body,
        Some(json!({"data":{"type":"configuration-versions","attributes":{"auto-queue-runs":"true"}}}))
    );
    let uploads = api.uploads.borrow();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].0, UPLOAD_URL);
    assert_eq!(uploads[0].1, fs::read(settings.archive_path()).unwrap());

    assert_eq!(outcome.account_count, 2);
    assert_eq!(outcome.configuration_version_id.as_deref(), Some("cv-42"));
    assert_eq!(outcome.status_code, Some(200));
}

#[test]
fn rerun_regenerates_from_current_accounts() {
    let out = TempDir::new().unwrap();
    let settings = settings(out.path());
    let api = FakeTfe::new(200, |_| Ok(created_response()));

    pipeline::run(&fleet(), &api, &settings, ImportMode::Upload).unwrap();
    let shrunk = StaticAccounts(vec![AccountRecord::new("2", "b@y.com", "B")]);
    let outcome = pipeline::run(&shrunk, &api, &settings, ImportMode::Upload).unwrap();

    let rendered = fs::read_to_string(settings.rendered_path()).unwrap();
    assert!(!rendered.contains(r#"id = "1""#));
    assert_eq!(outcome.account_count, 1);
    assert_eq!(api.uploads.borrow().len(), 2);
}

// ---------------------------------------------------------------------------
// 2. Failures
// ---------------------------------------------------------------------------

#[test]
fn create_422_is_api_error_and_skips_upload() {
    let out = TempDir::new().unwrap();
    let api = FakeTfe::new(200, |call| Err(api_error(call.method, &call.endpoint, 422)));

    let err = pipeline::run(&fleet(), &api, &settings(out.path()), ImportMode::Upload).unwrap_err();

    match err {
        SyncError::Tfe(TfeError::Api { status, .. }) => assert_eq!(status, 422),
        other => panic!("expected TFE API error, got {other:?}"),
    }
    assert!(api.uploads.borrow().is_empty(), "upload must not be attempted");
}

#[test]
fn upload_500_is_upload_error_without_retry() {
    let out = TempDir::new().unwrap();
    let api = FakeTfe::new(500, |_| Ok(created_response()));

    let err = pipeline::run(&fleet(), &api, &settings(out.path()), ImportMode::Upload).unwrap_err();

    assert!(matches!(err, SyncError::Upload { status: 500 }), "got: {err}");
    assert_eq!(api.uploads.borrow().len(), 1, "upload must not be retried");
    assert_eq!(api.calls.borrow().len(), 1, "no compensating API call");
}

#[test]
fn non_200_success_status_is_still_an_upload_error() {
    let out = TempDir::new().unwrap();
    let api = FakeTfe::new(201, |_| Ok(created_response()));

    let err = pipeline::run(&fleet(), &api, &settings(out.path()), ImportMode::Upload).unwrap_err();

    assert!(matches!(err, SyncError::Upload { status: 201 }), "got: {err}");
}

#[test]
fn missing_upload_url_aborts_before_upload() {
    let out = TempDir::new().unwrap();
    let api = FakeTfe::new(200, |_| {
        Ok(json!({"data": {"id": "cv-9", "type": "configuration-versions", "attributes": {}}}))
    });

    let err = pipeline::run(&fleet(), &api, &settings(out.path()), ImportMode::Upload).unwrap_err();

    assert!(
        matches!(&err, SyncError::MissingUploadUrl { configuration_version } if configuration_version == "cv-9"),
        "got: {err}"
    );
    assert!(api.uploads.borrow().is_empty());
}

#[test]
fn render_failure_makes_no_api_call() {
    let out = TempDir::new().unwrap();
    let broken = StaticAccounts(vec![AccountRecord::new("1", "", "A")]);
    let api = FakeTfe::untouchable();

    let err = pipeline::run(&broken, &api, &settings(out.path()), ImportMode::Upload).unwrap_err();

    assert!(matches!(err, SyncError::Render(_)), "got: {err}");
    assert!(api.uploads.borrow().is_empty());
}

#[test]
fn missing_template_makes_no_api_call() {
    let out = TempDir::new().unwrap();
    let mut settings = settings(out.path());
    settings.template_name = Some("nope.tera".to_string());
    let api = FakeTfe::untouchable();

    let err = pipeline::run(&fleet(), &api, &settings, ImportMode::Upload).unwrap_err();

    assert!(matches!(err, SyncError::Render(_)), "got: {err}");
}

// ---------------------------------------------------------------------------
// 3. Dry run
// ---------------------------------------------------------------------------

#[test]
fn dry_run_renders_and_archives_without_api_calls() {
    let out = TempDir::new().unwrap();
    let settings = settings(out.path());
    let api = FakeTfe::untouchable();

    let outcome = pipeline::run(&fleet(), &api, &settings, ImportMode::DryRun).unwrap();

    assert!(settings.rendered_path().exists());
    assert!(settings.archive_path().exists());
    assert!(outcome.configuration_version_id.is_none());
    assert!(outcome.status_code.is_none());
    assert!(api.uploads.borrow().is_empty());
}
