//! Workspace configuration sync: render → archive → create configuration
//! version → upload.
//!
//! Each step runs only if the previous one succeeded. The first failure is
//! logged and returned unchanged; nothing is retried or rolled back. An upload
//! failure therefore leaves an empty configuration version on the server.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use fleetsync_core::{AccountSource, ImportSettings};
use fleetsync_renderer::Renderer;
use fleetsync_tfe::models::{self, ConfigurationVersion};
use fleetsync_tfe::{Method, TfeApi};

use crate::archive;
use crate::error::{io_err, SyncError};

/// Whether the run talks to TFE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Full run: render, archive, create configuration version, upload.
    Upload,
    /// Render and archive only; no API calls.
    DryRun,
}

/// Outcome of a successful import run.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSyncOutcome {
    pub account_count: usize,
    pub rendered_path: PathBuf,
    pub archive_path: PathBuf,
    pub archive_entries: Vec<String>,
    /// `None` in dry-run mode.
    pub configuration_version_id: Option<String>,
    /// Upload status; always 200 on success, `None` in dry-run mode.
    pub status_code: Option<u16>,
    pub completed_at: DateTime<Utc>,
}

/// Rendered and archived configuration, ready to upload.
#[derive(Debug, Clone)]
pub struct PreparedConfiguration {
    pub account_count: usize,
    pub rendered_path: PathBuf,
    pub archive_path: PathBuf,
    pub archive_entries: Vec<String>,
}

/// Log a step failure with context, then convert it.
fn step<T, E>(name: &'static str, result: Result<T, E>) -> Result<T, SyncError>
where
    E: Into<SyncError>,
{
    result.map_err(|e| {
        let e = e.into();
        tracing::error!(step = name, "import aborted: {e}");
        e
    })
}

/// Steps 1–3: fetch accounts, render, archive.
pub fn prepare_configuration(
    source: &dyn AccountSource,
    settings: &ImportSettings,
) -> Result<PreparedConfiguration, SyncError> {
    let accounts = step("fetch-accounts", source.active_accounts())?;
    tracing::info!(accounts = accounts.len(), "fetched active accounts");

    let renderer = step(
        "render",
        Renderer::with_templates(settings.template_dir.as_deref(), settings.template_name.as_deref()),
    )?;
    let rendered_path = settings.rendered_path();
    tracing::debug!(template = renderer.template_name(), "rendering import configuration");
    step("render", renderer.render_to(&accounts, &rendered_path))?;

    let archive_path = settings.archive_path();
    step(
        "archive",
        archive::archive(&archive_path, &settings.render_dir, &[settings.rendered_file.as_str()]),
    )?;
    let archive_entries = step("archive", archive::list_entries(&archive_path))?;

    Ok(PreparedConfiguration {
        account_count: accounts.len(),
        rendered_path,
        archive_path,
        archive_entries,
    })
}

/// Step 4: create an auto-queued configuration version; returns its id and
/// upload URL.
pub fn create_configuration_version(
    api: &dyn TfeApi,
    settings: &ImportSettings,
) -> Result<(String, String), SyncError> {
    let endpoint = format!("workspaces/{}/configuration-versions", settings.workspace);
    let body = models::create_configuration_version_body(true);
    let response = step(
        "create-configuration-version",
        api.call(Method::Post, &endpoint, &[], Some(&body)),
    )?;
    let version: ConfigurationVersion = step(
        "create-configuration-version",
        models::decode_data(&endpoint, response),
    )?;
    let Some(upload_url) = version.attributes.upload_url else {
        let e = SyncError::MissingUploadUrl {
            configuration_version: version.id,
        };
        tracing::error!(step = "create-configuration-version", "import aborted: {e}");
        return Err(e);
    };
    tracing::info!(
        workspace = %settings.workspace,
        configuration_version = %version.id,
        status = version.attributes.status.as_deref().unwrap_or("unknown"),
        "created configuration version"
    );
    Ok((version.id, upload_url))
}

/// Step 5: PUT the archive to the pre-signed URL. Only 200 is success.
pub fn upload_archive(
    api: &dyn TfeApi,
    upload_url: &str,
    prepared: &PreparedConfiguration,
) -> Result<u16, SyncError> {
    let bytes = step(
        "upload",
        std::fs::read(&prepared.archive_path).map_err(|e| io_err(&prepared.archive_path, e)),
    )?;
    let status = step("upload", api.upload(upload_url, &bytes))?;
    if status != 200 {
        let e = SyncError::Upload { status };
        tracing::error!(
            step = "upload",
            url = %fleetsync_tfe::redact_url(upload_url),
            bytes = bytes.len(),
            "import aborted: {e}"
        );
        return Err(e);
    }
    tracing::info!(status, bytes = bytes.len(), "uploaded configuration archive");
    Ok(status)
}

/// Run the import pipeline.
///
/// `api` is not touched in [`ImportMode::DryRun`].
pub fn run(
    source: &dyn AccountSource,
    api: &dyn TfeApi,
    settings: &ImportSettings,
    mode: ImportMode,
) -> Result<ConfigSyncOutcome, SyncError> {
    let prepared = prepare_configuration(source, settings)?;

    let (configuration_version_id, status_code) = match mode {
        ImportMode::DryRun => {
            tracing::info!("[dry-run] skipping configuration version upload");
            (None, None)
        }
        ImportMode::Upload => {
            let (id, upload_url) = create_configuration_version(api, settings)?;
            let status = upload_archive(api, &upload_url, &prepared)?;
            (Some(id), Some(status))
        }
    };

    Ok(ConfigSyncOutcome {
        account_count: prepared.account_count,
        rendered_path: prepared.rendered_path,
        archive_path: prepared.archive_path,
        archive_entries: prepared.archive_entries,
        configuration_version_id,
        status_code,
        completed_at: Utc::now(),
    })
}
