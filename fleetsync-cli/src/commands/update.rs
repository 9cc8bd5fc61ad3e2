//! `fleetsync update` — merge one account into the registry workspace variable.
//!
//! Input comes from an event file, from flags, or both; flags win.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use fleetsync_core::{AccountRecord, MergeSettings};
use fleetsync_sync::{merge, MergeOutcome};
use serde::Deserialize;

use super::{print_json, TfeArgs};

/// Arguments for `fleetsync update`.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// JSON event describing the account and its target workspace.
    #[arg(long)]
    pub event: Option<PathBuf>,

    /// Organization owning the workspace.
    #[arg(long)]
    pub organization: Option<String>,

    /// Workspace holding the registry variable.
    #[arg(long)]
    pub workspace: Option<String>,

    /// Key of the registry variable.
    #[arg(long, env = "TFE_IMPORT_VAR_NAME")]
    pub var_name: String,

    #[arg(long)]
    pub acct_id: Option<String>,

    #[arg(long)]
    pub acct_email: Option<String>,

    #[arg(long)]
    pub acct_name: Option<String>,

    /// Print the outcome as JSON.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub tfe: TfeArgs,
}

// ---------------------------------------------------------------------------
// Event file
// ---------------------------------------------------------------------------

/// Account-created event as delivered by the account vending workflow.
#[derive(Debug, Default, Deserialize)]
pub struct AccountEvent {
    #[serde(rename = "tfe_orginization_name", alias = "tfe_organization_name")]
    pub organization: Option<String>,
    #[serde(rename = "tfe_workspace")]
    pub workspace: Option<String>,
    #[serde(default)]
    pub acct_describe: AccountDescribe,
}

#[derive(Debug, Default, Deserialize)]
pub struct AccountDescribe {
    #[serde(default)]
    pub results: AccountResults,
}

#[derive(Debug, Default, Deserialize)]
pub struct AccountResults {
    pub acct_id: Option<String>,
    pub acct_email: Option<String>,
    pub acct_name: Option<String>,
}

pub fn read_event(path: &Path) -> Result<AccountEvent> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read event file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("event file {} is not a valid event", path.display()))
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

impl UpdateArgs {
    pub fn run(self) -> Result<()> {
        let (settings, record) = self.resolve()?;
        let api = self.tfe.client();

        let outcome = merge::merge_account(&api, &settings, &record).with_context(|| {
            format!(
                "merging account {} into {}/{} failed",
                record.id, settings.organization, settings.workspace
            )
        })?;

        if self.json {
            return print_json(&outcome);
        }
        match &outcome {
            MergeOutcome::Patched {
                variable_id,
                registry,
            } => println!(
                "✓ account {} merged into {variable_id} ({} entries)",
                record.id,
                registry.len()
            ),
            MergeOutcome::VariableNotFound { key, scanned } => println!(
                "· no variable '{key}' among {scanned} in {}/{}; nothing patched",
                settings.organization, settings.workspace
            ),
        }
        Ok(())
    }

    /// Combine the event file (if any) with flags into run inputs.
    pub fn resolve(&self) -> Result<(MergeSettings, AccountRecord)> {
        let event = match &self.event {
            Some(path) => read_event(path)?,
            None => AccountEvent::default(),
        };
        let results = event.acct_describe.results;

        let organization = pick(&self.organization, event.organization, "--organization")?;
        let workspace = pick(&self.workspace, event.workspace, "--workspace")?;
        let acct_id = pick(&self.acct_id, results.acct_id, "--acct-id")?;
        let acct_email = pick(&self.acct_email, results.acct_email, "--acct-email")?;
        let acct_name = pick(&self.acct_name, results.acct_name, "--acct-name")?;

        let settings = MergeSettings {
            organization: organization.into(),
            workspace: workspace.into(),
            variable_key: self.var_name.clone(),
        };
        Ok((settings, AccountRecord::new(acct_id, acct_email, acct_name)))
    }
}

fn pick(flag: &Option<String>, from_event: Option<String>, name: &str) -> Result<String> {
    flag.clone()
        .or(from_event)
        .with_context(|| format!("{name} is required (flag or event file)"))
}
