//! `fleetsync import` — render the active fleet and upload it as a new
//! configuration version.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use fleetsync_core::{source::DEFAULT_STATUS_ATTRIBUTE, ImportSettings, InventoryFile};
use fleetsync_sync::{pipeline, ConfigSyncOutcome, ImportMode};

use super::{print_json, TfeArgs};

/// Arguments for `fleetsync import`.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Workspace id that receives the configuration version.
    #[arg(long, env = "TFE_ACCT_IMPORT_WORKSPACE")]
    pub workspace: String,

    /// Base output directory; files land in `<dir>/tf_import`.
    #[arg(long, env = "BASE_OUTPUT_PATH")]
    pub output_dir: PathBuf,

    /// YAML inventory listing the fleet's accounts.
    #[arg(long, env = "ACCT_INVENTORY_FILE")]
    pub inventory: PathBuf,

    /// Inventory attribute that marks an account as active.
    #[arg(long, env = "ACCT_STATUS_ATTRIBUTE", default_value = DEFAULT_STATUS_ATTRIBUTE)]
    pub status_attribute: String,

    /// Directory of `.tera` templates overriding the built-in one.
    #[arg(long)]
    pub template_dir: Option<PathBuf>,

    /// Template to render instead of the default.
    #[arg(long)]
    pub template: Option<String>,

    /// Render and archive only; make no API calls.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the outcome as JSON.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub tfe: TfeArgs,
}

impl ImportArgs {
    pub fn run(self) -> Result<()> {
        let mut settings = ImportSettings::new(self.workspace.as_str(), &self.output_dir);
        settings.template_dir = self.template_dir.clone();
        settings.template_name = self.template.clone();

        let source =
            InventoryFile::new(&self.inventory).with_status_attribute(&self.status_attribute);
        let api = self.tfe.client();
        let mode = if self.dry_run {
            ImportMode::DryRun
        } else {
            ImportMode::Upload
        };

        let outcome = pipeline::run(&source, &api, &settings, mode)
            .with_context(|| format!("import into workspace '{}' failed", self.workspace))?;

        if self.json {
            print_json(&outcome)
        } else {
            print_outcome(&outcome, self.dry_run);
            Ok(())
        }
    }
}

fn print_outcome(outcome: &ConfigSyncOutcome, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    println!("{prefix}✓ rendered {} account(s)", outcome.account_count);
    println!("  ✎  {}", outcome.rendered_path.display());
    println!("  ✎  {}", outcome.archive_path.display());
    for entry in &outcome.archive_entries {
        println!("  ·  {entry}");
    }
    if let Some(id) = &outcome.configuration_version_id {
        println!(
            "✓ uploaded configuration version {id} (status {})",
            outcome.status_code.unwrap_or_default()
        );
    }
}
