//! `fleetsync registry` — print the registry stored in the workspace variable.

use anyhow::{bail, Context, Result};
use clap::Args;
use fleetsync_core::MergeSettings;
use fleetsync_sync::merge;

use super::{print_json, TfeArgs};

/// Arguments for `fleetsync registry`.
#[derive(Args, Debug)]
pub struct RegistryArgs {
    #[arg(long)]
    pub organization: String,

    #[arg(long)]
    pub workspace: String,

    /// Key of the registry variable.
    #[arg(long, env = "TFE_IMPORT_VAR_NAME")]
    pub var_name: String,

    #[command(flatten)]
    pub tfe: TfeArgs,
}

impl RegistryArgs {
    pub fn run(self) -> Result<()> {
        let settings = MergeSettings {
            organization: self.organization.as_str().into(),
            workspace: self.workspace.as_str().into(),
            variable_key: self.var_name.clone(),
        };
        let api = self.tfe.client();

        let found = merge::read_registry(&api, &settings).with_context(|| {
            format!("reading registry from {}/{} failed", self.organization, self.workspace)
        })?;
        let Some((_, registry)) = found else {
            bail!(
                "no variable '{}' in {}/{}",
                self.var_name,
                self.organization,
                self.workspace
            );
        };
        print_json(&registry)
    }
}
