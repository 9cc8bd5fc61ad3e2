//! Subcommands and the connection flags they share.

pub mod import;
pub mod registry;
pub mod update;

use std::path::PathBuf;

use clap::Args;
use fleetsync_core::{settings::DEFAULT_TFE_BASE_URL, EnvSecret, FileSecret, TfeSettings};
use fleetsync_tfe::TfeClient;

/// Where the TFE API lives and how to find the bearer token.
#[derive(Args, Debug, Clone)]
pub struct TfeArgs {
    /// TFE API root.
    #[arg(long, env = "TFE_BASE_URL", default_value = DEFAULT_TFE_BASE_URL)]
    pub base_url: String,

    /// Environment variable holding the API token.
    #[arg(long, env = "TFE_AUTH_TOKEN_SECRET", default_value = "TFE_AUTH_TOKEN")]
    pub token_env: String,

    /// Read the API token from this file instead of the environment.
    #[arg(long, env = "TFE_AUTH_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,
}

impl TfeArgs {
    /// The token is resolved on each request, so building a client never fails.
    pub fn client(&self) -> TfeClient {
        let settings = TfeSettings {
            base_url: self.base_url.clone(),
        };
        match &self.token_file {
            Some(path) => TfeClient::new(&settings, FileSecret::new(path)),
            None => TfeClient::new(&settings, EnvSecret::new(&self.token_env)),
        }
    }
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
