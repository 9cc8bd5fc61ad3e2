//! fleetsync — sync the active account fleet into a Terraform Enterprise workspace.
//!
//! # Usage
//!
//! ```text
//! fleetsync import [--dry-run] [--json]
//! fleetsync update --event <event.json> [--json]
//! fleetsync update --organization <org> --workspace <name> --acct-id <id> --acct-email <email> --acct-name <name>
//! fleetsync registry --organization <org> --workspace <name>
//! ```
//!
//! Every flag falls back to the environment variable named in `--help`.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{import::ImportArgs, registry::RegistryArgs, update::UpdateArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "fleetsync",
    version,
    about = "Sync fleet accounts into a Terraform Enterprise workspace",
    long_about = None,
)]
struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, env = "FLEETSYNC_JSON_LOGS")]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render active accounts, upload them as a configuration version.
    Import(ImportArgs),

    /// Merge one account into the registry workspace variable.
    Update(UpdateArgs),

    /// Print the registry currently stored in the workspace variable.
    Registry(RegistryArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);
    tracing::debug!(command = ?cli.command, "parsed arguments");
    match cli.command {
        Commands::Import(args) => args.run(),
        Commands::Update(args) => args.run(),
        Commands::Registry(args) => args.run(),
    }
}

/// Logs go to stderr; stdout carries command output only.
fn init_tracing(json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
