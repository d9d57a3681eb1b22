//! Coursework: mirror Canvas assignments into a Notion database.
//!
//! # Usage
//!
//! ```text
//! coursework [--dry-run] [--config-dir <DIR>] [-v]
//! ```
//!
//! The run is interactive: missing secrets are asked for once and cached,
//! then the target database and the courses to sync are picked from prompts.

mod commands;
mod prompt;
mod select;

use anyhow::Result;
use clap::Parser;

use commands::sync::SyncArgs;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "coursework",
    version,
    about = "Sync Canvas assignments into a Notion database",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    sync: SyncArgs,

    /// Log debug output (overridden by RUST_LOG).
    #[arg(long, short = 'v')]
    verbose: bool,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    cli.sync.run().await
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
