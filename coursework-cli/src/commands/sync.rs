//! The sync run: resolve secrets, pick a target, reconcile and write.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use coursework_clients::{CanvasClient, ClientError, NotionClient};
use coursework_core::{CredentialStore, Credentials};
use coursework_sync::{RunOptions, SyncError, SyncReport};

use crate::prompt::TerminalPrompt;
use crate::select;

const CONFIG_DIR_HINT: &str = "pass --config-dir to choose where secrets are stored";

/// Arguments for a sync run.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Show what would be created or updated without writing to Notion.
    #[arg(long)]
    pub dry_run: bool,

    /// Directory holding the cached secret files
    /// (defaults to `<config dir>/coursework`).
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}

impl SyncArgs {
    /// Errors are reported on stderr; the process still exits normally.
    pub async fn run(self) -> Result<()> {
        match self.execute().await {
            Ok(report) => print_report(&report),
            Err(err) => report_error(&err),
        }
        Ok(())
    }

    async fn execute(&self) -> Result<SyncReport> {
        let store = match &self.config_dir {
            Some(dir) => CredentialStore::new(dir, TerminalPrompt),
            None => CredentialStore::from_default_dir(TerminalPrompt)
                .context(CONFIG_DIR_HINT)?,
        };
        tracing::debug!(dir = %store.dir().display(), "credential store");
        let creds = Credentials::load(&store)?;

        let canvas = CanvasClient::new(&creds.canvas_url, creds.canvas_key)
            .context("failed to build the Canvas client")?;
        let notion =
            NotionClient::new(creds.notion_key).context("failed to build the Notion client")?;
        tracing::debug!(canvas = canvas.base_url(), "clients ready");

        let selection = select::run(&canvas, &notion).await?;
        if selection.courses.is_empty() {
            tracing::warn!("no courses selected; nothing will be fetched");
        }

        let options = RunOptions {
            dry_run: self.dry_run,
        };
        Ok(coursework_sync::run(&canvas, &notion, &selection, options).await?)
    }
}

fn print_report(report: &SyncReport) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };
    let (created, updated) = if report.dry_run {
        ("would create", "would update")
    } else {
        ("created", "updated")
    };

    println!(
        "{prefix}{} Sync complete: {} {created}, {} {updated}, {} unchanged",
        "✓".green().bold(),
        report.created,
        report.updated,
        report.unchanged,
    );
    tracing::debug!(
        fetched = report.fetched_assignments,
        existing = report.existing_entries,
        "pass finished"
    );
    if report.skipped_sentinel > 0 {
        tracing::info!("skipped {} placeholder assignments", report.skipped_sentinel);
    }
    if report.skipped_without_id > 0 {
        tracing::info!("skipped {} assignments without an id", report.skipped_without_id);
    }
}

fn report_error(err: &anyhow::Error) {
    let label = if is_notion_error(err) {
        "Notion error:"
    } else {
        "error:"
    };
    eprintln!("{} {label} {err:#}", "✗".red().bold());
}

/// Walks the cause chain looking for a failure raised by the Notion client.
fn is_notion_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        if let Some(sync) = cause.downcast_ref::<SyncError>() {
            sync.is_notion()
        } else if let Some(client) = cause.downcast_ref::<ClientError>() {
            client.is_notion()
        } else {
            false
        }
    })
}
