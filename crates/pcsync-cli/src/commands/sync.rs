//! Sync command - Two-way synchronization of one folder with pCloud
//!
//! Provides the `pcsync sync` CLI command which:
//! 1. Resolves the local root and maps it to `/<sync_name>` on pCloud
//! 2. Loads the access token from the settings file
//! 3. Lists both sides and plans one action per file (newest side wins)
//! 4. Applies the plan, or only reports it with `--dry-run`

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use pcsync_core::config::Config;
use pcsync_core::domain::{PathMapper, SyncPath};
use pcsync_core::ports::ILocalStore;
use pcsync_sync::executor::{ExecutionLog, Outcome, SyncExecutor};
use pcsync_sync::listing::list_remote_tree;
use pcsync_sync::planner::SyncPlanner;
use tracing::info;

use super::{resolve_local_root, CliContext};
use crate::output::{plural, OutputFormatter};

/// Synchronize a local folder with its mirror on pCloud
#[derive(Debug, Args)]
pub struct SyncCommand {
    /// Local folder to synchronize
    pub local_path: PathBuf,

    /// Show what would be done without making changes
    #[arg(long)]
    pub dry_run: bool,

    /// Credential settings file (JSON with an `access_token`)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Remote folder name (defaults to the local folder's name)
    #[arg(long)]
    pub sync_name: Option<String>,
}

impl SyncCommand {
    /// `--sync-name` wins over `sync.sync_name`; otherwise the root's own name
    fn mapper(&self, root: SyncPath, config: &Config) -> Result<PathMapper> {
        let sync_name = self
            .sync_name
            .clone()
            .or_else(|| config.sync.sync_name.clone());
        Ok(match sync_name {
            Some(name) => PathMapper::with_sync_name(root, name)?,
            None => PathMapper::new(root)?,
        })
    }

    pub async fn execute(&self, ctx: &CliContext) -> Result<ExitCode> {
        let formatter = ctx.formatter();

        if !self.local_path.exists() {
            formatter.error(&format!("Can't access {}", self.local_path.display()));
            return Ok(ExitCode::FAILURE);
        }

        let mapper = self.mapper(resolve_local_root(&self.local_path)?, &ctx.config)?;
        info!(
            local = %mapper.root(),
            remote = %mapper.remote_root(),
            dry_run = self.dry_run,
            "Starting sync"
        );

        let remote = Arc::new(ctx.remote_store(self.settings.as_deref())?);
        let local = Arc::new(ctx.local_store());

        if self.dry_run && !ctx.is_json() {
            formatter.line("Test run: no changes will be applied!");
        }

        let local_entries = local
            .list(mapper.root())
            .await
            .with_context(|| format!("Failed to list {}", mapper.root()))?;
        let remote_entries = list_remote_tree(remote.as_ref(), mapper.remote_root())
            .await
            .with_context(|| format!("Failed to list {}", mapper.remote_root()))?;

        let plan = SyncPlanner::new(mapper).plan(&local_entries, &remote_entries)?;
        let log = SyncExecutor::new(remote, local)
            .execute(&plan, self.dry_run)
            .await;

        if ctx.is_json() {
            formatter.print_json(&serde_json::json!({
                "dry_run": self.dry_run,
                "records": log.records(),
                "uploaded": log.uploaded(),
                "downloaded": log.downloaded(),
                "failed": log.failed(),
            }));
        } else {
            print_log(formatter.as_ref(), &log, self.dry_run);
        }

        Ok(if log.has_failures() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        })
    }
}

fn print_log(formatter: &dyn OutputFormatter, log: &ExecutionLog, dry_run: bool) {
    for record in log.records() {
        match &record.outcome {
            Outcome::Skipped => {}
            Outcome::Failed(reason) => {
                formatter.error(&format!("{} failed: {reason}", record.action));
            }
            Outcome::DryRun | Outcome::Completed => formatter.line(&record.action.to_string()),
        }
    }

    if dry_run {
        let n = log.reported();
        formatter.success(&format!("{n} action{} would be applied", plural(n)));
        return;
    }

    let (up, down) = (log.uploaded(), log.downloaded());
    let summary = format!(
        "{up} file{} uploaded, {down} file{} downloaded",
        plural(up),
        plural(down)
    );
    if log.has_failures() {
        let n = log.failed();
        formatter.warn(&format!("{summary}, {n} transfer{} failed", plural(n)));
    } else {
        formatter.success(&summary);
    }
}
