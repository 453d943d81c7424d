//! Validate command - Compare a local tree with a remote tree by content hash

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use pcsync_core::domain::RemotePath;
use pcsync_sync::validator::{ValidationReport, Validator};

use super::{resolve_local_root, CliContext};
use crate::output::{plural, OutputFormatter};

/// Report files that differ between a local folder and a pCloud folder
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Local folder to hash
    pub local_root: PathBuf,

    /// Remote folder to compare against, e.g. `/photos`
    pub remote_root: String,

    /// Credential settings file (JSON with an `access_token`)
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

impl ValidateCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<ExitCode> {
        let formatter = ctx.formatter();

        let local_root = resolve_local_root(&self.local_root)?;
        let remote_root = RemotePath::new(self.remote_root.clone())?;
        let remote = Arc::new(ctx.remote_store(self.settings.as_deref())?);
        let local = Arc::new(ctx.local_store());

        let report = Validator::new(remote, local, ctx.config.validation.digest)
            .run(&local_root, &remote_root)
            .await
            .with_context(|| format!("Failed to validate {local_root} against {remote_root}"))?;

        if ctx.is_json() {
            formatter.print_json(&serde_json::to_value(&report)?);
        } else {
            print_report(formatter.as_ref(), &report);
        }

        Ok(if report.is_clean() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }
}

fn print_report(formatter: &dyn OutputFormatter, report: &ValidationReport) {
    for (label, paths) in report.sections() {
        formatter.line(label);
        for path in paths {
            formatter.line(&format!("\t{path}"));
        }
    }

    if report.is_clean() {
        formatter.success("Local and remote trees match");
    } else {
        let n = report.len();
        formatter.warn(&format!("{n} file{} differ", plural(n)));
    }
}
