//! Sync executor
//!
//! Applies a [`SyncPlan`] through the store ports, one action at a time.
//! A failed transfer is recorded in the [`ExecutionLog`] and the run goes
//! on with the next action. In dry-run mode neither store is touched.

use std::sync::Arc;

use pcsync_core::domain::{RemotePath, SyncPath};
use pcsync_core::ports::{ILocalStore, IRemoteStore, StoreError};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::planner::{SyncAction, SyncPlan};

// ============================================================================
// ExecutionLog
// ============================================================================

/// Result of applying a single action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    /// Reported only; dry-run mode
    DryRun,
    /// The transfer finished
    Completed,
    /// `NoOp` action
    Skipped,
    /// The transfer failed; the rest of the plan still ran
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionRecord {
    pub action: SyncAction,
    pub outcome: Outcome,
}

/// Per-action record of one run, in plan order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionLog {
    records: Vec<ExecutionRecord>,
}

impl ExecutionLog {
    #[must_use]
    pub fn records(&self) -> &[ExecutionRecord] {
        &self.records
    }

    /// Completed uploads
    #[must_use]
    pub fn uploaded(&self) -> usize {
        self.count(|r| {
            matches!(r.action, SyncAction::Upload { .. }) && r.outcome == Outcome::Completed
        })
    }

    /// Completed downloads
    #[must_use]
    pub fn downloaded(&self) -> usize {
        self.count(|r| {
            matches!(r.action, SyncAction::Download { .. }) && r.outcome == Outcome::Completed
        })
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|r| r.outcome == Outcome::Skipped)
    }

    /// Actions only reported because of dry-run mode
    #[must_use]
    pub fn reported(&self) -> usize {
        self.count(|r| r.outcome == Outcome::DryRun)
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|r| matches!(r.outcome, Outcome::Failed(_)))
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// Failed actions with their reasons
    pub fn failures(&self) -> impl Iterator<Item = (&SyncAction, &str)> {
        self.records.iter().filter_map(|r| match &r.outcome {
            Outcome::Failed(reason) => Some((&r.action, reason.as_str())),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&ExecutionRecord) -> bool) -> usize {
        self.records.iter().filter(|r| pred(r)).count()
    }
}

// ============================================================================
// SyncExecutor
// ============================================================================

/// Applies plans against a remote and a local store
pub struct SyncExecutor {
    remote: Arc<dyn IRemoteStore>,
    local: Arc<dyn ILocalStore>,
}

impl SyncExecutor {
    pub fn new(remote: Arc<dyn IRemoteStore>, local: Arc<dyn ILocalStore>) -> Self {
        Self { remote, local }
    }

    /// Apply every action of `plan` in order
    ///
    /// Never fails as a whole; inspect [`ExecutionLog::failures`].
    #[instrument(skip_all, fields(actions = plan.len(), dry_run = dry_run))]
    pub async fn execute(&self, plan: &SyncPlan, dry_run: bool) -> ExecutionLog {
        let mut records = Vec::with_capacity(plan.len());

        for (_, entry) in plan {
            let action = &entry.action;
            if !matches!(action, SyncAction::NoOp) {
                debug!("{action}");
            }

            let outcome = if dry_run {
                Outcome::DryRun
            } else {
                match self.apply(action).await {
                    Ok(true) => Outcome::Completed,
                    Ok(false) => Outcome::Skipped,
                    Err(err) => {
                        warn!(%err, "{action} failed");
                        Outcome::Failed(err.to_string())
                    }
                }
            };

            records.push(ExecutionRecord {
                action: action.clone(),
                outcome,
            });
        }

        let log = ExecutionLog { records };
        info!(
            uploaded = log.uploaded(),
            downloaded = log.downloaded(),
            failed = log.failed(),
            dry_run,
            "Sync run finished"
        );
        log
    }

    /// Returns `Ok(false)` for an action with nothing to transfer
    async fn apply(&self, action: &SyncAction) -> Result<bool, StoreError> {
        match action {
            SyncAction::Upload { local, remote } => self.upload(local, remote).await.map(|()| true),
            SyncAction::Download { remote, local } => {
                self.download(remote, local).await.map(|()| true)
            }
            SyncAction::NoOp => Ok(false),
        }
    }

    async fn download(&self, remote: &RemotePath, local: &SyncPath) -> Result<(), StoreError> {
        let data = self.remote.read(remote).await?;
        self.local.write_atomic(local, &data).await?;
        debug!(bytes = data.len(), "Download complete");
        Ok(())
    }

    /// Upload, creating missing remote parents and retrying once
    async fn upload(&self, local: &SyncPath, remote: &RemotePath) -> Result<(), StoreError> {
        let data = self.local.read(local).await?;

        match self.remote.write(remote, &data).await {
            Err(StoreError::ParentMissing(folder)) => {
                let parent = remote
                    .parent()
                    .ok_or_else(|| StoreError::ParentMissing(folder.clone()))?;
                debug!(parent = %parent, "Creating missing remote folders");
                self.remote.make_parents(&parent).await?;
                self.remote.write(remote, &data).await?;
            }
            result => result?,
        }

        debug!(bytes = data.len(), "Upload complete");
        Ok(())
    }
}
