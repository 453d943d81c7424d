//! Sync planner
//!
//! Turns a local and a remote listing, each annotated with modification
//! times, into exactly one [`SyncAction`] per file.
//!
//! ## Decision rule
//!
//! | local | remote | action |
//! |-------|--------|--------|
//! | yes   | no     | Upload |
//! | no    | yes    | Download |
//! | yes   | yes    | Download if remote is strictly newer, Upload otherwise |
//!
//! Equal modification times favor the local copy.
//!
//! The planner performs no I/O. Both listings are first folded into ordered
//! maps keyed by local path (last entry wins on a duplicate), then merged in
//! a single pass. The resulting [`SyncPlan`] is immutable.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use pcsync_core::domain::{epoch, LocalEntry, PathMapper, RemoteEntry, RemotePath, SyncPath};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::SyncError;

// ============================================================================
// SyncAction
// ============================================================================

/// What to do with one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SyncAction {
    /// Copy the local file to the remote store
    Upload { local: SyncPath, remote: RemotePath },
    /// Copy the remote file to the local filesystem
    Download { remote: RemotePath, local: SyncPath },
    /// Nothing to transfer
    NoOp,
}

impl SyncAction {
    /// Short lower-case name of the action
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Upload { .. } => "upload",
            Self::Download { .. } => "download",
            Self::NoOp => "noop",
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upload { local, remote } => write!(f, "Upload {local} to {remote}"),
            Self::Download { remote, local } => write!(f, "Download {remote} to {local}"),
            Self::NoOp => write!(f, "Nothing to do"),
        }
    }
}

// ============================================================================
// PlanEntry / SyncPlan
// ============================================================================

/// An action together with the signals it was decided from
///
/// A side without an entry contributes the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanEntry {
    pub action: SyncAction,
    pub local_signal: DateTime<Utc>,
    pub remote_signal: DateTime<Utc>,
}

/// One action per distinct file, ordered by local path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncPlan {
    entries: BTreeMap<SyncPath, PlanEntry>,
}

impl SyncPlan {
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the entry for a local path
    #[must_use]
    pub fn get(&self, local: &SyncPath) -> Option<&PlanEntry> {
        self.entries.get(local)
    }

    /// Entries in local path order
    pub fn iter(&self) -> impl Iterator<Item = (&SyncPath, &PlanEntry)> {
        self.entries.iter()
    }

    /// Number of planned uploads
    #[must_use]
    pub fn uploads(&self) -> usize {
        self.count(|a| matches!(a, SyncAction::Upload { .. }))
    }

    /// Number of planned downloads
    #[must_use]
    pub fn downloads(&self) -> usize {
        self.count(|a| matches!(a, SyncAction::Download { .. }))
    }

    fn count(&self, pred: impl Fn(&SyncAction) -> bool) -> usize {
        self.entries.values().filter(|e| pred(&e.action)).count()
    }
}

impl<'a> IntoIterator for &'a SyncPlan {
    type Item = (&'a SyncPath, &'a PlanEntry);
    type IntoIter = std::collections::btree_map::Iter<'a, SyncPath, PlanEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ============================================================================
// SyncPlanner
// ============================================================================

/// Pure decision engine for one sync root
#[derive(Debug, Clone)]
pub struct SyncPlanner {
    mapper: PathMapper,
}

impl SyncPlanner {
    pub fn new(mapper: PathMapper) -> Self {
        Self { mapper }
    }

    pub fn mapper(&self) -> &PathMapper {
        &self.mapper
    }

    /// Build the plan for one run
    ///
    /// # Errors
    /// Returns [`SyncError::InvalidPath`] if a local entry lies outside the
    /// sync root or a remote entry lies outside `/<sync_name>/`.
    #[instrument(skip_all, fields(local = local.len(), remote = remote.len()))]
    pub fn plan(&self, local: &[LocalEntry], remote: &[RemoteEntry]) -> Result<SyncPlan, SyncError> {
        // Pass 1: index both sides by local path.
        let mut local_side: BTreeMap<SyncPath, (RemotePath, DateTime<Utc>)> = BTreeMap::new();
        for entry in local {
            let target = self.mapper.local_to_remote(&entry.path)?;
            local_side.insert(entry.path.clone(), (target, entry.signal));
        }

        let mut remote_side: BTreeMap<SyncPath, (RemotePath, DateTime<Utc>)> = BTreeMap::new();
        for entry in remote {
            let key = self.mapper.remote_to_local(&entry.path)?;
            remote_side.insert(key, (entry.path.clone(), entry.signal));
        }

        // Pass 2: merge.
        let mut entries = BTreeMap::new();
        for (path, (target, local_signal)) in &local_side {
            let entry = match remote_side.remove(path) {
                Some((source, remote_signal)) if remote_signal > *local_signal => PlanEntry {
                    action: SyncAction::Download {
                        remote: source,
                        local: path.clone(),
                    },
                    local_signal: *local_signal,
                    remote_signal,
                },
                Some((source, remote_signal)) => PlanEntry {
                    action: SyncAction::Upload {
                        local: path.clone(),
                        remote: source,
                    },
                    local_signal: *local_signal,
                    remote_signal,
                },
                None => PlanEntry {
                    action: SyncAction::Upload {
                        local: path.clone(),
                        remote: target.clone(),
                    },
                    local_signal: *local_signal,
                    remote_signal: epoch(),
                },
            };
            entries.insert(path.clone(), entry);
        }

        for (path, (source, remote_signal)) in remote_side {
            entries.insert(
                path.clone(),
                PlanEntry {
                    action: SyncAction::Download {
                        remote: source,
                        local: path,
                    },
                    local_signal: epoch(),
                    remote_signal,
                },
            );
        }

        let plan = SyncPlan { entries };
        debug!(
            uploads = plan.uploads(),
            downloads = plan.downloads(),
            "Sync plan built"
        );
        Ok(plan)
    }
}
