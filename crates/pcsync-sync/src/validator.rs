//! Hash validator
//!
//! Compares `(relative_path, content_hash)` listings of both sides. Every
//! path of the symmetric difference of the two pair sets lands in exactly one
//! category of the [`ValidationReport`]; a path with the same hash on both
//! sides never appears.

use std::collections::BTreeSet;
use std::sync::Arc;

use pcsync_core::domain::{DigestAlgorithm, HashEntry, RelativePath, RemotePath, SyncPath};
use pcsync_core::ports::{ILocalStore, IRemoteStore};
use serde::Serialize;
use tracing::{info, instrument};

use crate::listing::hash_remote_tree;
use crate::SyncError;

pub const LOCAL_ONLY_LABEL: &str = "Files present locally but missing in cloud";
pub const REMOTE_ONLY_LABEL: &str = "Files present remote but missing locally";
pub const HASH_MISMATCH_LABEL: &str = "Files with wrong hash";

/// Differences between a local and a remote tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub local_only: BTreeSet<RelativePath>,
    pub remote_only: BTreeSet<RelativePath>,
    pub hash_mismatch: BTreeSet<RelativePath>,
}

impl ValidationReport {
    /// True when both trees hold the same files with the same content
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.len() == 0
    }

    /// Total number of differing paths
    #[must_use]
    pub fn len(&self) -> usize {
        self.local_only.len() + self.remote_only.len() + self.hash_mismatch.len()
    }

    /// The three categories with their labels, in display order
    #[must_use]
    pub fn sections(&self) -> [(&'static str, &BTreeSet<RelativePath>); 3] {
        [
            (LOCAL_ONLY_LABEL, &self.local_only),
            (REMOTE_ONLY_LABEL, &self.remote_only),
            (HASH_MISMATCH_LABEL, &self.hash_mismatch),
        ]
    }
}

/// Classify the differences between two hash listings
pub fn validate(local: &[HashEntry], remote: &[HashEntry]) -> ValidationReport {
    let local_pairs: BTreeSet<_> = local.iter().map(|e| (&e.path, &e.signal)).collect();
    let remote_pairs: BTreeSet<_> = remote.iter().map(|e| (&e.path, &e.signal)).collect();
    let local_paths: BTreeSet<&RelativePath> = local.iter().map(|e| &e.path).collect();
    let remote_paths: BTreeSet<&RelativePath> = remote.iter().map(|e| &e.path).collect();

    let mut report = ValidationReport::default();
    for (path, _) in local_pairs.symmetric_difference(&remote_pairs) {
        let target = match (local_paths.contains(path), remote_paths.contains(path)) {
            (true, true) => &mut report.hash_mismatch,
            (true, false) => &mut report.local_only,
            (false, _) => &mut report.remote_only,
        };
        target.insert((*path).clone());
    }
    report
}

/// Runs [`validate`] over a local tree and a remote tree
pub struct Validator {
    remote: Arc<dyn IRemoteStore>,
    local: Arc<dyn ILocalStore>,
    algorithm: DigestAlgorithm,
}

impl Validator {
    pub fn new(
        remote: Arc<dyn IRemoteStore>,
        local: Arc<dyn ILocalStore>,
        algorithm: DigestAlgorithm,
    ) -> Self {
        Self {
            remote,
            local,
            algorithm,
        }
    }

    /// Hash both trees and compare them
    ///
    /// # Errors
    /// [`SyncError::NotFound`] if either root does not exist
    #[instrument(skip(self), fields(local_root = %local_root, remote_root = %remote_root))]
    pub async fn run(
        &self,
        local_root: &SyncPath,
        remote_root: &RemotePath,
    ) -> Result<ValidationReport, SyncError> {
        let local = self.local.hash_all(local_root).await?;
        let remote = hash_remote_tree(self.remote.as_ref(), remote_root, self.algorithm).await?;

        let report = validate(&local, &remote);
        info!(
            local_files = local.len(),
            remote_files = remote.len(),
            local_only = report.local_only.len(),
            remote_only = report.remote_only.len(),
            hash_mismatch = report.hash_mismatch.len(),
            "Validation finished"
        );
        Ok(report)
    }
}
