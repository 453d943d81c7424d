//! Mapping between the local sync root and its remote mirror
//!
//! A local root such as `/home/ana/Photos` is mirrored remotely under
//! `/<sync_name>/`, where the sync name defaults to the root's own directory
//! name (`Photos`). Every file strictly inside the root has exactly one
//! remote counterpart and vice versa.

use super::errors::DomainError;
use super::newtypes::{RemotePath, SyncPath};

/// Translates paths between the local root and the remote namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMapper {
    root: SyncPath,
    sync_name: String,
    remote_root: RemotePath,
}

impl PathMapper {
    /// Create a mapper whose sync name is the root's directory name
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPath` if the root has no name (e.g. `/`)
    pub fn new(root: SyncPath) -> Result<Self, DomainError> {
        let name = root
            .file_name()
            .ok_or_else(|| {
                DomainError::InvalidPath(format!("Sync root has no directory name: {root}"))
            })?
            .to_string();
        Self::with_sync_name(root, name)
    }

    /// Create a mapper with an explicit sync name
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPath` if the name is empty or not a
    /// single path component
    pub fn with_sync_name(root: SyncPath, sync_name: impl Into<String>) -> Result<Self, DomainError> {
        let sync_name = sync_name.into();
        let remote_root = RemotePath::root()
            .join(&sync_name)
            .map_err(|_| DomainError::InvalidPath(format!("Invalid sync name: {sync_name:?}")))?;

        Ok(Self {
            root,
            sync_name,
            remote_root,
        })
    }

    #[must_use]
    pub fn root(&self) -> &SyncPath {
        &self.root
    }

    #[must_use]
    pub fn sync_name(&self) -> &str {
        &self.sync_name
    }

    /// The remote folder mirroring the local root: `/<sync_name>`
    #[must_use]
    pub fn remote_root(&self) -> &RemotePath {
        &self.remote_root
    }

    /// Map a local path inside the root to its remote counterpart
    ///
    /// # Errors
    /// - `PathNotInSyncRoot` if `local` is outside the root
    /// - `InvalidRelativePath` if `local` is the root itself
    pub fn local_to_remote(&self, local: &SyncPath) -> Result<RemotePath, DomainError> {
        let relative = local.relative_to(&self.root)?;
        self.remote_root.join_relative(&relative)
    }

    /// Map a remote path back to the local file it mirrors
    ///
    /// # Errors
    /// Returns `InvalidPath` if `remote` does not start with `/<sync_name>/`;
    /// such a path cannot have originated from this sync root.
    pub fn remote_to_local(&self, remote: &RemotePath) -> Result<SyncPath, DomainError> {
        let relative = remote.strip_root(&self.remote_root).ok_or_else(|| {
            DomainError::InvalidPath(format!(
                "Can't deduce local name for cloud file {remote} (expected prefix {}/)",
                self.remote_root
            ))
        })?;
        self.root.join(&relative)
    }
}
