//! Local store port (driven/secondary port)
//!
//! This module defines the interface for interacting with the local
//! filesystem subtree being synchronized: listing files with their
//! modification times, reading and atomically writing content, and hashing
//! every file below a root for validation.

use chrono::{DateTime, Utc};

use super::error::StoreError;
use crate::domain::entry::{HashEntry, LocalEntry};
use crate::domain::newtypes::SyncPath;

// ============================================================================
// FileState struct
// ============================================================================

/// Snapshot of a path's state on the local filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileState {
    /// Whether the file/directory exists on disk
    pub exists: bool,
    /// Whether this is a regular file (false for directories and other types)
    pub is_file: bool,
    /// Size in bytes (0 for directories or non-existent files)
    pub size: u64,
    /// Last modification time (None if not available or file doesn't exist)
    pub modified: Option<DateTime<Utc>>,
}

impl FileState {
    /// Returns a state representing a non-existent path
    pub fn not_found() -> Self {
        Self {
            exists: false,
            is_file: false,
            size: 0,
            modified: None,
        }
    }

    /// Returns true if the path exists and is a directory
    pub fn is_directory(&self) -> bool {
        self.exists && !self.is_file
    }
}

// ============================================================================
// ILocalStore trait
// ============================================================================

/// Port trait for local filesystem operations
///
/// ## Implementation Notes
///
/// - All paths are `SyncPath` instances, which are guaranteed to be absolute.
/// - `write_atomic` must never leave a partially written file at `path`,
///   even if the process dies mid-write.
/// - `hash_all` must stream file contents in bounded memory.
#[async_trait::async_trait]
pub trait ILocalStore: Send + Sync {
    /// Lists every regular file below `root`, recursively, with its mtime
    async fn list(&self, root: &SyncPath) -> Result<Vec<LocalEntry>, StoreError>;

    /// Reads the entire contents of a file
    async fn read(&self, path: &SyncPath) -> Result<Vec<u8>, StoreError>;

    /// Replaces the file at `path` with `data` atomically
    ///
    /// Missing parent directories are created.
    async fn write_atomic(&self, path: &SyncPath, data: &[u8]) -> Result<(), StoreError>;

    /// Gets the current state of a file or directory
    ///
    /// Returns `FileState::not_found()` for a missing path instead of an error.
    async fn stat(&self, path: &SyncPath) -> Result<FileState, StoreError>;

    /// Hashes every regular file below `root`, keyed by its path relative to `root`
    async fn hash_all(&self, root: &SyncPath) -> Result<Vec<HashEntry>, StoreError>;
}
