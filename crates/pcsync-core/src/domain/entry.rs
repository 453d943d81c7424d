//! Listing entries
//!
//! A listing is a sequence of `(path, signal)` pairs produced fresh on every
//! run by one side of the sync. In sync mode the signal is a modification
//! time; in validation mode it is a content hash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::newtypes::{ContentHash, RelativePath, RemotePath, SyncPath};

/// One file of a listing: where it is and what we know about its content
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FileEntry<P, S> {
    pub path: P,
    pub signal: S,
}

impl<P, S> FileEntry<P, S> {
    pub fn new(path: P, signal: S) -> Self {
        Self { path, signal }
    }
}

/// A local file and its modification time
pub type LocalEntry = FileEntry<SyncPath, DateTime<Utc>>;

/// A remote file and its modification time
pub type RemoteEntry = FileEntry<RemotePath, DateTime<Utc>>;

/// A file relative to its root and its content digest
pub type HashEntry = FileEntry<RelativePath, ContentHash>;

/// The "oldest possible" modification time, used when a side has no entry
#[must_use]
pub fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}
