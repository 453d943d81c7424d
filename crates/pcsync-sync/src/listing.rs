//! Remote namespace traversal
//!
//! [`IRemoteStore::list`] only returns one folder level. These helpers walk a
//! whole subtree with an explicit work stack, one request per folder.
//!
//! A missing *root* means different things to the two engines: the sync
//! planner treats it as an empty listing (the folder will be created by the
//! first upload), while validation requires both roots to exist. A missing
//! *subfolder* discovered mid-walk always propagates.

use pcsync_core::domain::{DigestAlgorithm, DomainError, HashEntry, RemoteEntry, RemotePath};
use pcsync_core::ports::{IRemoteStore, RemoteItem, StoreError};
use tracing::{debug, info, instrument};

use crate::SyncError;

/// List every file below `root` with its modification time
///
/// Returns an empty listing when `root` itself does not exist.
#[instrument(skip(store), fields(root = %root))]
pub async fn list_remote_tree(
    store: &dyn IRemoteStore,
    root: &RemotePath,
) -> Result<Vec<RemoteEntry>, SyncError> {
    let top = match store.list(root).await {
        Ok(items) => items,
        Err(StoreError::NotFound(_)) => {
            info!("Remote folder does not exist yet, treating it as empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let files = walk(store, top).await?;
    Ok(files
        .into_iter()
        .map(|item| RemoteEntry::new(item.path, item.modified))
        .collect())
}

/// Fetch the checksum of every file below `root`, keyed relative to `root`
///
/// # Errors
/// [`SyncError::NotFound`] if `root` or any folder below it is missing
#[instrument(skip(store), fields(root = %root, algorithm = %algorithm))]
pub async fn hash_remote_tree(
    store: &dyn IRemoteStore,
    root: &RemotePath,
    algorithm: DigestAlgorithm,
) -> Result<Vec<HashEntry>, SyncError> {
    let top = store.list(root).await?;
    let files = walk(store, top).await?;

    let mut hashes = Vec::with_capacity(files.len());
    for item in files {
        let relative = item.path.strip_root(root).ok_or_else(|| {
            DomainError::InvalidRemotePath(format!("{} is not below {root}", item.path))
        })?;
        let hash = store.checksum(&item.path, algorithm).await?;
        debug!(path = %relative, %hash, "Remote checksum");
        hashes.push(HashEntry::new(relative, hash));
    }
    Ok(hashes)
}

/// Depth-first walk starting from an already listed folder level
///
/// Returns only files, sorted by path, each path once.
async fn walk(
    store: &dyn IRemoteStore,
    top: Vec<RemoteItem>,
) -> Result<Vec<RemoteItem>, SyncError> {
    let mut files = Vec::new();
    let mut pending = Vec::new();

    let mut level = top;
    loop {
        for item in level {
            if item.is_folder {
                pending.push(item.path);
            } else {
                files.push(item);
            }
        }

        let Some(folder) = pending.pop() else {
            break;
        };
        debug!(folder = %folder, "Listing remote folder");
        level = store.list(&folder).await?;
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    files.dedup_by(|a, b| a.path == b.path);
    Ok(files)
}
