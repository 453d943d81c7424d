//! Local filesystem adapter (secondary/driven adapter)
//!
//! Implements [`ILocalStore`] using `tokio::fs` for async file operations.
//!
//! ## Design Decisions
//!
//! - **Atomic writes**: content goes to a uniquely named temporary file in the
//!   destination directory, is flushed to disk, then renamed over the target.
//! - **Streaming digests**: files are hashed through a fixed-size buffer on
//!   the blocking pool, so memory use does not depend on file size.
//! - **Symlinks** are neither followed nor listed.

use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use pcsync_core::config::DEFAULT_CHUNK_SIZE;
use pcsync_core::domain::{ContentHash, DigestAlgorithm, HashEntry, LocalEntry, SyncPath};
use pcsync_core::ports::{FileState, ILocalStore, StoreError};
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument, warn};

// ============================================================================
// LocalFileSystemAdapter struct
// ============================================================================

/// Adapter that bridges the [`ILocalStore`] port to the real filesystem.
///
/// Holds only hashing settings; every path comes from the call arguments.
#[derive(Debug, Clone)]
pub struct LocalFileSystemAdapter {
    digest: DigestAlgorithm,
    chunk_size: usize,
}

impl Default for LocalFileSystemAdapter {
    fn default() -> Self {
        Self::new(DigestAlgorithm::default(), DEFAULT_CHUNK_SIZE)
    }
}

impl LocalFileSystemAdapter {
    /// Create an adapter hashing with `digest` through a `chunk_size` buffer.
    ///
    /// A zero chunk size falls back to the default buffer.
    #[must_use]
    pub fn new(digest: DigestAlgorithm, chunk_size: usize) -> Self {
        let chunk_size = if chunk_size == 0 {
            DEFAULT_CHUNK_SIZE
        } else {
            chunk_size
        };
        Self { digest, chunk_size }
    }

    /// Hash one file with this adapter's settings.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn hash_file(&self, path: &SyncPath) -> Result<ContentHash, StoreError> {
        let owned = path.as_path().to_path_buf();
        let (digest, chunk_size) = (self.digest, self.chunk_size);

        let bytes = tokio::task::spawn_blocking(move || digest_file(&owned, digest, chunk_size))
            .await
            .map_err(|e| StoreError::Other(e.into()))?
            .map_err(|e| map_io(e, path.as_path()))?;

        Ok(ContentHash::from_digest(digest, &bytes)?)
    }

    /// Every regular file below `root`, sorted by path
    ///
    /// Files whose path below `root` is not valid UTF-8 have no remote
    /// counterpart; they are logged and left out.
    async fn walk(&self, root: &SyncPath) -> Result<Vec<(SyncPath, std::fs::Metadata)>, StoreError> {
        let meta = tokio::fs::metadata(root.as_path())
            .await
            .map_err(|e| map_io(e, root.as_path()))?;
        if !meta.is_dir() {
            return Err(StoreError::NotFound(format!("{root} is not a directory")));
        }

        let mut files = Vec::new();
        let mut pending: Vec<PathBuf> = vec![root.as_path().to_path_buf()];

        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let file_type = entry.file_type().await?;
                let path = entry.path();

                if file_type.is_dir() {
                    pending.push(path);
                } else if file_type.is_file() {
                    match SyncPath::new(path).and_then(|p| p.relative_to(root).map(|_| p)) {
                        Ok(sync_path) => {
                            let metadata = entry.metadata().await?;
                            files.push((sync_path, metadata));
                        }
                        Err(err) => warn!(%err, "Skipping invalid path"),
                    }
                } else {
                    debug!(path = %path.display(), "Skipping non-regular file");
                }
            }
        }

        files.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(files)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// `NotFound` I/O errors become [`StoreError::NotFound`]
fn map_io(err: std::io::Error, path: &Path) -> StoreError {
    if err.kind() == ErrorKind::NotFound {
        StoreError::NotFound(path.display().to_string())
    } else {
        StoreError::Io(err)
    }
}

fn modified_time(metadata: &std::fs::Metadata) -> Option<DateTime<Utc>> {
    metadata.modified().ok().map(DateTime::<Utc>::from)
}

/// Stream a file through the digest, `chunk_size` bytes at a time
fn digest_file(path: &Path, algorithm: DigestAlgorithm, chunk_size: usize) -> std::io::Result<Vec<u8>> {
    let mut file = std::fs::File::open(path)?;
    let mut buffer = vec![0u8; chunk_size];

    match algorithm {
        DigestAlgorithm::Md5 => digest_reader::<Md5>(&mut file, &mut buffer),
        DigestAlgorithm::Sha1 => digest_reader::<Sha1>(&mut file, &mut buffer),
        DigestAlgorithm::Sha256 => digest_reader::<Sha256>(&mut file, &mut buffer),
    }
}

fn digest_reader<D: Digest>(reader: &mut impl Read, buffer: &mut [u8]) -> std::io::Result<Vec<u8>> {
    let mut hasher = D::new();
    loop {
        let n = match reader.read(buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..n]);
    }
    Ok(hasher.finalize().to_vec())
}

/// Temp file in the target's directory, synced, then renamed over the target
fn write_atomic_blocking(target: &Path, data: &[u8]) -> std::io::Result<()> {
    let parent = target
        .parent()
        .ok_or_else(|| std::io::Error::new(ErrorKind::InvalidInput, "path has no parent"))?;
    std::fs::create_dir_all(parent)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".pcsync-")
        .suffix(".tmp")
        .tempfile_in(parent)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

// ============================================================================
// ILocalStore implementation
// ============================================================================

#[async_trait::async_trait]
impl ILocalStore for LocalFileSystemAdapter {
    #[instrument(skip(self), fields(root = %root))]
    async fn list(&self, root: &SyncPath) -> Result<Vec<LocalEntry>, StoreError> {
        let files = self.walk(root).await?;
        debug!(count = files.len(), "local files listed");

        Ok(files
            .into_iter()
            .map(|(path, metadata)| {
                let modified = modified_time(&metadata).unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
                LocalEntry::new(path, modified)
            })
            .collect())
    }

    #[instrument(skip(self), fields(path = %path))]
    async fn read(&self, path: &SyncPath) -> Result<Vec<u8>, StoreError> {
        debug!("reading file");
        let data = tokio::fs::read(path.as_path())
            .await
            .map_err(|e| map_io(e, path.as_path()))?;
        debug!(bytes = data.len(), "file read complete");
        Ok(data)
    }

    #[instrument(skip(self, data), fields(path = %path, bytes = data.len()))]
    async fn write_atomic(&self, path: &SyncPath, data: &[u8]) -> Result<(), StoreError> {
        let target = path.as_path().to_path_buf();
        let data = data.to_vec();

        tokio::task::spawn_blocking(move || write_atomic_blocking(&target, &data))
            .await
            .map_err(|e| StoreError::Other(e.into()))??;

        debug!("write complete");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %path))]
    async fn stat(&self, path: &SyncPath) -> Result<FileState, StoreError> {
        let metadata = match tokio::fs::metadata(path.as_path()).await {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("path not found");
                return Ok(FileState::not_found());
            }
            Err(e) => return Err(e.into()),
        };

        let state = FileState {
            exists: true,
            is_file: metadata.is_file(),
            size: if metadata.is_file() { metadata.len() } else { 0 },
            modified: modified_time(&metadata),
        };
        debug!(is_file = state.is_file, size = state.size, "state retrieved");
        Ok(state)
    }

    #[instrument(skip(self), fields(root = %root, digest = %self.digest))]
    async fn hash_all(&self, root: &SyncPath) -> Result<Vec<HashEntry>, StoreError> {
        let files = self.walk(root).await?;

        let mut hashes = Vec::with_capacity(files.len());
        for (path, _) in files {
            let relative = path.relative_to(root)?;
            let hash = self.hash_file(&path).await?;
            debug!(path = %relative, %hash, "local checksum");
            hashes.push(HashEntry::new(relative, hash));
        }

        // PathBuf orders by component, RelativePath by string.
        hashes.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(hashes)
    }
}

// ============================================================================
// Unit tests
// ============================================================================
