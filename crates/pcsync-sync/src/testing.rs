//! In-memory store implementations shared by the engine tests

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pcsync_core::domain::{
    ContentHash, DigestAlgorithm, HashEntry, LocalEntry, RemotePath, SyncPath,
};
use pcsync_core::ports::{FileState, ILocalStore, IRemoteStore, RemoteItem, StoreError};
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};

pub fn digest(algorithm: DigestAlgorithm, data: &[u8]) -> ContentHash {
    let bytes = match algorithm {
        DigestAlgorithm::Md5 => Md5::digest(data).to_vec(),
        DigestAlgorithm::Sha1 => Sha1::digest(data).to_vec(),
        DigestAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
    };
    ContentHash::from_digest(algorithm, &bytes).unwrap()
}

// ============================================================================
// Remote
// ============================================================================

#[derive(Default)]
pub struct MemoryRemote {
    pub files: Mutex<BTreeMap<RemotePath, (Vec<u8>, DateTime<Utc>)>>,
    pub folders: Mutex<BTreeSet<RemotePath>>,
    /// Paths whose read or write fails with `Other`
    pub broken: Mutex<BTreeSet<RemotePath>>,
    pub calls: AtomicUsize,
    pub writes: AtomicUsize,
    pub make_parents_calls: AtomicUsize,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: &str, data: &[u8], modified: DateTime<Utc>) {
        let path = RemotePath::new(path.to_string()).unwrap();
        if let Some(parent) = path.parent() {
            self.folders
                .lock()
                .unwrap()
                .extend(parent.ancestors_inclusive());
        }
        self.files
            .lock()
            .unwrap()
            .insert(path, (data.to_vec(), modified));
    }

    pub fn add_folder(&self, path: &str) {
        let path = RemotePath::new(path.to_string()).unwrap();
        self.folders
            .lock()
            .unwrap()
            .extend(path.ancestors_inclusive());
    }

    pub fn break_path(&self, path: &str) {
        self.broken
            .lock()
            .unwrap()
            .insert(RemotePath::new(path.to_string()).unwrap());
    }

    pub fn content(&self, path: &str) -> Option<Vec<u8>> {
        let path = RemotePath::new(path.to_string()).unwrap();
        self.files.lock().unwrap().get(&path).map(|(d, _)| d.clone())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn folder_exists(&self, path: &RemotePath) -> bool {
        path.is_root() || self.folders.lock().unwrap().contains(path)
    }

    fn check_broken(&self, path: &RemotePath) -> Result<(), StoreError> {
        if self.broken.lock().unwrap().contains(path) {
            return Err(StoreError::Other(anyhow::anyhow!("connection reset: {path}")));
        }
        Ok(())
    }
}

#[async_trait]
impl IRemoteStore for MemoryRemote {
    async fn list(&self, folder: &RemotePath) -> Result<Vec<RemoteItem>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.folder_exists(folder) {
            return Err(StoreError::NotFound(folder.to_string()));
        }

        let mut items: Vec<RemoteItem> = self
            .folders
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.parent().as_ref() == Some(folder))
            .map(|f| RemoteItem::folder(f.clone(), DateTime::<Utc>::UNIX_EPOCH))
            .collect();
        items.extend(
            self.files
                .lock()
                .unwrap()
                .iter()
                .filter(|(p, _)| p.parent().as_ref() == Some(folder))
                .map(|(p, (_, m))| RemoteItem::file(p.clone(), *m)),
        );
        Ok(items)
    }

    async fn read(&self, path: &RemotePath) -> Result<Vec<u8>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.check_broken(path)?;
        self.files
            .lock()
            .unwrap()
            .get(path)
            .map(|(d, _)| d.clone())
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    async fn write(&self, path: &RemotePath, data: &[u8]) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check_broken(path)?;
        let parent = path.parent().unwrap_or_else(RemotePath::root);
        if !self.folder_exists(&parent) {
            return Err(StoreError::ParentMissing(parent.to_string()));
        }
        self.files
            .lock()
            .unwrap()
            .insert(path.clone(), (data.to_vec(), Utc::now()));
        Ok(())
    }

    async fn make_parents(&self, folder: &RemotePath) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.make_parents_calls.fetch_add(1, Ordering::SeqCst);
        self.folders
            .lock()
            .unwrap()
            .extend(folder.ancestors_inclusive());
        Ok(())
    }

    async fn checksum(
        &self,
        path: &RemotePath,
        algorithm: DigestAlgorithm,
    ) -> Result<ContentHash, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.files
            .lock()
            .unwrap()
            .get(path)
            .map(|(d, _)| digest(algorithm, d))
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }
}

// ============================================================================
// Local
// ============================================================================

#[derive(Default)]
pub struct MemoryLocal {
    pub files: Mutex<BTreeMap<SyncPath, (Vec<u8>, DateTime<Utc>)>>,
    pub broken: Mutex<BTreeSet<SyncPath>>,
    pub calls: AtomicUsize,
}

impl MemoryLocal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: &str, data: &[u8], modified: DateTime<Utc>) {
        self.files.lock().unwrap().insert(
            SyncPath::new(path.into()).unwrap(),
            (data.to_vec(), modified),
        );
    }

    pub fn break_path(&self, path: &str) {
        self.broken
            .lock()
            .unwrap()
            .insert(SyncPath::new(path.into()).unwrap());
    }

    pub fn content(&self, path: &str) -> Option<Vec<u8>> {
        let path = SyncPath::new(path.into()).unwrap();
        self.files.lock().unwrap().get(&path).map(|(d, _)| d.clone())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ILocalStore for MemoryLocal {
    async fn list(&self, root: &SyncPath) -> Result<Vec<LocalEntry>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .files
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p.as_path().starts_with(root.as_path()) && *p != root)
            .map(|(p, (_, m))| LocalEntry::new(p.clone(), *m))
            .collect())
    }

    async fn read(&self, path: &SyncPath) -> Result<Vec<u8>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.broken.lock().unwrap().contains(path) {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "permission denied",
            )));
        }
        self.files
            .lock()
            .unwrap()
            .get(path)
            .map(|(d, _)| d.clone())
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    async fn write_atomic(&self, path: &SyncPath, data: &[u8]) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.files
            .lock()
            .unwrap()
            .insert(path.clone(), (data.to_vec(), Utc::now()));
        Ok(())
    }

    async fn stat(&self, path: &SyncPath) -> Result<FileState, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(match self.files.lock().unwrap().get(path) {
            Some((d, m)) => FileState {
                exists: true,
                is_file: true,
                size: d.len() as u64,
                modified: Some(*m),
            },
            None => FileState::not_found(),
        })
    }

    async fn hash_all(&self, root: &SyncPath) -> Result<Vec<HashEntry>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let files = self.files.lock().unwrap();
        let mut out = Vec::new();
        for (path, (data, _)) in files.iter() {
            if let Ok(relative) = path.relative_to(root) {
                out.push(HashEntry::new(relative, digest(DigestAlgorithm::Sha256, data)));
            }
        }
        Ok(out)
    }
}
