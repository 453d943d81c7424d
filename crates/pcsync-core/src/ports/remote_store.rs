//! Remote store port (driven/secondary port)
//!
//! This module defines the interface for interacting with the cloud storage
//! namespace. The primary implementation targets pCloud, but the trait only
//! assumes a hierarchical namespace of folders and files addressed by path.
//!
//! ## Design Notes
//!
//! - Uses [`StoreError`] rather than `anyhow::Result` because the engines
//!   branch on `NotFound` and `ParentMissing`.
//! - `list` is a single-level listing; recursive traversal is done by the
//!   caller so that a missing root and a missing subfolder can be told apart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::StoreError;
use crate::domain::newtypes::{ContentHash, DigestAlgorithm, RemotePath};

// ============================================================================
// RemoteItem
// ============================================================================

/// One child of a remote folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteItem {
    /// Full path of the item in the remote namespace
    pub path: RemotePath,
    /// Last modification time reported by the store
    pub modified: DateTime<Utc>,
    /// Whether this item is a folder
    pub is_folder: bool,
}

impl RemoteItem {
    pub fn file(path: RemotePath, modified: DateTime<Utc>) -> Self {
        Self {
            path,
            modified,
            is_folder: false,
        }
    }

    pub fn folder(path: RemotePath, modified: DateTime<Utc>) -> Self {
        Self {
            path,
            modified,
            is_folder: true,
        }
    }
}

// ============================================================================
// IRemoteStore trait
// ============================================================================

/// Port trait for cloud storage operations
///
/// ## Implementation Notes
///
/// - All methods assume valid credentials; a rejected token surfaces as
///   [`StoreError::AuthFailure`].
/// - Implementations should not retry internally; the executor decides.
#[async_trait::async_trait]
pub trait IRemoteStore: Send + Sync {
    /// Lists the direct children of a folder
    ///
    /// # Errors
    /// [`StoreError::NotFound`] if the folder does not exist
    async fn list(&self, folder: &RemotePath) -> Result<Vec<RemoteItem>, StoreError>;

    /// Downloads a file's content
    ///
    /// # Errors
    /// [`StoreError::NotFound`] if the file does not exist
    async fn read(&self, path: &RemotePath) -> Result<Vec<u8>, StoreError>;

    /// Uploads a file, replacing any existing content
    ///
    /// # Errors
    /// [`StoreError::ParentMissing`] if the parent folder does not exist
    async fn write(&self, path: &RemotePath, data: &[u8]) -> Result<(), StoreError>;

    /// Creates `folder` and all of its missing ancestors
    ///
    /// Creating a folder that already exists is a no-op.
    async fn make_parents(&self, folder: &RemotePath) -> Result<(), StoreError>;

    /// Returns the content digest the store reports for a file
    ///
    /// # Errors
    /// [`StoreError::NotFound`] if the file does not exist
    async fn checksum(
        &self,
        path: &RemotePath,
        algorithm: DigestAlgorithm,
    ) -> Result<ContentHash, StoreError>;
}
