//! PCloudStore - IRemoteStore implementation for the pCloud API
//!
//! Wraps the [`PCloudClient`] and translates pCloud metadata and result
//! codes into the port's types. A missing folder on upload (result 2005)
//! becomes [`StoreError::ParentMissing`] so the executor can create it and
//! retry.

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use pcsync_core::domain::{ContentHash, DigestAlgorithm, DomainError, RemotePath};
use pcsync_core::ports::{IRemoteStore, RemoteItem, StoreError};

use crate::client::{Metadata, PCloudClient};
use crate::{CloudError, DIRECTORY_NOT_FOUND};

/// pCloud-backed remote store
pub struct PCloudStore {
    client: PCloudClient,
}

impl PCloudStore {
    pub fn new(client: PCloudClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &PCloudClient {
        &self.client
    }
}

/// Converts a listed item to the port type
fn to_remote_item(item: &Metadata) -> Result<RemoteItem, StoreError> {
    let raw = item
        .path
        .clone()
        .ok_or_else(|| CloudError::InvalidResponse(format!("item {} has no path", item.name)))?;
    let path = RemotePath::new(raw)?;
    let modified: DateTime<Utc> = item.modified_at()?;

    Ok(if item.isfolder {
        RemoteItem::folder(path, modified)
    } else {
        RemoteItem::file(path, modified)
    })
}

#[async_trait::async_trait]
impl IRemoteStore for PCloudStore {
    #[instrument(skip(self), fields(folder = %folder))]
    async fn list(&self, folder: &RemotePath) -> Result<Vec<RemoteItem>, StoreError> {
        let items = self.client.list_folder(folder.as_str()).await?;
        items.iter().map(to_remote_item).collect()
    }

    #[instrument(skip(self), fields(path = %path))]
    async fn read(&self, path: &RemotePath) -> Result<Vec<u8>, StoreError> {
        Ok(self.client.download(path.as_str()).await?)
    }

    #[instrument(skip(self, data), fields(path = %path, bytes = data.len()))]
    async fn write(&self, path: &RemotePath, data: &[u8]) -> Result<(), StoreError> {
        let folder = path.parent().unwrap_or_else(RemotePath::root);
        let filename = path
            .file_name()
            .ok_or_else(|| DomainError::InvalidRemotePath(format!("cannot upload to {path}")))?;

        match self.client.upload(folder.as_str(), filename, data).await {
            Ok(()) => Ok(()),
            Err(err) if err.code() == Some(DIRECTORY_NOT_FOUND) => {
                debug!(folder = %folder, "Upload target folder is missing");
                Err(StoreError::ParentMissing(folder.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    #[instrument(skip(self), fields(folder = %folder))]
    async fn make_parents(&self, folder: &RemotePath) -> Result<(), StoreError> {
        for ancestor in folder.ancestors_inclusive() {
            debug!(path = %ancestor, "Ensuring remote folder exists");
            self.client
                .create_folder_if_not_exists(ancestor.as_str())
                .await?;
        }
        Ok(())
    }

    #[instrument(skip(self), fields(path = %path, algorithm = %algorithm))]
    async fn checksum(
        &self,
        path: &RemotePath,
        algorithm: DigestAlgorithm,
    ) -> Result<ContentHash, StoreError> {
        let response = self.client.checksum_file(path.as_str()).await?;

        let hex = match algorithm {
            DigestAlgorithm::Md5 => response.md5,
            DigestAlgorithm::Sha1 => response.sha1,
            DigestAlgorithm::Sha256 => response.sha256,
        }
        .ok_or_else(|| {
            CloudError::InvalidResponse(format!(
                "server did not report a {algorithm} checksum for {path}"
            ))
        })?;

        Ok(ContentHash::new(algorithm, hex)?)
    }
}
