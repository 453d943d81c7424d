//! Errors shared by both store ports
//!
//! Unlike the adapter-internal errors, these variants carry meaning the
//! engines act on: `NotFound` on the sync root means "empty, will be
//! created", `ParentMissing` on upload triggers folder creation and a retry.

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Errors returned by [`IRemoteStore`](super::IRemoteStore) and
/// [`ILocalStore`](super::ILocalStore) implementations
#[derive(Debug, Error)]
pub enum StoreError {
    /// The path does not exist in the store
    #[error("Not found: {0}")]
    NotFound(String),

    /// A write failed because the destination's parent folder does not exist
    #[error("Parent folder missing: {0}")]
    ParentMissing(String),

    /// The store rejected our credentials
    #[error("Authentication failed: {0}")]
    AuthFailure(String),

    /// A path returned by the store could not be validated
    #[error("Invalid path: {0}")]
    InvalidPath(#[from] DomainError),

    /// A local I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other adapter-specific failure (network, protocol, parsing)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    /// Returns true for [`StoreError::NotFound`]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
