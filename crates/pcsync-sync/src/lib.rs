//! pcsync Sync - Decision engine and file transfer
//!
//! Provides:
//! - A pure sync planner (one action per file, newest side wins)
//! - A sequential executor with dry-run support
//! - A hash validator reporting local-only, remote-only and mismatched files
//!
//! ## Modules
//!
//! - [`planner`] - Two-pass merge of local and remote listings into a [`planner::SyncPlan`]
//! - [`listing`] - Iterative traversal of the remote namespace
//! - [`executor`] - Applies a plan through the store ports
//! - [`validator`] - Symmetric difference of two hash listings
//! - [`filesystem`] - Local filesystem adapter (atomic writes, streaming digests)

pub mod executor;
pub mod filesystem;
pub mod listing;
pub mod planner;
pub mod validator;

#[cfg(test)]
pub(crate) mod testing;

use pcsync_core::domain::errors::DomainError;
use pcsync_core::ports::StoreError;
use thiserror::Error;

/// Errors that abort a planning, listing or validation run
///
/// Transfer failures are not represented here: the executor records them
/// per action in its [`executor::ExecutionLog`].
#[derive(Debug, Error)]
pub enum SyncError {
    /// A path could not be mapped between the two sides
    #[error("Invalid path: {0}")]
    InvalidPath(#[from] DomainError),

    /// A folder or file that must exist is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other store failure
    #[error("Store error: {0}")]
    Store(#[source] StoreError),
}

impl From<StoreError> for SyncError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(path) => Self::NotFound(path),
            StoreError::InvalidPath(err) => Self::InvalidPath(err),
            other => Self::Store(other),
        }
    }
}
