//! Domain error types
//!
//! This module defines error types specific to domain operations:
//! path validation, path mapping between roots, and hash parsing.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid path format, or a path that cannot be mapped between roots
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Invalid relative path (absolute, empty, or escaping its root)
    #[error("Invalid relative path: {0}")]
    InvalidRelativePath(String),

    /// Invalid hash format (expected lower-case hex of the digest length)
    #[error("Invalid hash format: {0}")]
    InvalidHash(String),

    /// Unknown digest algorithm name
    #[error("Unknown digest algorithm: {0}")]
    UnknownDigest(String),

    /// Path is not within the configured sync root
    #[error("Path not within sync root: {0}")]
    PathNotInSyncRoot(String),

    /// Invalid remote path format
    #[error("Invalid remote path: {0}")]
    InvalidRemotePath(String),
}
