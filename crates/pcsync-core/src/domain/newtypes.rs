//! Domain newtypes with validation
//!
//! This module provides strongly-typed wrappers for paths and content hashes.
//! Each newtype ensures data validity at construction time.

use std::fmt::{self, Display, Formatter};
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

// ============================================================================
// Local paths
// ============================================================================

/// A validated absolute local path
///
/// SyncPath ensures the path is:
/// - Absolute (starts with /)
/// - Normalized (no . or .. components)
/// - Within the sync root when validated against one
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "PathBuf", into = "PathBuf")]
pub struct SyncPath(PathBuf);

impl SyncPath {
    /// Create a new SyncPath, validating it is absolute
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPath` if the path is not absolute
    pub fn new(path: PathBuf) -> Result<Self, DomainError> {
        if !path.is_absolute() {
            return Err(DomainError::InvalidPath(format!(
                "Path must be absolute: {}",
                path.display()
            )));
        }

        // The path might not exist yet, so no fs::canonicalize() here
        Ok(Self(Self::normalize_path(&path)?))
    }

    /// Create a SyncPath validated against a sync root
    ///
    /// # Errors
    /// Returns error if path is not within the sync root
    pub fn new_within_root(path: PathBuf, sync_root: &SyncPath) -> Result<Self, DomainError> {
        let sync_path = Self::new(path)?;

        if !sync_path.0.starts_with(&sync_root.0) {
            return Err(DomainError::PathNotInSyncRoot(format!(
                "{} is not within sync root {}",
                sync_path.0.display(),
                sync_root.0.display()
            )));
        }

        Ok(sync_path)
    }

    /// Get the inner path
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Convert to owned PathBuf
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }

    /// Last component of the path (`None` for `/`)
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name().and_then(|n| n.to_str())
    }

    /// Get the path relative to a root as a `/`-separated [`RelativePath`]
    ///
    /// # Errors
    /// Returns error if this path is not strictly inside the root, or if a
    /// component is not valid UTF-8
    pub fn relative_to(&self, root: &SyncPath) -> Result<RelativePath, DomainError> {
        let stripped = self.0.strip_prefix(&root.0).map_err(|_| {
            DomainError::PathNotInSyncRoot(format!(
                "{} is not within {}",
                self.0.display(),
                root.0.display()
            ))
        })?;

        let mut parts = Vec::new();
        for component in stripped.components() {
            let part = component.as_os_str().to_str().ok_or_else(|| {
                DomainError::InvalidPath(format!("Non UTF-8 path: {}", self.0.display()))
            })?;
            parts.push(part);
        }

        RelativePath::new(parts.join("/"))
    }

    /// Join a relative path below this SyncPath
    ///
    /// # Errors
    /// Returns error if the result would escape this path
    pub fn join(&self, relative: &RelativePath) -> Result<Self, DomainError> {
        let mut joined = self.0.clone();
        for segment in relative.segments() {
            joined.push(segment);
        }
        Self::new(joined)
    }

    /// Normalize a path by resolving . and .. components
    fn normalize_path(path: &Path) -> Result<PathBuf, DomainError> {
        let mut normalized = PathBuf::new();

        for component in path.components() {
            match component {
                Component::Prefix(p) => normalized.push(p.as_os_str()),
                Component::RootDir => normalized.push("/"),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !normalized.pop() {
                        return Err(DomainError::InvalidPath(
                            "Path escapes root via ..".to_string(),
                        ));
                    }
                }
                Component::Normal(c) => normalized.push(c),
            }
        }

        Ok(normalized)
    }
}

impl Display for SyncPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl TryFrom<PathBuf> for SyncPath {
    type Error = DomainError;

    fn try_from(path: PathBuf) -> Result<Self, Self::Error> {
        Self::new(path)
    }
}

impl From<SyncPath> for PathBuf {
    fn from(sync_path: SyncPath) -> Self {
        sync_path.0
    }
}

impl AsRef<Path> for SyncPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

// ============================================================================
// Remote paths
// ============================================================================

/// A remote namespace path (must start with /)
///
/// Represents paths in pCloud format, e.g., "/Photos/2024/beach.jpg"
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemotePath(String);

impl RemotePath {
    /// Create a new RemotePath
    ///
    /// # Errors
    /// Returns error if path doesn't start with /, contains an empty
    /// component, or contains a `..` component
    pub fn new(path: String) -> Result<Self, DomainError> {
        if !path.starts_with('/') {
            return Err(DomainError::InvalidRemotePath(format!(
                "Remote path must start with '/': {path}"
            )));
        }

        if path.len() > 1 && path.contains("//") {
            return Err(DomainError::InvalidRemotePath(format!(
                "Remote path contains invalid double slashes: {path}"
            )));
        }

        if path.split('/').any(|segment| segment == "..") {
            return Err(DomainError::InvalidRemotePath(format!(
                "Remote path contains invalid traversal: {path}"
            )));
        }

        Ok(Self(path))
    }

    /// Create the root path "/"
    #[must_use]
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the namespace root "/"
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Join a single path component
    ///
    /// # Errors
    /// Returns error if component is empty, contains `/`, or is `.`/`..`
    pub fn join(&self, component: &str) -> Result<Self, DomainError> {
        if component.is_empty() || component.contains('/') || component == "." || component == ".." {
            return Err(DomainError::InvalidRemotePath(format!(
                "Invalid path component: {component}"
            )));
        }

        let new_path = if self.is_root() {
            format!("/{component}")
        } else {
            format!("{}/{component}", self.0)
        };

        Self::new(new_path)
    }

    /// Join a relative path below this one
    ///
    /// # Errors
    /// Returns error if a segment of `relative` is not a valid component
    pub fn join_relative(&self, relative: &RelativePath) -> Result<Self, DomainError> {
        relative
            .segments()
            .try_fold(self.clone(), |acc, segment| acc.join(segment))
    }

    /// Path of this entry relative to `root`, if it lies strictly below it
    #[must_use]
    pub fn strip_root(&self, root: &RemotePath) -> Option<RelativePath> {
        let rest = if root.is_root() {
            self.0.strip_prefix('/')?
        } else {
            self.0.strip_prefix(root.as_str())?.strip_prefix('/')?
        };
        RelativePath::new(rest.to_string()).ok()
    }

    /// Get the parent path
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }

        match self.0.rfind('/') {
            Some(0) => Some(Self::root()),
            Some(idx) => Some(Self(self.0[..idx].to_string())),
            None => None,
        }
    }

    /// Get the file name component
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }

        self.0.rsplit('/').next()
    }

    /// Every ancestor from the top-level folder down to this path itself
    ///
    /// `/a/b/c` yields `/a`, `/a/b`, `/a/b/c`. The root yields nothing.
    #[must_use]
    pub fn ancestors_inclusive(&self) -> Vec<Self> {
        let mut current = String::new();
        let mut out = Vec::new();
        for segment in self.0.split('/').filter(|s| !s.is_empty()) {
            current.push('/');
            current.push_str(segment);
            out.push(Self(current.clone()));
        }
        out
    }
}

impl Display for RemotePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RemotePath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for RemotePath {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RemotePath> for String {
    fn from(path: RemotePath) -> Self {
        path.0
    }
}

// ============================================================================
// Relative paths
// ============================================================================

/// A POSIX-style path relative to a root, e.g. "foo/1.txt"
///
/// This is the join key between the local and remote listings. Comparison
/// is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RelativePath(String);

impl RelativePath {
    /// Create a new RelativePath
    ///
    /// # Errors
    /// Returns error if the path is empty, absolute, or contains empty,
    /// `.` or `..` segments
    pub fn new(path: String) -> Result<Self, DomainError> {
        if path.is_empty() {
            return Err(DomainError::InvalidRelativePath(
                "Relative path cannot be empty".to_string(),
            ));
        }
        if path.starts_with('/') {
            return Err(DomainError::InvalidRelativePath(format!(
                "Relative path must not start with '/': {path}"
            )));
        }
        if path
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(DomainError::InvalidRelativePath(format!(
                "Relative path has an invalid segment: {path}"
            )));
        }

        Ok(Self(path))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the `/`-separated segments
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

impl Display for RelativePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RelativePath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for RelativePath {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RelativePath> for String {
    fn from(path: RelativePath) -> Self {
        path.0
    }
}

// ============================================================================
// Content hashes
// ============================================================================

/// Digest used to fingerprint file contents during validation
///
/// Limited to the digests `checksumfile` reports: US-region accounts return
/// `md5` and `sha1`, EU-region accounts `sha1` and `sha256`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// MD5 (US region only)
    Md5,
    /// SHA-1 (both regions)
    #[default]
    Sha1,
    /// SHA-256 (EU region only)
    Sha256,
}

impl DigestAlgorithm {
    /// Lower-case name, also the checksum field name on the remote side
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
        }
    }

    /// Length of the hex-encoded digest
    #[must_use]
    pub const fn hex_len(&self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha1 => 40,
            Self::Sha256 => 64,
        }
    }
}

impl Display for DigestAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            other => Err(DomainError::UnknownDigest(other.to_string())),
        }
    }
}

/// A hex-encoded content digest tagged with its algorithm
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContentHash {
    algorithm: DigestAlgorithm,
    hex: String,
}

impl ContentHash {
    /// Create a new ContentHash; upper-case hex is normalized to lower-case
    ///
    /// # Errors
    /// Returns error if the string is not hex of the algorithm's digest length
    pub fn new(algorithm: DigestAlgorithm, hex: impl Into<String>) -> Result<Self, DomainError> {
        let hex = hex.into().to_ascii_lowercase();

        if hex.len() != algorithm.hex_len() {
            return Err(DomainError::InvalidHash(format!(
                "{algorithm} digest must be {} hex chars, got {}",
                algorithm.hex_len(),
                hex.len()
            )));
        }
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DomainError::InvalidHash(format!("not hex: {hex}")));
        }

        Ok(Self { algorithm, hex })
    }

    /// Build from raw digest bytes
    ///
    /// # Errors
    /// Returns error if the byte length does not match the algorithm
    pub fn from_digest(algorithm: DigestAlgorithm, bytes: &[u8]) -> Result<Self, DomainError> {
        Self::new(algorithm, hex::encode(bytes))
    }

    #[must_use]
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.hex
    }
}

impl Display for ContentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.hex)
    }
}

// ============================================================================
// Tests
// ============================================================================
