//! Configuration module for pcsync.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.
//! Credentials are not part of this file; they live in the separate settings
//! file passed with `--settings`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::newtypes::DigestAlgorithm;

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for pcsync.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sync: SyncConfig,
    pub remote: RemoteConfig,
    pub validation: ValidationConfig,
    pub logging: LoggingConfig,
}

/// Synchronization settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Name of the remote folder mirroring the local root.
    /// `None` uses the local root's own directory name.
    pub sync_name: Option<String>,
}

/// Remote API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the pCloud API (`https://eapi.pcloud.com` for EU accounts).
    pub api_base: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Validation (hash comparison) settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Digest used on both sides.
    pub digest: DigestAlgorithm,
    /// Read buffer size for streaming hashes, in bytes.
    pub chunk_size: usize,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/pcsync/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        config_dir().join("config.yaml")
    }

    /// Default location of the credential settings file.
    pub fn default_settings_path() -> PathBuf {
        config_dir().join("credentials.json")
    }
}

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("pcsync")
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default pCloud API endpoint (US region).
pub const DEFAULT_API_BASE: &str = "https://api.pcloud.com";

/// pCloud API endpoint for EU-region accounts.
pub const EU_API_BASE: &str = "https://eapi.pcloud.com";

/// Default streaming hash buffer: 64 KiB.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            digest: DigestAlgorithm::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"remote.timeout_secs"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Upper bound for `validation.chunk_size` (16 MiB).
const MAX_CHUNK_SIZE: usize = 16 * 1024 * 1024;

/// Digests `checksumfile` reports on a known pCloud endpoint.
///
/// `None` for any other host (proxies, test servers).
fn reported_digests(api_base: &str) -> Option<&'static [DigestAlgorithm]> {
    match api_base.trim_end_matches('/') {
        DEFAULT_API_BASE => Some(&[DigestAlgorithm::Md5, DigestAlgorithm::Sha1]),
        EU_API_BASE => Some(&[DigestAlgorithm::Sha1, DigestAlgorithm::Sha256]),
        _ => None,
    }
}

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- sync ---
        if let Some(name) = &self.sync.sync_name {
            if name.is_empty() || name.contains('/') || name == "." || name == ".." {
                errors.push(ValidationError {
                    field: "sync.sync_name".into(),
                    message: format!("must be a single folder name, got {name:?}"),
                });
            }
        }

        // --- remote ---
        if !(self.remote.api_base.starts_with("http://")
            || self.remote.api_base.starts_with("https://"))
        {
            errors.push(ValidationError {
                field: "remote.api_base".into(),
                message: format!("must be an http(s) URL, got '{}'", self.remote.api_base),
            });
        }
        if self.remote.timeout_secs == 0 {
            errors.push(ValidationError {
                field: "remote.timeout_secs".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- validation ---
        if self.validation.chunk_size == 0 || self.validation.chunk_size > MAX_CHUNK_SIZE {
            errors.push(ValidationError {
                field: "validation.chunk_size".into(),
                message: format!("must be in range 1..={MAX_CHUNK_SIZE}"),
            });
        }
        if let Some(reported) = reported_digests(&self.remote.api_base) {
            if !reported.contains(&self.validation.digest) {
                errors.push(ValidationError {
                    field: "validation.digest".into(),
                    message: format!(
                        "{} does not report {} checksums",
                        self.remote.api_base, self.validation.digest
                    ),
                });
            }
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust
/// use pcsync_core::config::ConfigBuilder;
/// use pcsync_core::domain::DigestAlgorithm;
///
/// let config = ConfigBuilder::new()
///     .sync_name("Photos")
///     .validation_digest(DigestAlgorithm::Md5)
///     .logging_level("debug")
///     .build();
/// assert_eq!(config.sync.sync_name.as_deref(), Some("Photos"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Start from the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    // --- sync ---

    pub fn sync_name(mut self, name: impl Into<String>) -> Self {
        self.config.sync.sync_name = Some(name.into());
        self
    }

    // --- remote ---

    pub fn remote_api_base(mut self, url: impl Into<String>) -> Self {
        self.config.remote.api_base = url.into();
        self
    }

    pub fn remote_timeout_secs(mut self, seconds: u64) -> Self {
        self.config.remote.timeout_secs = seconds;
        self
    }

    // --- validation ---

    pub fn validation_digest(mut self, digest: DigestAlgorithm) -> Self {
        self.config.validation.digest = digest;
        self
    }

    pub fn validation_chunk_size(mut self, bytes: usize) -> Self {
        self.config.validation.chunk_size = bytes;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}
