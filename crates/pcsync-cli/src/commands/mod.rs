//! CLI command implementations
//!
//! Each subcommand owns its clap arguments and an `execute` method. Shared
//! wiring (local root resolution, the pCloud store) lives here.

pub mod completions;
pub mod sync;
pub mod validate;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use pcsync_cloud::client::PCloudClient;
use pcsync_cloud::credentials::CredentialFile;
use pcsync_cloud::store::PCloudStore;
use pcsync_core::config::Config;
use pcsync_core::domain::SyncPath;
use pcsync_sync::filesystem::LocalFileSystemAdapter;
use tracing::info;

use crate::output::{get_formatter, OutputFormat, OutputFormatter};

/// Settings shared by every command, built once in `main`
pub struct CliContext {
    pub format: OutputFormat,
    pub config: Config,
    pub quiet: bool,
}

impl CliContext {
    pub fn new(format: OutputFormat, config: Config, quiet: bool) -> Self {
        Self {
            format,
            config,
            quiet,
        }
    }

    pub fn formatter(&self) -> Box<dyn OutputFormatter> {
        get_formatter(self.format, self.quiet)
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Local adapter using the configured digest and buffer size
    pub fn local_store(&self) -> LocalFileSystemAdapter {
        let validation = &self.config.validation;
        LocalFileSystemAdapter::new(validation.digest, validation.chunk_size)
    }

    /// Builds the pCloud store from the credential settings file
    ///
    /// An `api_base` in the settings file overrides `remote.api_base`.
    pub fn remote_store(&self, settings: Option<&Path>) -> Result<PCloudStore> {
        let path = settings
            .map(Path::to_path_buf)
            .unwrap_or_else(Config::default_settings_path);
        let credentials = CredentialFile::load(&path)?;

        let remote = &self.config.remote;
        let api_base = credentials
            .api_base
            .clone()
            .unwrap_or_else(|| remote.api_base.clone());
        info!(settings = %path.display(), api_base = %api_base, "Loaded credentials");

        let client = PCloudClient::with_options(
            credentials.access_token,
            api_base,
            Duration::from_secs(remote.timeout_secs),
        )
        .context("Failed to build HTTP client")?;
        Ok(PCloudStore::new(client))
    }
}

/// Absolute, normalized form of a user-supplied local root
///
/// Symlinks are kept as given so the sync name is the name the user typed.
pub fn resolve_local_root(path: &Path) -> Result<SyncPath> {
    if !path.exists() {
        bail!("Can't access {}", path.display());
    }
    let absolute: PathBuf = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("Failed to read the current directory")?
            .join(path)
    };
    Ok(SyncPath::new(absolute)?)
}
