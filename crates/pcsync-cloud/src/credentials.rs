//! Credential settings file
//!
//! A small JSON document holding the pCloud access token:
//!
//! ```json
//! { "access_token": "...", "api_base": "https://eapi.pcloud.com" }
//! ```
//!
//! `api_base` is optional. The file is only ever read.

use std::fmt;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Contents of the settings file
#[derive(Clone, Deserialize)]
pub struct CredentialFile {
    pub access_token: String,
    #[serde(default)]
    pub api_base: Option<String>,
}

impl CredentialFile {
    /// Read and check the settings file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_context(|| {
            format!(
                "Can't read settings file {}; create it with {{\"access_token\": \"<token>\"}}",
                path.display()
            )
        })?;
        let credentials: CredentialFile = serde_json::from_str(&content)
            .with_context(|| format!("Malformed settings file {}", path.display()))?;

        if credentials.access_token.trim().is_empty() {
            bail!("Settings file {} has an empty access_token", path.display());
        }
        Ok(credentials)
    }
}

impl fmt::Debug for CredentialFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialFile")
            .field("access_token", &"<redacted>")
            .field("api_base", &self.api_base)
            .finish()
    }
}
