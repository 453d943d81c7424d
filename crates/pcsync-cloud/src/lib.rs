//! pcsync Cloud - pCloud API client
//!
//! Provides:
//! - A thin async client for the pCloud JSON API
//! - An [`IRemoteStore`](pcsync_core::ports::IRemoteStore) adapter over it
//! - Loading of the read-only credential settings file
//!
//! ## Modules
//!
//! - [`client`] - HTTP client, one method per API call
//! - [`store`] - `IRemoteStore` implementation
//! - [`credentials`] - Access token settings file

pub mod client;
pub mod credentials;
pub mod store;

use pcsync_core::ports::StoreError;
use thiserror::Error;

/// pCloud `result` code: directory does not exist
pub const DIRECTORY_NOT_FOUND: u32 = 2005;

/// Result codes meaning the requested file or folder is missing
const MISSING_CODES: &[u32] = &[2002, DIRECTORY_NOT_FOUND, 2009];

/// Result codes meaning the token was rejected
const AUTH_CODES: &[u32] = &[1000, 2000, 2094, 2095];

/// Errors that can occur when communicating with the pCloud API
#[derive(Debug, Error)]
pub enum CloudError {
    /// The API answered with a non-zero `result`
    #[error("pCloud error {code}: {message}")]
    Api { code: u32, message: String },

    /// A network-level or HTTP status error occurred
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The API response could not be parsed or was malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl CloudError {
    /// The pCloud `result` code, for API errors
    pub fn code(&self) -> Option<u32> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// True if the file or folder addressed does not exist
    pub fn is_missing(&self) -> bool {
        self.code().is_some_and(|c| MISSING_CODES.contains(&c))
    }

    /// True if the access token was rejected
    pub fn is_auth_failure(&self) -> bool {
        self.code().is_some_and(|c| AUTH_CODES.contains(&c))
    }
}

impl From<CloudError> for StoreError {
    fn from(err: CloudError) -> Self {
        if err.is_auth_failure() {
            StoreError::AuthFailure(err.to_string())
        } else if err.is_missing() {
            StoreError::NotFound(err.to_string())
        } else {
            StoreError::Other(err.into())
        }
    }
}
