//! pCloud API client
//!
//! Provides a typed HTTP client for the pCloud JSON API. Every call is a
//! plain HTTP request to `<base_url>/<method>` with the access token passed
//! as the `access_token` query parameter. Errors come back as HTTP 200 with
//! a non-zero `result` field, which this client turns into
//! [`CloudError::Api`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pcsync_cloud::client::PCloudClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = PCloudClient::new("access-token-here");
//! for item in client.list_folder("/Photos").await? {
//!     println!("{} {}", item.name, item.modified);
//! }
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{multipart, Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::CloudError;

/// Base URL for the pCloud API (US region; EU accounts use `eapi.pcloud.com`)
pub const PCLOUD_BASE_URL: &str = "https://api.pcloud.com";

// ============================================================================
// pCloud API response types
// ============================================================================

/// Error envelope shared by every response
#[derive(Debug, Deserialize)]
struct Envelope {
    result: u32,
    #[serde(default)]
    error: Option<String>,
}

/// File or folder metadata
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    /// Item name
    pub name: String,
    /// Full path; only present when the listing was requested by path
    #[serde(default)]
    pub path: Option<String>,
    /// Whether this item is a folder
    #[serde(default)]
    pub isfolder: bool,
    /// Last modification, RFC 2822 (e.g. `Thu, 21 Mar 2013 18:31:53 +0000`)
    pub modified: String,
    /// Child items; only present on folder listings
    #[serde(default)]
    pub contents: Vec<Metadata>,
}

impl Metadata {
    /// Parse the RFC 2822 `modified` field
    pub fn modified_at(&self) -> Result<DateTime<Utc>, CloudError> {
        DateTime::parse_from_rfc2822(&self.modified)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                CloudError::InvalidResponse(format!("bad modified date {:?}: {e}", self.modified))
            })
    }
}

/// Response from `listfolder`
#[derive(Debug, Deserialize)]
struct ListFolderResponse {
    metadata: Metadata,
}

/// Response from `getfilelink`
#[derive(Debug, Deserialize)]
struct FileLinkResponse {
    hosts: Vec<String>,
    path: String,
}

/// Response from `checksumfile`
///
/// US-region accounts report `sha1` and `md5`, EU-region accounts `sha1` and
/// `sha256`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChecksumResponse {
    #[serde(default)]
    pub sha256: Option<String>,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub md5: Option<String>,
    pub metadata: Metadata,
}

// ============================================================================
// PCloudClient
// ============================================================================

/// HTTP client for pCloud API calls
pub struct PCloudClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for API requests
    base_url: String,
    /// Current OAuth2 access token
    access_token: String,
}

impl PCloudClient {
    /// Creates a client for the default API endpoint
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_url(access_token, PCLOUD_BASE_URL)
    }

    /// Creates a client with a custom base URL (EU region, or tests)
    pub fn with_base_url(access_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    /// Creates a client with a custom base URL and per-request timeout
    pub fn with_options(
        access_token: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CloudError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            ..Self::with_base_url(access_token, base_url)
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Creates an authenticated GET request for an API method
    fn get(&self, method: &str) -> RequestBuilder {
        self.client
            .get(format!("{}/{method}", self.base_url))
            .query(&[("access_token", self.access_token.as_str())])
    }

    /// Sends a request and decodes the body, mapping a non-zero `result`
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, CloudError> {
        let value: serde_json::Value = request.send().await?.error_for_status()?.json().await?;
        check_result(&value)?;
        serde_json::from_value(value).map_err(|e| CloudError::InvalidResponse(e.to_string()))
    }

    /// Scheme for download links; follows the API base so tests can use http
    fn link_scheme(&self) -> &'static str {
        if self.base_url.starts_with("http://") {
            "http"
        } else {
            "https"
        }
    }

    // ------------------------------------------------------------------------
    // API calls
    // ------------------------------------------------------------------------

    /// Lists the direct children of a folder
    ///
    /// Items without a `path` get one built from `path` and their name.
    #[instrument(skip(self))]
    pub async fn list_folder(&self, path: &str) -> Result<Vec<Metadata>, CloudError> {
        let response: ListFolderResponse =
            self.send(self.get("listfolder").query(&[("path", path)])).await?;

        let parent = path.trim_end_matches('/');
        let items: Vec<Metadata> = response
            .metadata
            .contents
            .into_iter()
            .map(|mut item| {
                if item.path.is_none() {
                    item.path = Some(format!("{parent}/{}", item.name));
                }
                item
            })
            .collect();

        debug!(count = items.len(), "Folder listed");
        Ok(items)
    }

    /// Downloads a file's content
    ///
    /// Asks for a download link first, then fetches it from the first host.
    #[instrument(skip(self))]
    pub async fn download(&self, path: &str) -> Result<Vec<u8>, CloudError> {
        let link: FileLinkResponse = self
            .send(self.get("getfilelink").query(&[("path", path)]))
            .await?;
        let host = link
            .hosts
            .first()
            .ok_or_else(|| CloudError::InvalidResponse("getfilelink returned no hosts".into()))?;
        let url = format!("{}://{host}{}", self.link_scheme(), link.path);

        debug!(%url, "Fetching file content");
        let bytes = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        debug!(bytes = bytes.len(), "Download complete");
        Ok(bytes.to_vec())
    }

    /// Uploads `data` as `folder/filename`, replacing any existing file
    ///
    /// Fails with result 2005 when `folder` does not exist.
    #[instrument(skip(self, data), fields(bytes = data.len()))]
    pub async fn upload(&self, folder: &str, filename: &str, data: &[u8]) -> Result<(), CloudError> {
        let part = multipart::Part::bytes(data.to_vec()).file_name(filename.to_string());
        let form = multipart::Form::new().part("file", part);

        let request = self
            .client
            .post(format!("{}/uploadfile", self.base_url))
            .query(&[
                ("access_token", self.access_token.as_str()),
                ("path", folder),
                ("filename", filename),
                ("nopartial", "1"),
            ])
            .multipart(form);

        let _: serde_json::Value = self.send(request).await?;
        debug!("Upload complete");
        Ok(())
    }

    /// Creates a folder; an existing folder is not an error
    #[instrument(skip(self))]
    pub async fn create_folder_if_not_exists(&self, path: &str) -> Result<(), CloudError> {
        let _: serde_json::Value = self
            .send(self.get("createfolderifnotexists").query(&[("path", path)]))
            .await?;
        Ok(())
    }

    /// Returns the checksums the server keeps for a file
    #[instrument(skip(self))]
    pub async fn checksum_file(&self, path: &str) -> Result<ChecksumResponse, CloudError> {
        self.send(self.get("checksumfile").query(&[("path", path)]))
            .await
    }
}

/// Maps a non-zero `result` to [`CloudError::Api`]
fn check_result(value: &serde_json::Value) -> Result<(), CloudError> {
    let envelope: Envelope = serde_json::from_value(value.clone())
        .map_err(|e| CloudError::InvalidResponse(format!("missing result field: {e}")))?;

    if envelope.result == 0 {
        return Ok(());
    }
    Err(CloudError::Api {
        code: envelope.result,
        message: envelope.error.unwrap_or_else(|| "unknown error".into()),
    })
}
