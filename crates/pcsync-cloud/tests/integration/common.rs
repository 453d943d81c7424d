//! Shared test helpers for pCloud API integration tests
//!
//! Provides wiremock-based mock server setup for pCloud API endpoints.
//! Each helper mounts one endpoint; the setup function returns a store
//! whose client points at the mock server.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pcsync_cloud::client::PCloudClient;
use pcsync_cloud::store::PCloudStore;

pub const TOKEN: &str = "test-access-token";

/// Starts a mock server and returns a (MockServer, PCloudStore) tuple.
pub async fn setup_pcloud_mock() -> (MockServer, PCloudStore) {
    let server = MockServer::start().await;
    let client = PCloudClient::with_base_url(TOKEN, server.uri());
    (server, PCloudStore::new(client))
}

/// JSON for one file entry of a folder listing.
pub fn file_json(full_path: &str, modified: &str) -> serde_json::Value {
    json!({
        "name": full_path.rsplit('/').next().unwrap_or(full_path),
        "path": full_path,
        "isfolder": false,
        "modified": modified
    })
}

/// JSON for one folder entry of a folder listing.
pub fn folder_json(full_path: &str) -> serde_json::Value {
    json!({
        "name": full_path.rsplit('/').next().unwrap_or(full_path),
        "path": full_path,
        "isfolder": true,
        "modified": "Mon, 01 Jan 2024 00:00:00 +0000"
    })
}

/// Mounts `listfolder` for `folder` returning `contents`.
pub async fn mount_listfolder(server: &MockServer, folder: &str, contents: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/listfolder"))
        .and(query_param("path", folder))
        .and(query_param("access_token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": 0,
            "metadata": {
                "name": folder.rsplit('/').next().unwrap_or(""),
                "path": folder,
                "isfolder": true,
                "modified": "Mon, 01 Jan 2024 00:00:00 +0000",
                "contents": contents
            }
        })))
        .mount(server)
        .await;
}

/// Mounts an API method that answers with a pCloud error result.
pub async fn mount_api_error(server: &MockServer, api_method: &str, target: &str, code: u32) {
    Mock::given(method("GET"))
        .and(path(format!("/{api_method}")))
        .and(query_param("path", target))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": code,
            "error": "Directory does not exist."
        })))
        .mount(server)
        .await;
}

/// Mounts `getfilelink` plus the content URL it points to.
pub async fn mount_download(server: &MockServer, remote_path: &str, content: &[u8]) {
    let link_path = format!("/dl/abc123{remote_path}");

    Mock::given(method("GET"))
        .and(path("/getfilelink"))
        .and(query_param("path", remote_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": 0,
            "hosts": [server.address().to_string(), "unused.example.com"],
            "path": link_path
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(link_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(content.to_vec())
                .insert_header("content-type", "application/octet-stream"),
        )
        .mount(server)
        .await;
}

/// Mounts `createfolderifnotexists` for one folder, expecting `times` calls.
pub async fn mount_create_folder(server: &MockServer, folder: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path("/createfolderifnotexists"))
        .and(query_param("path", folder))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": 0,
            "created": false,
            "metadata": folder_json(folder)
        })))
        .expect(times)
        .mount(server)
        .await;
}
