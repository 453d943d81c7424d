//! Integration tests for downloads, uploads and folder creation

use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use pcsync_core::domain::RemotePath;
use pcsync_core::ports::{IRemoteStore, StoreError};

use crate::common;

fn remote(p: &str) -> RemotePath {
    RemotePath::new(p.to_string()).unwrap()
}

// ============================================================================
// Download tests
// ============================================================================

#[tokio::test]
async fn test_download_file_returns_content() {
    let (server, store) = common::setup_pcloud_mock().await;
    let content = b"Hello, pCloud! This is test content.";
    common::mount_download(&server, "/sync/a.txt", content).await;

    let data = store.read(&remote("/sync/a.txt")).await.expect("Download failed");
    assert_eq!(data, content);
}

#[tokio::test]
async fn test_download_empty_file() {
    let (server, store) = common::setup_pcloud_mock().await;
    common::mount_download(&server, "/sync/empty", &[]).await;

    let data = store.read(&remote("/sync/empty")).await.unwrap();
    assert!(data.is_empty());
}

#[tokio::test]
async fn test_download_missing_file_is_not_found() {
    let (server, store) = common::setup_pcloud_mock().await;
    common::mount_api_error(&server, "getfilelink", "/sync/gone", 2009).await;

    let err = store.read(&remote("/sync/gone")).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)), "got {err:?}");
}

// ============================================================================
// Upload tests
// ============================================================================

#[tokio::test]
async fn test_upload_sends_multipart_with_target() {
    let (server, store) = common::setup_pcloud_mock().await;
    Mock::given(method("POST"))
        .and(path("/uploadfile"))
        .and(query_param("access_token", common::TOKEN))
        .and(query_param("path", "/sync/docs"))
        .and(query_param("filename", "report.txt"))
        .and(query_param("nopartial", "1"))
        .and(body_string_contains("quarterly numbers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": 0,
            "fileids": [42],
            "metadata": [common::file_json("/sync/docs/report.txt", "Mon, 01 Jan 2024 00:00:00 +0000")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    store
        .write(&remote("/sync/docs/report.txt"), b"quarterly numbers")
        .await
        .expect("Upload failed");
}

#[tokio::test]
async fn test_upload_into_missing_folder_is_parent_missing() {
    let (server, store) = common::setup_pcloud_mock().await;
    Mock::given(method("POST"))
        .and(path("/uploadfile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": 2005,
            "error": "Directory does not exist."
        })))
        .mount(&server)
        .await;

    let err = store
        .write(&remote("/sync/new/a.txt"), b"x")
        .await
        .unwrap_err();
    assert!(
        matches!(err, StoreError::ParentMissing(ref folder) if folder == "/sync/new"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_upload_server_error_is_other() {
    let (server, store) = common::setup_pcloud_mock().await;
    Mock::given(method("POST"))
        .and(path("/uploadfile"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = store.write(&remote("/sync/a.txt"), b"x").await.unwrap_err();
    assert!(matches!(err, StoreError::Other(_)), "got {err:?}");
}

// ============================================================================
// Folder creation
// ============================================================================

#[tokio::test]
async fn test_make_parents_creates_each_ancestor() {
    let (server, store) = common::setup_pcloud_mock().await;
    common::mount_create_folder(&server, "/sync", 1).await;
    common::mount_create_folder(&server, "/sync/a", 1).await;
    common::mount_create_folder(&server, "/sync/a/b", 1).await;

    store.make_parents(&remote("/sync/a/b")).await.unwrap();
}

#[tokio::test]
async fn test_make_parents_is_idempotent() {
    let (server, store) = common::setup_pcloud_mock().await;
    common::mount_create_folder(&server, "/sync", 2).await;

    store.make_parents(&remote("/sync")).await.unwrap();
    store.make_parents(&remote("/sync")).await.unwrap();
}
