//! Integration tests for folder listing and recursive traversal

use chrono::{TimeZone, Utc};
use serde_json::json;

use pcsync_core::domain::RemotePath;
use pcsync_core::ports::{IRemoteStore, StoreError};
use pcsync_sync::listing::list_remote_tree;

use crate::common;

fn remote(p: &str) -> RemotePath {
    RemotePath::new(p.to_string()).unwrap()
}

#[tokio::test]
async fn test_list_returns_files_and_folders() {
    let (server, store) = common::setup_pcloud_mock().await;
    common::mount_listfolder(
        &server,
        "/Photos",
        json!([
            common::file_json("/Photos/a.jpg", "Thu, 21 Mar 2013 18:31:53 +0000"),
            common::folder_json("/Photos/2024"),
        ]),
    )
    .await;

    let items = store.list(&remote("/Photos")).await.expect("list failed");

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].path, remote("/Photos/a.jpg"));
    assert!(!items[0].is_folder);
    assert_eq!(
        items[0].modified,
        Utc.with_ymd_and_hms(2013, 3, 21, 18, 31, 53).unwrap()
    );
    assert_eq!(items[1].path, remote("/Photos/2024"));
    assert!(items[1].is_folder);
}

#[tokio::test]
async fn test_list_builds_missing_item_paths() {
    let (server, store) = common::setup_pcloud_mock().await;
    common::mount_listfolder(
        &server,
        "/Docs",
        json!([{ "name": "note.md", "isfolder": false, "modified": "Mon, 01 Jan 2024 10:00:00 +0000" }]),
    )
    .await;

    let items = store.list(&remote("/Docs")).await.unwrap();
    assert_eq!(items[0].path, remote("/Docs/note.md"));
}

#[tokio::test]
async fn test_list_missing_folder_is_not_found() {
    let (server, store) = common::setup_pcloud_mock().await;
    common::mount_api_error(&server, "listfolder", "/Nope", 2005).await;

    let err = store.list(&remote("/Nope")).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn test_list_bad_token_is_auth_failure() {
    let (server, store) = common::setup_pcloud_mock().await;
    common::mount_api_error(&server, "listfolder", "/Photos", 2094).await;

    let err = store.list(&remote("/Photos")).await.unwrap_err();
    assert!(matches!(err, StoreError::AuthFailure(_)), "got {err:?}");
}

#[tokio::test]
async fn test_recursive_listing_over_http() {
    let (server, store) = common::setup_pcloud_mock().await;
    common::mount_listfolder(
        &server,
        "/sync",
        json!([
            common::file_json("/sync/top.txt", "Mon, 01 Jan 2024 10:00:00 +0000"),
            common::folder_json("/sync/foo"),
        ]),
    )
    .await;
    common::mount_listfolder(
        &server,
        "/sync/foo",
        json!([common::file_json("/sync/foo/1.txt", "Tue, 02 Jan 2024 10:00:00 +0000")]),
    )
    .await;

    let entries = list_remote_tree(&store, &remote("/sync")).await.unwrap();

    let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["/sync/foo/1.txt", "/sync/top.txt"]);
}

#[tokio::test]
async fn test_recursive_listing_missing_root_is_empty() {
    let (server, store) = common::setup_pcloud_mock().await;
    common::mount_api_error(&server, "listfolder", "/sync", 2005).await;

    let entries = list_remote_tree(&store, &remote("/sync")).await.unwrap();
    assert!(entries.is_empty());
}
