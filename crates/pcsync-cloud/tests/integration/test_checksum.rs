//! Integration tests for remote checksums

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pcsync_core::config::Config;
use pcsync_core::domain::{DigestAlgorithm, RemotePath};
use pcsync_core::ports::{IRemoteStore, StoreError};
use pcsync_sync::listing::hash_remote_tree;

use crate::common;

const MD5_ABC: &str = "900150983cd24fb0d6963f7d28e17f72";
const SHA1_ABC: &str = "a9993e364706816aba3e25717850c26c9cd0d89d";
const SHA256_ABC: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

fn remote(p: &str) -> RemotePath {
    RemotePath::new(p.to_string()).unwrap()
}

async fn mount_checksum(server: &MockServer, file: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/checksumfile"))
        .and(query_param("path", file))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// `checksumfile` as answered for a US-region account
fn us_checksum_body(file: &str) -> serde_json::Value {
    json!({
        "result": 0,
        "md5": MD5_ABC,
        "sha1": SHA1_ABC,
        "metadata": common::file_json(file, "Mon, 01 Jan 2024 00:00:00 +0000")
    })
}

/// `checksumfile` as answered for an EU-region account
fn eu_checksum_body(file: &str) -> serde_json::Value {
    json!({
        "result": 0,
        "sha1": SHA1_ABC,
        "sha256": SHA256_ABC,
        "metadata": common::file_json(file, "Mon, 01 Jan 2024 00:00:00 +0000")
    })
}

#[tokio::test]
async fn test_us_checksum_reports_md5_and_sha1() {
    let (server, store) = common::setup_pcloud_mock().await;
    mount_checksum(&server, "/sync/a.txt", us_checksum_body("/sync/a.txt")).await;

    let md5 = store
        .checksum(&remote("/sync/a.txt"), DigestAlgorithm::Md5)
        .await
        .unwrap();
    assert_eq!(md5.as_str(), MD5_ABC);
    assert_eq!(md5.algorithm(), DigestAlgorithm::Md5);

    let sha1 = store
        .checksum(&remote("/sync/a.txt"), DigestAlgorithm::Sha1)
        .await
        .unwrap();
    assert_eq!(sha1.as_str(), SHA1_ABC);
}

#[tokio::test]
async fn test_eu_checksum_returns_sha256() {
    let (server, store) = common::setup_pcloud_mock().await;
    mount_checksum(&server, "/sync/a.txt", eu_checksum_body("/sync/a.txt")).await;

    let hash = store
        .checksum(&remote("/sync/a.txt"), DigestAlgorithm::Sha256)
        .await
        .unwrap();
    assert_eq!(hash.as_str(), SHA256_ABC);
    assert_eq!(hash.algorithm(), DigestAlgorithm::Sha256);
}

#[tokio::test]
async fn test_unreported_digest_is_error() {
    let (server, store) = common::setup_pcloud_mock().await;
    mount_checksum(&server, "/sync/a.txt", us_checksum_body("/sync/a.txt")).await;

    let err = store
        .checksum(&remote("/sync/a.txt"), DigestAlgorithm::Sha256)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("sha256"), "got {err}");
}

#[tokio::test]
async fn test_checksum_missing_file_is_not_found() {
    let (server, store) = common::setup_pcloud_mock().await;
    common::mount_api_error(&server, "checksumfile", "/sync/gone", 2009).await;

    let err = store
        .checksum(&remote("/sync/gone"), DigestAlgorithm::Sha256)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn test_hash_remote_tree_with_default_digest() {
    let (server, store) = common::setup_pcloud_mock().await;
    common::mount_listfolder(
        &server,
        "/Backup",
        json!([common::file_json("/Backup/abc.txt", "Mon, 01 Jan 2024 00:00:00 +0000")]),
    )
    .await;
    mount_checksum(&server, "/Backup/abc.txt", us_checksum_body("/Backup/abc.txt")).await;

    let digest = Config::default().validation.digest;
    let hashes = hash_remote_tree(&store, &remote("/Backup"), digest)
        .await
        .unwrap();

    assert_eq!(hashes.len(), 1);
    assert_eq!(hashes[0].path.as_str(), "abc.txt");
    assert_eq!(hashes[0].signal.as_str(), SHA1_ABC);
}
