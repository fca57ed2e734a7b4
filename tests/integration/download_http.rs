//! HTTP-level tests for the streaming downloader.

use tempfile::TempDir;
use toolup::download::{Downloader, HttpDownloader};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_fetch_writes_body_to_destination() {
    toolup::test_utils::init_test_logging(None);
    let server = MockServer::start().await;
    let body = vec![0xABu8; 64 * 1024];
    Mock::given(method("GET"))
        .and(path("/installer.tar.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("installation.tar.gz");

    let downloader = HttpDownloader::new();
    let written = downloader
        .fetch(&format!("{}/installer.tar.gz", server.uri()), &dest)
        .await
        .unwrap();

    assert_eq!(written, body.len() as u64);
    assert_eq!(std::fs::read(&dest).unwrap(), body);
}

#[tokio::test]
async fn test_fetch_empty_body() {
    toolup::test_utils::init_test_logging(None);
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("empty.bin");

    let downloader = HttpDownloader::new();
    let written = downloader.fetch(&format!("{}/empty", server.uri()), &dest).await.unwrap();

    assert_eq!(written, 0);
    assert!(dest.exists());
}

#[tokio::test]
async fn test_fetch_rejects_error_status() {
    toolup::test_utils::init_test_logging(None);
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.tar.gz"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("missing.tar.gz");

    let downloader = HttpDownloader::new();
    let err = downloader
        .fetch(&format!("{}/missing.tar.gz", server.uri()), &dest)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("404"), "error was: {err:#}");
}

#[tokio::test]
async fn test_fetch_unreachable_host_fails() {
    toolup::test_utils::init_test_logging(None);
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("never.tar.gz");

    let downloader = HttpDownloader::new();
    let err = downloader.fetch("http://127.0.0.1:1/never.tar.gz", &dest).await.unwrap_err();

    assert!(err.to_string().contains("Failed to request"), "error was: {err:#}");
}
