//! Integration tests for book file transfers.
//!
//! These tests verify the full download flow with mock HTTP servers.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bookproxy_core::HttpTimeouts;
use bookproxy_core::download::{
    FileStreamer, ProgressDisplay, TransferError, TransferProgress, copy_to_file,
};
use futures_util::{StreamExt, stream};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn streamer() -> FileStreamer {
    FileStreamer::new(HttpTimeouts::transfer()).expect("transfer client should build")
}

fn dir_entries(dir: &TempDir) -> Vec<String> {
    std::fs::read_dir(dir.path())
        .expect("read dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect()
}

#[tokio::test]
async fn test_stream_to_dir_writes_full_body_and_renames() {
    let server = MockServer::start().await;
    let content = vec![7u8; 1000];
    Mock::given(method("GET"))
        .and(path("/get.php"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.clone()))
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let saved = streamer()
        .stream_to_dir(
            &format!("{}/get.php?md5=X", server.uri()),
            temp_dir.path(),
            "Foo (2020 - Bar).pdf",
            ProgressDisplay::Hidden,
        )
        .await
        .expect("download should succeed")
        .expect("2xx should produce a file");

    assert_eq!(saved.bytes, 1000);
    assert_eq!(saved.path, temp_dir.path().join("Foo (2020 - Bar).pdf"));
    assert_eq!(std::fs::read(&saved.path).expect("read file"), content);
    assert_eq!(dir_entries(&temp_dir), vec!["Foo (2020 - Bar).pdf".to_string()]);
}

#[tokio::test]
async fn test_stream_to_dir_error_status_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get.php"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let saved = streamer()
        .stream_to_dir(
            &format!("{}/get.php?md5=X", server.uri()),
            temp_dir.path(),
            "book.pdf",
            ProgressDisplay::Hidden,
        )
        .await
        .expect("non-2xx is not an error");

    assert!(saved.is_none());
    assert!(dir_entries(&temp_dir).is_empty());
}

#[tokio::test]
async fn test_stream_to_dir_sanitizes_filename() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get.php"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"data".to_vec()))
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let saved = streamer()
        .stream_to_dir(
            &format!("{}/get.php", server.uri()),
            temp_dir.path(),
            "../A/B (1999 - C: D).epub",
            ProgressDisplay::Hidden,
        )
        .await
        .expect("download should succeed")
        .expect("file expected");

    assert_eq!(saved.path.parent(), Some(temp_dir.path()));
    assert_eq!(dir_entries(&temp_dir), vec![".._A_B (1999 - C_ D).epub".to_string()]);
}

#[tokio::test]
async fn test_open_reports_content_length_and_filename() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get.php"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 1000]))
        .mount(&server)
        .await;

    let transfer = streamer()
        .open(&format!("{}/get.php", server.uri()), "Foo (2020 - Bar).pdf")
        .await
        .expect("open should succeed")
        .expect("2xx expected");

    assert_eq!(transfer.content_length(), Some(1000));
    assert_eq!(transfer.filename(), "Foo (2020 - Bar).pdf");
}

#[tokio::test]
async fn test_copy_to_file_temp_exists_only_during_copy() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let temp_path = temp_dir.path().join("book.pdf.tmp");
    let final_path = temp_dir.path().join("book.pdf");
    let observed = Arc::new(AtomicUsize::new(0));

    let chunks: Vec<io::Result<Vec<u8>>> = (0..10).map(|_| Ok(vec![1u8; 100])).collect();
    let body = {
        let temp_path = temp_path.clone();
        let final_path = final_path.clone();
        let observed = Arc::clone(&observed);
        stream::iter(chunks).inspect(move |_| {
            assert!(temp_path.exists(), "temp file should exist during copy");
            assert!(!final_path.exists(), "final file must not exist before rename");
            observed.fetch_add(1, Ordering::SeqCst);
        })
    };

    let mut progress = TransferProgress::hidden();
    let saved = copy_to_file("http://files.test/book", body, temp_dir.path(), "book.pdf", &mut progress)
        .await
        .expect("copy should succeed");

    assert_eq!(observed.load(Ordering::SeqCst), 10);
    assert_eq!(saved.bytes, 1000);
    assert_eq!(progress.bytes(), 1000);
    assert_eq!(std::fs::metadata(&final_path).expect("final file").len(), 1000);
    assert!(!temp_path.exists());
}

#[tokio::test]
async fn test_copy_to_file_mid_stream_failure_never_creates_final_file() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let chunks: Vec<io::Result<Vec<u8>>> = vec![
        Ok(vec![1u8; 500]),
        Err(io::Error::new(io::ErrorKind::UnexpectedEof, "connection closed")),
        Ok(vec![1u8; 500]),
    ];

    let mut progress = TransferProgress::hidden();
    let err = copy_to_file(
        "http://files.test/book",
        stream::iter(chunks),
        temp_dir.path(),
        "book.pdf",
        &mut progress,
    )
    .await
    .expect_err("copy should fail");

    assert!(matches!(err, TransferError::Interrupted { .. }));
    assert_eq!(progress.bytes(), 500);
    assert!(dir_entries(&temp_dir).is_empty());
}
