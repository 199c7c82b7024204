//! Error handling scenarios
//!
//! Recoverable failures are absorbed per unit of work; configuration and
//! storage problems surface as fatal errors before or during a run.

use crate::common::test_config;
use newsharvest::crawler::{ImageFetcher, SiteFetcher};
use newsharvest::error::{Error, ErrorCategory};
use newsharvest::job::CrawlJob;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test an empty image URL never reaches the network
#[tokio::test]
async fn test_empty_image_url_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server.uri(), dir.path());
    let fetcher = Arc::new(SiteFetcher::new(&config).unwrap());
    let images = ImageFetcher::new(fetcher, &config.output.image_dir).unwrap();

    assert_eq!(images.download("", "Tiêu đề").await, None);
}

/// Test a successful download writes the body under a sanitized name
#[tokio::test]
async fn test_image_download_writes_file() {
    let server = MockServer::start().await;
    let body: Vec<u8> = (0..=255u8).cycle().take(64 * 1024).collect();

    Mock::given(method("GET"))
        .and(path("/photos/lead.WEBP"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server.uri(), dir.path());
    let fetcher = Arc::new(SiteFetcher::new(&config).unwrap());
    let images = ImageFetcher::new(fetcher, &config.output.image_dir).unwrap();

    let saved = images
        .download(
            &format!("{}/photos/lead.WEBP", server.uri()),
            "Điện thoại: mới/2024",
        )
        .await
        .unwrap();

    let name = saved.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("Điện_thoại__mới_2024_"));
    assert!(name.ends_with(".webp"));
    assert_eq!(std::fs::read(&saved).unwrap(), body);
}

/// Test same-title downloads get distinct files and a failure between them removes nothing
#[tokio::test]
async fn test_same_label_downloads_keep_every_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg-bytes".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server.uri(), dir.path());
    let fetcher = Arc::new(SiteFetcher::new(&config).unwrap());
    let images = ImageFetcher::new(fetcher, &config.output.image_dir).unwrap();

    let ok = format!("{}/ok.jpg", server.uri());
    let missing = format!("{}/missing.jpg", server.uri());
    let label = "Không có tiêu đề";

    let mut saved = Vec::new();
    for _ in 0..20 {
        saved.push(images.download(&ok, label).await.unwrap());
        assert_eq!(images.download(&missing, label).await, None);
    }

    let unique: std::collections::HashSet<_> = saved.iter().collect();
    assert_eq!(unique.len(), saved.len());
    for path in &saved {
        assert_eq!(std::fs::read(path).unwrap(), b"jpeg-bytes");
    }
    assert_eq!(
        std::fs::read_dir(&config.output.image_dir).unwrap().count(),
        saved.len()
    );
}

/// Serve one response that promises more body than it sends, then hang up
fn truncated_body_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        stream
            .write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: image/jpeg\r\nContent-Length: 4096\r\nConnection: close\r\n\r\npartial-bytes",
            )
            .unwrap();
        stream.flush().unwrap();
    });

    format!("http://{addr}")
}

/// Test a body cut off midway leaves no file behind
#[tokio::test]
async fn test_truncated_image_body_removes_partial_file() {
    let base = truncated_body_server();

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&base, dir.path());
    let fetcher = Arc::new(SiteFetcher::new(&config).unwrap());
    let images = ImageFetcher::new(fetcher, &config.output.image_dir).unwrap();

    let saved = images.download(&format!("{base}/cut.jpg"), "Ảnh dở dang").await;

    assert_eq!(saved, None);
    assert_eq!(
        std::fs::read_dir(&config.output.image_dir).unwrap().count(),
        0
    );
}

/// Test an image directory blocked by a file is a fatal setup error
#[tokio::test]
async fn test_unusable_image_dir_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let mut config = test_config("http://127.0.0.1:9", dir.path());
    config.output.image_dir = blocker.join("images");

    let err = CrawlJob::new(&config).err().unwrap();
    assert!(!err.is_recoverable());
    assert_eq!(err.category(), ErrorCategory::Config);
}

/// Test an unwritable CSV location is a fatal storage error
#[tokio::test]
async fn test_unwritable_csv_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let mut config = test_config("http://127.0.0.1:9", dir.path());
    config.output.csv_path = blocker.join("articles.csv");

    let err = CrawlJob::new(&config).err().unwrap();
    assert!(matches!(err, Error::Storage(_)));
    assert_eq!(err.category(), ErrorCategory::Storage);
}

/// Test an unreachable site still completes the run with nothing collected
#[tokio::test]
async fn test_unreachable_site_yields_empty_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config("http://127.0.0.1:9", dir.path());
    config.crawler.max_pages = 2;
    config.crawler.request_timeout_secs = 1;

    let summary = CrawlJob::new(&config).unwrap().run().await.unwrap();

    assert_eq!(summary.pages_failed, 2);
    assert_eq!(summary.links_discovered, 0);
    assert_eq!(summary.articles.attempted, 0);
}
