//! End-to-end crawl job tests: listing → pipeline → CSV and gallery

use crate::common::{article_html, listing_html, test_config};
use newsharvest::job::CrawlJob;
use newsharvest::models::{RunOutcome, StopReason};
use newsharvest::parser::NO_TITLE;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_ok(server: &MockServer, url_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(url_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Test three links where one times out produce two complete records
#[tokio::test]
async fn test_end_to_end_with_timeout() {
    let server = MockServer::start().await;

    mount_ok(
        &server,
        "/cong-nghe.htm",
        listing_html(&["/fast-1.htm", "/slow.htm", "/fast-2.htm"], false),
    )
    .await;
    mount_ok(&server, "/fast-1.htm", article_html("Bài một", "/img/1.jpg")).await;
    mount_ok(&server, "/fast-2.htm", article_html("Bài hai", "/img/missing.jpg")).await;

    Mock::given(method("GET"))
        .and(path("/slow.htm"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(article_html("Chậm", "/img/slow.jpg"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/img/1.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF]))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&server.uri(), dir.path());
    config.crawler.request_timeout_secs = 1;

    let job = CrawlJob::new(&config).unwrap();
    let summary = job.run().await.unwrap();

    assert_eq!(summary.links_discovered, 3);
    assert_eq!(summary.stop_reason, StopReason::NoNextPage);
    assert_eq!(summary.articles.succeeded, 2);
    assert_eq!(summary.articles.failed, 1);
    assert_eq!(summary.outcome(), RunOutcome::Partial);

    let bytes = std::fs::read(&config.output.csv_path).unwrap();
    let mut reader = csv::Reader::from_reader(&bytes[3..]);
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);

    assert_eq!(&rows[0][1], "Bài một");
    assert_eq!(&rows[1][1], "Bài hai");
    for row in &rows {
        assert_ne!(&row[1], NO_TITLE);
        assert!(row[3].starts_with("http://") || row[3].starts_with("https://"));
    }
    assert_eq!(&rows[0][3], format!("{}/img/1.jpg", server.uri()));
    assert!(!rows[0][4].is_empty());
    // Unmatched image path answers 404, so the record keeps its URL without a local copy
    assert_eq!(&rows[1][3], format!("{}/img/missing.jpg", server.uri()));
    assert_eq!(&rows[1][4], "");

    let gallery = std::fs::read_to_string(&config.output.gallery_path).unwrap();
    assert!(gallery.contains("Bài một"));
    assert!(gallery.contains("no_image.png"));
}

/// Test an empty category writes only the header and no gallery
#[tokio::test]
async fn test_no_articles_skips_output() {
    let server = MockServer::start().await;
    mount_ok(&server, "/cong-nghe.htm", "<html><body></body></html>".to_string()).await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server.uri(), dir.path());

    let summary = CrawlJob::new(&config).unwrap().run().await.unwrap();

    assert_eq!(summary.outcome(), RunOutcome::NoArticles);
    assert_eq!(summary.stop_reason, StopReason::NoArticles);
    assert!(!config.output.gallery_path.exists());

    let bytes = std::fs::read(&config.output.csv_path).unwrap();
    let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
    assert_eq!(text.lines().count(), 1);
}

/// Test two runs append to the same CSV with a single header
#[tokio::test]
async fn test_two_runs_append() {
    let server = MockServer::start().await;
    mount_ok(&server, "/cong-nghe.htm", listing_html(&["/a.htm"], false)).await;
    mount_ok(&server, "/a.htm", article_html("Bài A", "")).await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server.uri(), dir.path());

    let job = CrawlJob::new(&config).unwrap();
    job.run().await.unwrap();
    job.run().await.unwrap();

    let bytes = std::fs::read(&config.output.csv_path).unwrap();
    let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
    assert_eq!(text.matches("category,title").count(), 1);

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    assert_eq!(reader.records().count(), 2);
}
