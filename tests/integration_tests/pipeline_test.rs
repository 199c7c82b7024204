//! Article pipeline integration tests

use crate::common::{article_html, test_config};
use newsharvest::config::Config;
use newsharvest::crawler::{ArticlePipeline, ImageFetcher, SiteFetcher};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pipeline(config: &Config) -> ArticlePipeline {
    let fetcher = Arc::new(SiteFetcher::new(config).unwrap());
    let images = ImageFetcher::new(Arc::clone(&fetcher), &config.output.image_dir).unwrap();
    ArticlePipeline::new(fetcher, images, config)
}

async fn mount_article(server: &MockServer, name: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/{name}.htm")))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(article_html(name, &format!("/img/{name}.png"))),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/img/{name}.png")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, 0x50, 0x4E, 0x47]))
        .mount(server)
        .await;
}

/// Test a failing second link leaves the others in order
#[tokio::test]
async fn test_failed_link_skipped_order_kept() {
    let server = MockServer::start().await;
    for name in ["one", "three", "four"] {
        mount_article(&server, name).await;
    }
    Mock::given(method("GET"))
        .and(path("/two.htm"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server.uri(), dir.path());
    let links: Vec<String> = ["one", "two", "three", "four"]
        .iter()
        .map(|n| format!("{}/{n}.htm", server.uri()))
        .collect();

    let (records, stats) = pipeline(&config).run_with_stats(&links).await;

    let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["one", "three", "four"]);
    assert_eq!(stats.attempted, 4);
    assert_eq!(stats.succeeded, 3);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.images_downloaded, 3);
}

/// Test concurrent processing keeps link order
#[tokio::test]
async fn test_concurrency_preserves_order() {
    let server = MockServer::start().await;
    let names = ["a1", "a2", "a3", "a4", "a5"];
    for name in names {
        mount_article(&server, name).await;
    }

    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&server.uri(), dir.path());
    config.crawler.article_concurrency = 3;
    let links: Vec<String> = names
        .iter()
        .map(|n| format!("{}/{n}.htm", server.uri()))
        .collect();

    let records = pipeline(&config).run(&links).await;

    let urls: Vec<&str> = records.iter().map(|r| r.article_url.as_str()).collect();
    let expected: Vec<&str> = links.iter().map(String::as_str).collect();
    assert_eq!(urls, expected);
}

/// Test record fields are populated from the page
#[tokio::test]
async fn test_record_fields() {
    let server = MockServer::start().await;
    mount_article(&server, "detail").await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server.uri(), dir.path());
    let url = format!("{}/detail.htm", server.uri());

    let records = pipeline(&config).run(&[url.clone()]).await;
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.category, "Công nghệ");
    assert_eq!(record.title, "detail");
    assert_eq!(record.description, "Tóm tắt detail");
    assert_eq!(record.content, "Nội dung detail");
    assert_eq!(record.article_url, url);
    assert_eq!(
        record.image_url.as_deref(),
        Some(format!("{}/img/detail.png", server.uri()).as_str())
    );

    let local = record.local_image_path.as_ref().unwrap();
    assert!(local.exists());
    assert!(local.starts_with(&config.output.image_dir));
    assert_eq!(local.extension().unwrap(), "png");
}

/// Test an image failure keeps the record without a local path
#[tokio::test]
async fn test_image_failure_keeps_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/noimg.htm"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_html("noimg", "/gone.jpg")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server.uri(), dir.path());

    let (records, stats) = pipeline(&config)
        .run_with_stats(&[format!("{}/noimg.htm", server.uri())])
        .await;

    assert_eq!(records.len(), 1);
    assert!(records[0].image_url.is_some());
    assert!(records[0].local_image_path.is_none());
    assert_eq!(stats.images_failed, 1);
    assert_eq!(std::fs::read_dir(&config.output.image_dir).unwrap().count(), 0);
}

/// Test an empty link list yields nothing
#[tokio::test]
async fn test_empty_links() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config("http://127.0.0.1:9", dir.path());

    let (records, stats) = pipeline(&config).run_with_stats(&[]).await;
    assert!(records.is_empty());
    assert_eq!(stats.attempted, 0);
}
