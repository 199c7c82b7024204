//! Common test utilities

#![allow(dead_code)]

use chrono::{Local, TimeZone};
use newsharvest::config::Config;
use newsharvest::models::ArticleRecord;
use std::path::Path;

/// Test fixture directory
pub const FIXTURES_DIR: &str = "tests/fixtures/html";

/// Load an HTML fixture by file name
pub fn load_fixture(filename: &str) -> String {
    let path = format!("{FIXTURES_DIR}/{filename}");
    std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to load fixture: {path}"))
}

/// Configuration pointing at a mock server, writing into `out_dir`
pub fn test_config(base_url: &str, out_dir: &Path) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.crawler.requests_per_second = 0;
    config.crawler.request_timeout_secs = 5;
    config.output.csv_path = out_dir.join("articles.csv");
    config.output.gallery_path = out_dir.join("gallery.html");
    config.output.image_dir = out_dir.join("images");
    config
}

/// Create a record with default values
pub fn create_test_record(title: &str) -> ArticleRecord {
    ArticleRecord {
        category: "Công nghệ".to_string(),
        title: title.to_string(),
        description: "Tóm tắt bài viết".to_string(),
        image_url: Some("https://cdn.example.com/a.jpg".to_string()),
        local_image_path: None,
        content: "Đoạn một.\nĐoạn hai.".to_string(),
        article_url: format!("https://dantri.com.vn/cong-nghe/{}.htm", title.len()),
        scraped_at: Local.with_ymd_and_hms(2024, 5, 1, 6, 0, 0).unwrap(),
    }
}

/// Minimal listing page with the given article hrefs
pub fn listing_html(hrefs: &[&str], has_next: bool) -> String {
    let items: String = hrefs
        .iter()
        .map(|href| format!(r#"<article class="article-item"><a href="{href}">x</a></article>"#))
        .collect();
    let next = if has_next {
        r#"<a class="page-next" href="next.htm">Trang sau</a>"#
    } else {
        ""
    };
    format!("<html><body>{items}{next}</body></html>")
}

/// Minimal article page
pub fn article_html(title: &str, image_src: &str) -> String {
    format!(
        r#"<html><body>
            <h1 class="title-page">{title}</h1>
            <div class="singular-sapo">Tóm tắt {title}</div>
            <figure class="singular-image"><img data-src="{image_src}"></figure>
            <div class="singular-content"><p>Nội dung {title}</p></div>
        </body></html>"#
    )
}
