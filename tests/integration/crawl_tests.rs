//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use mirror_crawl::config::Config;
use mirror_crawl::crawler::crawl;
use mirror_crawl::storage::{SqliteStorage, Storage};
use mirror_crawl::url::host_dir;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing into `dir`
fn create_test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.crawler.requests_per_second = 1000.0; // Effectively unthrottled
    config.crawler.workers = 4;
    config.crawler.request_timeout_secs = 5;
    config.output.directory = dir.join("mirror");
    config.output.database_path = Some(dir.join("crawl.db"));
    config
}

/// Directory the mock server's pages are mirrored into
fn site_dir(dir: &Path, server: &MockServer) -> PathBuf {
    let base = Url::parse(&server.uri()).expect("Failed to parse base URL");
    dir.join("mirror").join(host_dir(&base))
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><head><title>Test</title></head><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

#[tokio::test]
async fn test_full_crawl_mirrors_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<a href="/a">A</a> <a href="/notes.txt">Notes</a> <a href="/docs/">Docs</a>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(r#"<a href="/notes.txt">again</a> <a href="/a#section">self</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/notes.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("plain notes with <a href=\"/never\">markup</a>")
                .insert_header("content-type", "text/plain"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/"))
        .respond_with(html("<p>No links here</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/never"))
        .respond_with(html(""))
        .expect(0)
        .mount(&mock_server)
        .await;

    let temp_dir = tempfile::tempdir().unwrap();
    let config = create_test_config(temp_dir.path());

    let report = crawl(&format!("{}/", base_url), config)
        .await
        .expect("Crawl failed");

    assert_eq!(report.urls_claimed, 4);
    assert_eq!(report.pages_mirrored, 4);
    assert_eq!(report.html_pages, 3);
    assert!(report.errors.is_empty());

    // Files land where the site's paths say
    let site = site_dir(temp_dir.path(), &mock_server);
    assert!(site.join("index.html").is_file());
    assert!(site.join("a").join("index.html").is_file());
    assert!(site.join("docs").join("index.html").is_file());
    assert_eq!(
        std::fs::read_to_string(site.join("notes.txt")).unwrap(),
        "plain notes with <a href=\"/never\">markup</a>"
    );

    // Check database state
    let storage = SqliteStorage::new(&temp_dir.path().join("crawl.db")).unwrap();
    assert_eq!(storage.count_pages().unwrap(), 4);
    assert_eq!(storage.count_html_pages().unwrap(), 3);
    assert_eq!(storage.count_failed_pages().unwrap(), 0);

    let root = format!("{}/", base_url);
    let outgoing = storage.get_outgoing_links(&root).unwrap();
    assert_eq!(outgoing.len(), 3);

    // /a links to /notes.txt and to itself
    let from_a = storage.get_outgoing_links(&format!("{}/a", base_url)).unwrap();
    assert_eq!(from_a.len(), 2);

    let notes = storage
        .get_page_by_url(&format!("{}/notes.txt", base_url))
        .unwrap()
        .expect("notes page stored");
    assert!(!notes.is_html);
    assert!(notes.data.is_some());
    assert!(notes.error_id.is_none());
}

#[tokio::test]
async fn test_http_error_does_not_affect_siblings() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<a href="/missing">gone</a> <a href="/ok">ok</a> <a href="/also-missing">gone too</a>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/also-missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(html("fine"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let temp_dir = tempfile::tempdir().unwrap();
    let report = crawl(&format!("{}/", base_url), create_test_config(temp_dir.path()))
        .await
        .expect("Crawl failed");

    assert_eq!(report.urls_claimed, 4);
    assert_eq!(report.pages_mirrored, 2);
    assert_eq!(report.errors.http.get(&404), Some(&2));
    assert_eq!(report.errors.total(), 2);

    let site = site_dir(temp_dir.path(), &mock_server);
    assert!(site.join("ok").join("index.html").is_file());
    assert!(!site.join("missing").exists());

    // Both failures share one error category
    let storage = SqliteStorage::new(&temp_dir.path().join("crawl.db")).unwrap();
    assert_eq!(storage.count_failed_pages().unwrap(), 2);

    let breakdown = storage.error_breakdown().unwrap();
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0].0.http_code, Some(404));
    assert_eq!(breakdown[0].1, 2);

    let missing = storage
        .get_page_by_url(&format!("{}/missing", base_url))
        .unwrap()
        .expect("failed page stored");
    assert!(missing.data.is_none());
    assert_eq!(missing.error_id, Some(breakdown[0].0.id));
}

#[tokio::test]
async fn test_long_filename_is_never_fetched() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let long_segment = "a".repeat(300);

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&format!(
            r#"<a href="/{0}">long</a> <a href="/dir/{0}">long again</a> <a href="/short">short</a>"#,
            long_segment
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/{}", long_segment)))
        .respond_with(html(""))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/short"))
        .respond_with(html(""))
        .expect(1)
        .mount(&mock_server)
        .await;

    let temp_dir = tempfile::tempdir().unwrap();
    let report = crawl(&format!("{}/", base_url), create_test_config(temp_dir.path()))
        .await
        .expect("Crawl failed");

    assert_eq!(report.errors.filename_too_long, 2);
    assert_eq!(report.urls_claimed, 2);
    assert_eq!(report.pages_mirrored, 2);

    // Skipped targets get neither a page nor a link row
    let storage = SqliteStorage::new(&temp_dir.path().join("crawl.db")).unwrap();
    assert_eq!(storage.count_pages().unwrap(), 2);
    assert_eq!(storage.count_links().unwrap(), 1);
}

#[tokio::test]
async fn test_duplicate_links_fetched_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<a href="/dup">1</a> <a href="/dup">2</a> <a href="/dup#x">3</a> <a href="/other">o</a>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/other"))
        .respond_with(html(r#"<a href="/dup">back</a> <a href="/">home</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/dup"))
        .respond_with(html(r#"<a href="/other">other</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let temp_dir = tempfile::tempdir().unwrap();
    let report = crawl(&format!("{}/", base_url), create_test_config(temp_dir.path()))
        .await
        .expect("Crawl failed");

    assert_eq!(report.urls_claimed, 3);
    assert_eq!(report.pages_mirrored, 3);
    // Every accepted href counts, duplicates included
    assert_eq!(report.links_followed, 7);

    // Link rows are unique per (origin, target)
    let storage = SqliteStorage::new(&temp_dir.path().join("crawl.db")).unwrap();
    assert_eq!(storage.count_links().unwrap(), 5);
}

#[tokio::test]
async fn test_only_site_relative_links_followed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&format!(
            r##"<a href="https://other.example/x">external</a>
                <a href="//other.example/y">protocol relative</a>
                <a href="{}/absolute">same origin but absolute</a>
                <a href="relative">relative</a>
                <a href="mailto:someone@example.com">mail</a>
                <a href="#top">fragment</a>"##,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/absolute"))
        .respond_with(html(""))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/relative"))
        .respond_with(html(""))
        .expect(0)
        .mount(&mock_server)
        .await;

    let temp_dir = tempfile::tempdir().unwrap();
    let report = crawl(&format!("{}/", base_url), create_test_config(temp_dir.path()))
        .await
        .expect("Crawl failed");

    assert_eq!(report.urls_claimed, 1);
    assert_eq!(report.links_followed, 0);
    assert!(report.errors.is_empty());
}

#[tokio::test]
async fn test_crawl_without_database() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/page">page</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html(""))
        .expect(1)
        .mount(&mock_server)
        .await;

    let temp_dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(temp_dir.path());
    config.output.database_path = None;

    let report = crawl(&format!("{}/", base_url), config)
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages_mirrored, 2);
    assert!(site_dir(temp_dir.path(), &mock_server)
        .join("page")
        .join("index.html")
        .is_file());
    assert!(!temp_dir.path().join("crawl.db").exists());
}

#[tokio::test]
async fn test_timeout_tallied_as_unknown_error() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/slow">slow</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("late").set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let temp_dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(temp_dir.path());
    config.crawler.request_timeout_secs = 1;

    let report = crawl(&format!("{}/", base_url), config)
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages_mirrored, 1);
    assert_eq!(report.errors.unknown.get("request timed out"), Some(&1));

    let storage = SqliteStorage::new(&temp_dir.path().join("crawl.db")).unwrap();
    let slow = storage
        .get_page_by_url(&format!("{}/slow", base_url))
        .unwrap()
        .expect("failed page stored");
    assert!(slow.error_id.is_some());

    let breakdown = storage.error_breakdown().unwrap();
    assert_eq!(breakdown[0].0.message.as_deref(), Some("request timed out"));
}

#[tokio::test]
async fn test_invalid_root_is_fatal() {
    let temp_dir = tempfile::tempdir().unwrap();

    let result = crawl("ftp://example.com/", create_test_config(temp_dir.path())).await;
    assert!(result.is_err());
}
