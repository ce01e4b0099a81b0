//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full fetch, extract, store and search cycle end-to-end.

use async_trait::async_trait;
use scholar_crawl::config::{Config, CrawlerConfig, SiteEntry, StorageConfig, UserAgentConfig};
use scholar_crawl::crawler::{FetchResult, Fetcher, NoDelay};
use scholar_crawl::storage::{open_storage, DocumentStore, SqliteStore};
use scholar_crawl::{Crawler, Ranker, SearchService, TrustTable, Whitelist};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER_AGENT: &str = "TestBot/1.0.0 (+https://example.com/contact; test@example.com)";

/// Creates a test configuration with one whitelisted site
fn create_test_config(site: SiteEntry, db_path: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_pages: 20,
            politeness_delay_ms: 10, // Very short for testing
            min_text_chars: 600,
            fetch_timeout_secs: 5,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        storage: StorageConfig {
            database_path: db_path.to_string(),
        },
        sites: vec![site],
    }
}

fn local_site(depth: u32) -> SiteEntry {
    SiteEntry {
        domain: "127.0.0.1".to_string(),
        depth,
        allow: vec!["^/notes/".to_string()],
        trust: 2,
    }
}

/// An HTML page whose main text is `paragraphs` copies of a ~100 char sentence
fn study_page(title: &str, paragraphs: usize, links: &[&str]) -> String {
    let body: String = (0..paragraphs)
        .map(|i| {
            format!(
                "<p>Paragraph {} of {}: a derivative measures how a function changes as its input changes.</p>",
                i, title
            )
        })
        .collect();
    let nav: String = links
        .iter()
        .map(|href| format!("<a href=\"{}\">{}</a> ", href, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><nav>{}</nav><article>{}</article><ul>{}</ul></body></html>",
        title,
        nav,
        body,
        links
            .iter()
            .map(|href| format!("<li><a href=\"{}\">more</a></li>", href))
            .collect::<String>()
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, page_path: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(response)
        .mount(server)
        .await;
}

fn temp_db() -> (TempDir, String) {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("scholar.db").to_string_lossy().to_string();
    (dir, db_path)
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/notes/index",
        html(study_page(
            "Calculus Index",
            8,
            &["/notes/limits", "/notes/series", "/private/admin"],
        )),
    )
    .await;
    mount_page(&mock_server, "/notes/limits", html(study_page("Limits", 8, &[]))).await;
    mount_page(&mock_server, "/notes/series", html(study_page("Series", 8, &[]))).await;

    // The whitelist must keep this one off the network entirely
    Mock::given(method("GET"))
        .and(path("/private/admin"))
        .respond_with(html(study_page("Admin", 8, &[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (_dir, db_path) = temp_db();
    let config = create_test_config(local_site(1), &db_path);
    let store = Arc::new(open_storage(std::path::Path::new(&db_path)).unwrap());
    let crawler = Crawler::from_config(&config, store.clone()).unwrap();

    let report = crawler
        .crawl(&[format!("{}/notes/index", base_url)], "math", 10)
        .await
        .unwrap();

    assert_eq!(report.stored, 3);
    assert_eq!(report.rejected, 1);
    assert_eq!(store.count_documents().unwrap(), 3);

    let record = store
        .get_url(&format!("{}/notes/limits", base_url))
        .unwrap()
        .unwrap();
    assert_eq!(record.status, 200);
    assert_eq!(record.domain, "127.0.0.1");
    assert_eq!(record.topic, "math");
}

#[tokio::test]
async fn test_sends_identifying_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notes/ua"))
        .and(header("user-agent", USER_AGENT))
        .respond_with(html(study_page("UA", 8, &[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (_dir, db_path) = temp_db();
    let config = create_test_config(local_site(1), &db_path);
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let crawler = Crawler::from_config(&config, store).unwrap();

    let report = crawler
        .crawl(&[format!("{}/notes/ua", mock_server.uri())], "math", 5)
        .await
        .unwrap();

    assert_eq!(report.stored, 1);
}

#[tokio::test]
async fn test_non_html_and_errors_recorded_not_indexed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/notes/index",
        html(study_page(
            "Index",
            8,
            &["/notes/handout.pdf", "/notes/missing", "/notes/broken"],
        )),
    )
    .await;
    mount_page(
        &mock_server,
        "/notes/handout.pdf",
        ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"),
    )
    .await;
    mount_page(&mock_server, "/notes/missing", ResponseTemplate::new(404)).await;
    mount_page(&mock_server, "/notes/broken", ResponseTemplate::new(500)).await;

    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let (_dir, db_path) = temp_db();
    let config = create_test_config(local_site(1), &db_path);
    let crawler = Crawler::from_config(&config, store.clone()).unwrap();

    let report = crawler
        .crawl(&[format!("{}/notes/index", base_url)], "math", 10)
        .await
        .unwrap();

    assert_eq!(report.stored, 1);
    assert_eq!(report.failed, 3);
    assert_eq!(store.count_documents().unwrap(), 1);
    assert_eq!(store.count_urls().unwrap(), 4);

    let status_of = |p: &str| {
        store
            .get_url(&format!("{}{}", base_url, p))
            .unwrap()
            .map(|r| r.status)
    };
    assert_eq!(status_of("/notes/handout.pdf"), Some(200));
    assert_eq!(status_of("/notes/missing"), Some(404));
    assert_eq!(status_of("/notes/broken"), Some(500));
}

#[tokio::test]
async fn test_thin_page_not_stored() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/notes/stub", html(study_page("Stub", 2, &[]))).await;

    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let (_dir, db_path) = temp_db();
    let config = create_test_config(local_site(1), &db_path);
    let crawler = Crawler::from_config(&config, store.clone()).unwrap();

    let report = crawler
        .crawl(&[format!("{}/notes/stub", mock_server.uri())], "math", 10)
        .await
        .unwrap();

    assert_eq!(report.stored, 0);
    assert_eq!(report.thin, 1);
    assert_eq!(store.count_documents().unwrap(), 0);
}

#[tokio::test]
async fn test_redirect_followed_and_etag_kept() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/notes/old",
        ResponseTemplate::new(301).insert_header("location", "/notes/new"),
    )
    .await;
    mount_page(
        &mock_server,
        "/notes/new",
        html(study_page("Moved Notes", 8, &[]))
            .insert_header("etag", "\"v1\"")
            .insert_header("last-modified", "Wed, 01 Jan 2025 00:00:00 GMT"),
    )
    .await;

    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let (_dir, db_path) = temp_db();
    let config = create_test_config(local_site(1), &db_path);
    let crawler = Crawler::from_config(&config, store.clone()).unwrap();

    let report = crawler
        .crawl(&[format!("{}/notes/old", base_url)], "math", 10)
        .await
        .unwrap();
    assert_eq!(report.stored, 1);

    // Documents are keyed by the URL that was queued
    let old_url = format!("{}/notes/old", base_url);
    assert_eq!(store.count_documents_for(&old_url).unwrap(), 1);

    let record = store.get_url(&old_url).unwrap().unwrap();
    assert_eq!(record.etag.as_deref(), Some("\"v1\""));
    assert_eq!(
        record.last_modified.as_deref(),
        Some("Wed, 01 Jan 2025 00:00:00 GMT")
    );
}

#[tokio::test]
async fn test_politeness_delay_between_fetches() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/notes/a",
        html(study_page("A", 8, &["/notes/b"])),
    )
    .await;
    mount_page(&mock_server, "/notes/b", html(study_page("B", 8, &[]))).await;

    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let (_dir, db_path) = temp_db();
    let mut config = create_test_config(local_site(1), &db_path);
    config.crawler.politeness_delay_ms = 150;
    let crawler = Crawler::from_config(&config, store).unwrap();

    let start = Instant::now();
    let report = crawler
        .crawl(&[format!("{}/notes/a", base_url)], "math", 10)
        .await
        .unwrap();

    assert_eq!(report.stored, 2);
    assert!(start.elapsed() >= Duration::from_millis(300));
}

#[tokio::test]
async fn test_unreachable_host_does_not_abort_crawl() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/notes/ok", html(study_page("OK", 8, &[]))).await;

    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let (_dir, db_path) = temp_db();
    let config = create_test_config(local_site(1), &db_path);
    let crawler = Crawler::from_config(&config, store).unwrap();

    // Port 9 (discard) is closed on test machines
    let report = crawler
        .crawl(
            &[
                "http://127.0.0.1:9/notes/nothing".to_string(),
                format!("{}/notes/ok", mock_server.uri()),
            ],
            "math",
            10,
        )
        .await
        .unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.stored, 1);
}

#[tokio::test]
async fn test_crawled_pages_are_searchable() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/notes/derivatives",
        html(study_page("Derivative Practice Problems", 8, &[])),
    )
    .await;

    let (_dir, db_path) = temp_db();
    let config = create_test_config(local_site(1), &db_path);
    let store = Arc::new(open_storage(std::path::Path::new(&db_path)).unwrap());
    let crawler = Crawler::from_config(&config, store.clone()).unwrap();

    crawler
        .crawl(&[format!("{}/notes/derivatives", base_url)], "math", 10)
        .await
        .unwrap();

    let service = SearchService::from_config(&config, store);
    let results = service.search("derivative", Some("math"), 5).unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].url, format!("{}/notes/derivatives", base_url));
    // trust 2 + title keyword 2
    assert_eq!(results[0].score, 4);
}

/// Serves a snapshot of the Wikipedia Calculus article without touching the network
struct WikipediaSnapshot;

#[async_trait]
impl Fetcher for WikipediaSnapshot {
    async fn fetch(&self, url: &Url) -> FetchResult {
        if url.as_str() == "https://en.wikipedia.org/wiki/Calculus" {
            FetchResult::Html {
                final_url: url.clone(),
                body: include_str!("../fixtures/calculus.html").to_string(),
                etag: None,
                last_modified: None,
            }
        } else {
            FetchResult::HttpError { status_code: 404 }
        }
    }
}

#[tokio::test]
async fn test_calculus_end_to_end() {
    let sites = vec![SiteEntry {
        domain: "en.wikipedia.org".to_string(),
        depth: 1,
        allow: vec!["^/wiki/[^:]+$".to_string()],
        trust: 1,
    }];
    let whitelist = Arc::new(Whitelist::from_sites(&sites).unwrap());
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let crawler = Crawler::new(whitelist, store.clone(), Arc::new(WikipediaSnapshot))
        .with_politeness(Arc::new(NoDelay));

    let report = crawler
        .crawl(
            &["https://en.wikipedia.org/wiki/Calculus".to_string()],
            "math",
            1,
        )
        .await
        .unwrap();

    assert_eq!(report.stored, 1);
    assert_eq!(store.count_documents().unwrap(), 1);

    let record = store
        .get_url("https://en.wikipedia.org/wiki/Calculus")
        .unwrap()
        .unwrap();
    assert_eq!(record.domain, "en.wikipedia.org");
    assert_eq!(record.topic, "math");

    let hits = store.search("calculus", Some("math"), 5).unwrap();
    assert_eq!(hits[0].title, "Calculus - Wikipedia");
    assert!(hits[0].text.contains("mathematical study of continuous change"));
    assert!(!hits[0].text.contains("Jump to content"));
    assert!(!hits[0].text.contains("last edited"));

    let service = SearchService::new(store, Ranker::new(TrustTable::from_sites(&sites)));
    let results = service.search("calculus", Some("math"), 5).unwrap();

    assert!(results
        .iter()
        .any(|r| r.url == "https://en.wikipedia.org/wiki/Calculus"
            && r.domain == "en.wikipedia.org"));
}
