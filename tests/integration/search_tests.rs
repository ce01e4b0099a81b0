//! Integration tests for search and ranking over an on-disk index

use scholar_crawl::config::parse_config;
use scholar_crawl::storage::{open_storage, DocumentStore};
use scholar_crawl::SearchService;
use std::sync::Arc;
use tempfile::TempDir;

const CONFIG: &str = r#"
[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0.0"
contact-url = "https://example.com/contact"
contact-email = "test@example.com"

[storage]
database-path = "unused.db"

[[site]]
domain = "ocw.mit.edu"
allow = ["^/courses/"]
trust = 3

[[site]]
domain = "en.wikipedia.org"
allow = ["^/wiki/[^:]+$"]
trust = 1

[[site]]
domain = "*.openstax.org"
allow = ["^/books/"]
trust = 2
"#;

fn index_document(store: &dyn DocumentStore, url: &str, title: &str, text: &str, domain: &str) {
    store
        .replace_document(url, title, text, domain, "math")
        .unwrap();
}

#[test]
fn test_trust_outranks_keyword_title() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(open_storage(&dir.path().join("index.db")).unwrap());
    let config = parse_config(CONFIG).unwrap();

    // trust 1 + "problems" 2 - long text 1 = 2
    let long_text = format!("Integration by parts. {}", "More worked steps. ".repeat(250));
    index_document(
        store.as_ref(),
        "https://en.wikipedia.org/wiki/Integration_problems",
        "Integration problems",
        &long_text,
        "en.wikipedia.org",
    );
    // trust 3 = 3
    index_document(
        store.as_ref(),
        "https://ocw.mit.edu/courses/integration",
        "Integration",
        "Integration by parts reverses the product rule.",
        "ocw.mit.edu",
    );

    let service = SearchService::from_config(&config, store);
    let results = service.search("integration parts", Some("math"), 5).unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].url, "https://ocw.mit.edu/courses/integration");
    assert_eq!(results[0].score, 3);
    assert_eq!(results[1].score, 2);
    assert!(results[1].why.contains("problems"));
    assert!(results[1].why.contains("long text"));
}

#[test]
fn test_wildcard_trust_applies_to_subdomains() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(open_storage(&dir.path().join("index.db")).unwrap());
    let config = parse_config(CONFIG).unwrap();

    index_document(
        store.as_ref(),
        "https://www.openstax.org/books/calculus",
        "Calculus Volume 1",
        "Functions and graphs, limits, derivatives.",
        "www.openstax.org",
    );

    let service = SearchService::from_config(&config, store);
    let results = service.search("limits", None, 5).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].score, 2);
}

#[test]
fn test_limit_respected_with_many_matches() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(open_storage(&dir.path().join("index.db")).unwrap());
    let config = parse_config(CONFIG).unwrap();

    for i in 0..20 {
        index_document(
            store.as_ref(),
            &format!("https://ocw.mit.edu/courses/matrices-{}", i),
            &format!("Matrices part {}", i),
            "A matrix is a rectangular array of numbers.",
            "ocw.mit.edu",
        );
    }

    let service = SearchService::from_config(&config, store);
    assert_eq!(service.search("matrix", None, 5).unwrap().len(), 5);
    assert_eq!(service.search("matrix", None, 50).unwrap().len(), 20);
}

#[test]
fn test_index_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("index.db");
    let config = parse_config(CONFIG).unwrap();

    {
        let store = open_storage(&db_path).unwrap();
        index_document(
            &store,
            "https://ocw.mit.edu/courses/eigen",
            "Eigenvalues lecture notes",
            "Eigenvalues and eigenvectors of square matrices.",
            "ocw.mit.edu",
        );
    }

    let store = Arc::new(open_storage(&db_path).unwrap());
    let service = SearchService::from_config(&config, store);
    let results = service.search("eigenvalues", Some("math"), 5).unwrap();

    assert_eq!(results.len(), 1);
    // trust 3 + title keyword 2
    assert_eq!(results[0].score, 5);

    let json = serde_json::to_value(&results[0]).unwrap();
    assert_eq!(json["url"], "https://ocw.mit.edu/courses/eigen");
    assert_eq!(json["domain"], "ocw.mit.edu");
    assert_eq!(json["score"], 5);
}
