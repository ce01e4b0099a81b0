//! Storage module for persisting crawl data
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Per-URL crawl metadata (upsert on re-fetch)
//! - The full-text document index (replace on re-crawl)
//! - Full-text candidate retrieval for search

mod schema;
mod sqlite;
mod traits;

pub use sqlite::{build_match_query, SqliteStore};
pub use traits::{DocumentStore, StorageError, StorageResult};

use std::path::Path;

/// Opens (creating if needed) the store at the given path
pub fn open_storage(path: &Path) -> StorageResult<SqliteStore> {
    SqliteStore::open(path)
}

/// Crawl metadata for one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub url: String,
    pub domain: String,
    pub topic: String,
    /// RFC 3339 timestamp of the most recent fetch attempt
    pub fetched_at: String,
    pub etag: Option<String>,
    pub last_modified: Option<String>,
    /// HTTP status of the most recent fetch attempt
    pub status: u16,
}

impl UrlRecord {
    /// Creates a record stamped with the current time
    pub fn fetched_now(url: &str, domain: &str, topic: &str, status: u16) -> Self {
        Self {
            url: url.to_string(),
            domain: domain.to_string(),
            topic: topic.to_string(),
            fetched_at: chrono::Utc::now().to_rfc3339(),
            etag: None,
            last_modified: None,
            status,
        }
    }
}

/// A full-text match returned by the store, before ranking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHit {
    pub url: String,
    pub title: String,
    pub text: String,
    pub domain: String,
    pub topic: String,
    pub created_at: String,
}
