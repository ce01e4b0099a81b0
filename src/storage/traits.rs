//! Storage traits and error types
//!
//! This module defines the trait interface for the document store and
//! associated error types.

use crate::storage::{DocumentHit, UrlRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Store connection lock poisoned")]
    LockPoisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Document store shared by the crawler (writer) and search service (reader)
///
/// Implementations own their connection and are safe to share behind an
/// `Arc`; every method acquires the connection for its own scope only.
pub trait DocumentStore: Send + Sync {
    // ===== Schema =====

    /// Creates the URL table and the full-text index if they are missing
    fn ensure_schema(&self) -> StorageResult<()>;

    // ===== Writes =====

    /// Inserts crawl metadata, or on an existing URL overwrites only
    /// `fetched_at` and `status`
    fn upsert_url(&self, record: &UrlRecord) -> StorageResult<()>;

    /// Atomically replaces the indexed document for `url`
    ///
    /// After commit exactly one document exists for `url`; a concurrent
    /// reader never observes zero or two.
    fn replace_document(
        &self,
        url: &str,
        title: &str,
        text: &str,
        domain: &str,
        topic: &str,
    ) -> StorageResult<()>;

    /// Indexes a fetched page and records its metadata in one transaction
    ///
    /// Either the document and the URL record are both written, or neither
    /// is. The document takes its url, domain and topic from `record`.
    fn store_page(&self, record: &UrlRecord, title: &str, text: &str) -> StorageResult<()>;

    // ===== Queries =====

    /// Full-text search over title and text
    ///
    /// Returns at most `limit * 3` candidates, best textual match first,
    /// leaving headroom for re-ranking.
    fn search(
        &self,
        query: &str,
        topic: Option<&str>,
        limit: usize,
    ) -> StorageResult<Vec<DocumentHit>>;

    /// Gets crawl metadata for a URL
    fn get_url(&self, url: &str) -> StorageResult<Option<UrlRecord>>;

    /// Counts indexed documents for one URL (0 or 1 when healthy)
    fn count_documents_for(&self, url: &str) -> StorageResult<u64>;

    // ===== Statistics =====

    fn count_documents(&self) -> StorageResult<u64>;

    fn count_urls(&self) -> StorageResult<u64>;

    /// Document counts per topic, largest first
    fn documents_by_topic(&self) -> StorageResult<Vec<(String, u64)>>;

    /// Document counts per domain, largest first
    fn documents_by_domain(&self) -> StorageResult<Vec<(String, u64)>>;
}
