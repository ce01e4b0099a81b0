//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the DocumentStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{DocumentStore, StorageError, StorageResult};
use crate::storage::{DocumentHit, UrlRecord};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite storage backend
///
/// One connection guarded by a mutex. Each operation holds the guard for
/// its own scope, so the connection is released on every exit path.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens or creates the database file and ensures the schema
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            PRAGMA busy_timeout = 5000;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    fn count(&self, sql: &str, params: impl rusqlite::Params) -> StorageResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(sql, params, |row| row.get(0))?;
        Ok(count as u64)
    }

    fn grouped_counts(&self, sql: &str) -> StorageResult<Vec<(String, u64)>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get::<_, i64>(1)? as u64)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

/// Turns free text into an FTS5 MATCH expression
///
/// Every alphanumeric word becomes a quoted term and all terms are required,
/// so punctuation in user input can never produce an FTS5 syntax error.
/// Returns `None` when the input has no searchable words.
///
/// # Example
///
/// ```
/// use scholar_crawl::storage::build_match_query;
///
/// assert_eq!(
///     build_match_query("chain-rule examples"),
///     Some("\"chain\" \"rule\" \"examples\"".to_string())
/// );
/// assert_eq!(build_match_query("  ?! "), None);
/// ```
pub fn build_match_query(query: &str) -> Option<String> {
    let terms: Vec<String> = query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|term| !term.is_empty())
        .map(|term| format!("\"{}\"", term))
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" "))
    }
}

impl DocumentStore for SqliteStore {
    fn ensure_schema(&self) -> StorageResult<()> {
        let conn = self.lock()?;
        initialize_schema(&conn)?;
        Ok(())
    }

    fn upsert_url(&self, record: &UrlRecord) -> StorageResult<()> {
        let conn = self.lock()?;
        upsert_url_row(&conn, record)
    }

    fn replace_document(
        &self,
        url: &str,
        title: &str,
        text: &str,
        domain: &str,
        topic: &str,
    ) -> StorageResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        replace_document_rows(&tx, url, title, text, domain, topic)?;
        tx.commit()?;
        Ok(())
    }

    fn store_page(&self, record: &UrlRecord, title: &str, text: &str) -> StorageResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        replace_document_rows(&tx, &record.url, title, text, &record.domain, &record.topic)?;
        upsert_url_row(&tx, record)?;
        tx.commit()?;
        Ok(())
    }

    fn search(
        &self,
        query: &str,
        topic: Option<&str>,
        limit: usize,
    ) -> StorageResult<Vec<DocumentHit>> {
        let match_query = match build_match_query(query) {
            Some(q) if limit > 0 => q,
            _ => return Ok(Vec::new()),
        };
        let candidate_limit = i64::try_from(limit.saturating_mul(3)).unwrap_or(i64::MAX);

        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT url, title, text, domain, topic, created_at
             FROM documents
             WHERE documents MATCH ?1 AND (?2 IS NULL OR topic = ?2)
             ORDER BY rank
             LIMIT ?3",
        )?;

        let hits = stmt
            .query_map(params![match_query, topic, candidate_limit], |row| {
                Ok(DocumentHit {
                    url: row.get(0)?,
                    title: row.get(1)?,
                    text: row.get(2)?,
                    domain: row.get(3)?,
                    topic: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(hits)
    }

    fn get_url(&self, url: &str) -> StorageResult<Option<UrlRecord>> {
        let conn = self.lock()?;
        let record = conn
            .query_row(
                "SELECT url, domain, topic, fetched_at, etag, last_modified, status
                 FROM urls WHERE url = ?1",
                params![url],
                |row| {
                    Ok(UrlRecord {
                        url: row.get(0)?,
                        domain: row.get(1)?,
                        topic: row.get(2)?,
                        fetched_at: row.get(3)?,
                        etag: row.get(4)?,
                        last_modified: row.get(5)?,
                        status: row.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    fn count_documents_for(&self, url: &str) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM documents WHERE url = ?1", params![url])
    }

    fn count_documents(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM documents", [])
    }

    fn count_urls(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM urls", [])
    }

    fn documents_by_topic(&self) -> StorageResult<Vec<(String, u64)>> {
        self.grouped_counts(
            "SELECT topic, COUNT(*) AS n FROM documents GROUP BY topic ORDER BY n DESC, topic",
        )
    }

    fn documents_by_domain(&self) -> StorageResult<Vec<(String, u64)>> {
        self.grouped_counts(
            "SELECT domain, COUNT(*) AS n FROM documents GROUP BY domain ORDER BY n DESC, domain",
        )
    }
}

fn upsert_url_row(conn: &Connection, record: &UrlRecord) -> StorageResult<()> {
    conn.execute(
        "INSERT INTO urls (url, domain, topic, fetched_at, etag, last_modified, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(url) DO UPDATE SET
            fetched_at = excluded.fetched_at,
            status = excluded.status",
        params![
            record.url,
            record.domain,
            record.topic,
            record.fetched_at,
            record.etag,
            record.last_modified,
            record.status,
        ],
    )?;
    Ok(())
}

/// Deletes any document for `url` and inserts the new one; callers supply
/// the transaction
fn replace_document_rows(
    conn: &Connection,
    url: &str,
    title: &str,
    text: &str,
    domain: &str,
    topic: &str,
) -> StorageResult<()> {
    conn.execute("DELETE FROM documents WHERE url = ?1", params![url])?;
    conn.execute(
        "INSERT INTO documents (url, title, text, domain, topic, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![url, title, text, domain, topic, Utc::now().to_rfc3339()],
    )?;
    Ok(())
}
