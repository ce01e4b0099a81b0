//! Database schema definitions
//!
//! `urls` holds per-URL crawl metadata. `documents` is an FTS5 table over
//! extracted page text; the porter tokenizer gives word stemming so that
//! "derivatives" matches "derivative".

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Crawl metadata, one row per fetched URL
CREATE TABLE IF NOT EXISTS urls (
    url TEXT PRIMARY KEY,
    domain TEXT NOT NULL,
    topic TEXT NOT NULL,
    fetched_at TEXT NOT NULL,
    etag TEXT,
    last_modified TEXT,
    status INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_urls_domain ON urls(domain);
CREATE INDEX IF NOT EXISTS idx_urls_topic ON urls(topic);

-- Full-text index of extracted documents; at most one row per url
CREATE VIRTUAL TABLE IF NOT EXISTS documents USING fts5(
    url UNINDEXED,
    title,
    text,
    domain UNINDEXED,
    topic UNINDEXED,
    created_at UNINDEXED,
    tokenize = 'porter unicode61'
);
"#;

/// Initializes the database schema
///
/// Every statement is `IF NOT EXISTS`, so this is safe on every startup.
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)
}
