//! Search over the document index
//!
//! A query goes to the store for full-text candidates (three per requested
//! result) and the [`Ranker`] reorders them by domain trust, title keywords
//! and text length.

mod ranking;

pub use ranking::{
    Ranker, ScoredResult, TrustTable, LENGTH_PENALTY, LONG_TEXT_CHARS, TITLE_BONUS,
    TITLE_KEYWORDS,
};

use crate::config::Config;
use crate::storage::DocumentStore;
use crate::Result;
use std::sync::Arc;

/// Read-only search entry point
pub struct SearchService {
    store: Arc<dyn DocumentStore>,
    ranker: Ranker,
}

impl SearchService {
    pub fn new(store: Arc<dyn DocumentStore>, ranker: Ranker) -> Self {
        Self { store, ranker }
    }

    /// Creates a service whose trust table comes from the configured sites
    pub fn from_config(config: &Config, store: Arc<dyn DocumentStore>) -> Self {
        Self::new(store, Ranker::new(TrustTable::from_sites(&config.sites)))
    }

    /// Returns at most `limit` ranked results for `query`
    ///
    /// `topic`, when given, must match a document's topic exactly. A query
    /// with no searchable words yields no results.
    pub fn search(&self, query: &str, topic: Option<&str>, limit: usize) -> Result<Vec<ScoredResult>> {
        let hits = self.store.search(query, topic, limit)?;
        tracing::debug!(
            "Query '{}' (topic {:?}): {} candidate(s) for {} result(s)",
            query,
            topic,
            hits.len(),
            limit
        );
        Ok(self.ranker.rank(&hits, limit))
    }
}
