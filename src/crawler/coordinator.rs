//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties the pieces together:
//! - Validating seeds and preparing the store
//! - Walking the frontier breadth-first within each domain's depth budget
//! - Applying the whitelist before any request is made
//! - Fetching, extracting and storing pages, pausing after every request
//! - Reporting what the run did

use crate::config::Config;
use crate::crawler::delay::{FixedDelay, Politeness};
use crate::crawler::extractor::extract;
use crate::crawler::fetcher::{FetchResult, Fetcher, HttpFetcher};
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::crawler::parser::extract_links;
use crate::storage::{DocumentStore, UrlRecord};
use crate::url::{extract_domain, parse_seed, Whitelist};
use crate::{Result, ScholarError};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Pages whose extracted text is shorter than this are not stored
pub const DEFAULT_MIN_TEXT_CHARS: usize = 600;

/// Pause used when none is configured
const DEFAULT_POLITENESS_DELAY: Duration = Duration::from_millis(500);

/// Summary of one crawl run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrawlReport {
    /// Documents written to the index
    pub stored: usize,

    /// URLs taken from the frontier and processed
    pub visited: usize,

    /// URLs refused by the whitelist
    pub rejected: usize,

    /// Fetches that produced no HTML
    pub failed: usize,

    /// HTML pages with too little main text
    pub thin: usize,
}

/// Breadth-first crawler bound to one whitelist and one store
pub struct Crawler {
    whitelist: Arc<Whitelist>,
    store: Arc<dyn DocumentStore>,
    fetcher: Arc<dyn Fetcher>,
    politeness: Arc<dyn Politeness>,
    min_text_chars: usize,
}

impl Crawler {
    /// Creates a crawler with the default politeness delay and text minimum
    pub fn new(
        whitelist: Arc<Whitelist>,
        store: Arc<dyn DocumentStore>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            whitelist,
            store,
            fetcher,
            politeness: Arc::new(FixedDelay::new(DEFAULT_POLITENESS_DELAY)),
            min_text_chars: DEFAULT_MIN_TEXT_CHARS,
        }
    }

    /// Replaces the pause taken after each fetch
    pub fn with_politeness(mut self, politeness: Arc<dyn Politeness>) -> Self {
        self.politeness = politeness;
        self
    }

    pub fn with_min_text_chars(mut self, min_text_chars: usize) -> Self {
        self.min_text_chars = min_text_chars;
        self
    }

    /// Builds an HTTP crawler from a loaded configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Whitelist compiled and HTTP client built
    /// * `Err(ScholarError)` - Bad allow pattern or client construction failure
    pub fn from_config(config: &Config, store: Arc<dyn DocumentStore>) -> Result<Self> {
        let whitelist = Whitelist::from_sites(&config.sites)?;
        let fetcher = HttpFetcher::new(
            &config.user_agent,
            Duration::from_secs(config.crawler.fetch_timeout_secs),
        )?;

        Ok(Self::new(Arc::new(whitelist), store, Arc::new(fetcher))
            .with_politeness(Arc::new(FixedDelay::from_millis(
                config.crawler.politeness_delay_ms,
            )))
            .with_min_text_chars(config.crawler.min_text_chars))
    }

    /// Crawls outward from the seeds, tagging stored pages with `topic`
    ///
    /// Stops when the frontier is exhausted or `max_pages` documents have
    /// been stored. Problems with individual pages (rejections, HTTP errors,
    /// thin content, storage failures) are logged and skipped.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The crawl ran; `stored` is the number of documents written
    /// * `Err(ScholarError)` - No seeds, an invalid seed, or the store is unusable
    pub async fn crawl(&self, seeds: &[String], topic: &str, max_pages: usize) -> Result<CrawlReport> {
        if seeds.is_empty() {
            return Err(ScholarError::InvalidInput(
                "at least one seed URL is required".to_string(),
            ));
        }

        let seed_urls = seeds
            .iter()
            .map(|seed| parse_seed(seed))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        self.store.ensure_schema()?;

        tracing::info!(
            "Starting crawl: {} seed(s), topic '{}', page budget {}",
            seed_urls.len(),
            topic,
            max_pages
        );

        let mut frontier = Frontier::seeded(seed_urls);
        let mut report = CrawlReport::default();

        while report.stored < max_pages {
            let Some(entry) = frontier.pop() else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };

            if !frontier.mark_visited(&entry.url) {
                continue;
            }

            self.process_url(entry, topic, &mut frontier, &mut report)
                .await;
        }
        report.visited = frontier.visited_count();

        tracing::info!(
            "Crawl finished: stored {} of {} visited ({} rejected, {} failed, {} thin)",
            report.stored,
            report.visited,
            report.rejected,
            report.failed,
            report.thin
        );

        Ok(report)
    }

    /// Handles one dequeued URL
    async fn process_url(
        &self,
        entry: FrontierEntry,
        topic: &str,
        frontier: &mut Frontier,
        report: &mut CrawlReport,
    ) {
        let FrontierEntry { url, depth } = entry;

        let Some(domain) = extract_domain(&url) else {
            report.rejected += 1;
            return;
        };

        if !self.whitelist.is_allowed(&url) {
            tracing::debug!("Rejected by whitelist: {}", url);
            report.rejected += 1;
            return;
        }

        tracing::debug!("Fetching {} (depth {})", url, depth);
        let result = self.fetcher.fetch(&url).await;

        if let Some(status) = result.status_code() {
            let mut record = UrlRecord::fetched_now(url.as_str(), &domain, topic, status);
            if let FetchResult::Html {
                etag,
                last_modified,
                ..
            } = &result
            {
                record.etag = etag.clone();
                record.last_modified = last_modified.clone();
            }

            if let Err(e) = self.store.upsert_url(&record) {
                tracing::warn!("Failed to record fetch of {}: {}", url, e);
            }
        }

        self.politeness.pause().await;

        let (final_url, body) = match result {
            FetchResult::Html {
                final_url, body, ..
            } => (final_url, body),
            FetchResult::HttpError { status_code } => {
                tracing::debug!("HTTP {} for {}", status_code, url);
                report.failed += 1;
                return;
            }
            FetchResult::ContentMismatch { content_type, .. } => {
                tracing::debug!("Skipping non-HTML content '{}' at {}", content_type, url);
                report.failed += 1;
                return;
            }
            FetchResult::NetworkError { error } => {
                tracing::debug!("Fetch failed for {}: {}", url, error);
                report.failed += 1;
                return;
            }
        };

        let Some(page) = extract(&body, &url) else {
            tracing::debug!("No main content at {}", url);
            report.thin += 1;
            return;
        };

        let text_chars = page.text.chars().count();
        if text_chars < self.min_text_chars {
            tracing::debug!(
                "Too little text at {} ({} < {} chars)",
                url,
                text_chars,
                self.min_text_chars
            );
            report.thin += 1;
            return;
        }

        // Validators recorded with the fetch survive: a conflict only refreshes
        // fetched_at and status
        let record = UrlRecord::fetched_now(url.as_str(), &domain, topic, 200);
        match self.store.store_page(&record, &page.title, &page.text) {
            Ok(()) => {
                report.stored += 1;
                tracing::info!("Stored [{}] {} ({} chars)", report.stored, url, text_chars);
            }
            Err(e) => {
                tracing::warn!("Failed to store {}: {}", url, e);
                return;
            }
        }

        if depth < self.whitelist.depth_budget(&domain) {
            let mut queued = 0;
            for link in extract_links(&body, &final_url) {
                let same_host = extract_domain(&link).as_deref() == Some(domain.as_str());
                if same_host && !frontier.is_visited(&link) {
                    frontier.push(link, depth + 1);
                    queued += 1;
                }
            }
            tracing::debug!("Queued {} link(s) from {}", queued, url);
        }
    }
}
