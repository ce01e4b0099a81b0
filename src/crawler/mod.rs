//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with an identifying user agent
//! - Main-content extraction and link discovery
//! - The breadth-first frontier and politeness delay
//! - Overall crawl coordination

mod coordinator;
mod delay;
mod extractor;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{CrawlReport, Crawler, DEFAULT_MIN_TEXT_CHARS};
pub use delay::{FixedDelay, NoDelay, Politeness};
pub use extractor::{extract, Extracted};
pub use fetcher::{
    build_http_client, fetch_url, is_html_content_type, user_agent_string, FetchResult, Fetcher,
    HttpFetcher,
};
pub use frontier::{Frontier, FrontierEntry};
pub use parser::extract_links;
