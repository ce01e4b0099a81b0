//! Output module for console reporting
//!
//! This module handles:
//! - Crawl run summaries
//! - Search result listings
//! - Index statistics

mod report;
pub mod stats;

pub use report::{print_crawl_report, print_results, print_whitelist};
pub use stats::{load_statistics, print_statistics, StoreStatistics};
