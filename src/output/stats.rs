//! Statistics generation from the document store
//!
//! This module provides functionality for extracting and displaying
//! index statistics from the storage layer.

use crate::storage::{DocumentStore, StorageResult};
use serde::Serialize;

/// Index statistics summary
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreStatistics {
    /// Documents in the full-text index
    pub total_documents: u64,

    /// URLs with a recorded fetch attempt
    pub total_urls: u64,

    /// Document counts per topic, largest first
    pub documents_by_topic: Vec<(String, u64)>,

    /// Document counts per domain, largest first
    pub documents_by_domain: Vec<(String, u64)>,
}

impl StoreStatistics {
    /// Share of fetched URLs that ended up as documents, in percent
    pub fn indexed_rate(&self) -> f64 {
        if self.total_urls > 0 {
            (self.total_documents as f64 / self.total_urls as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Loads statistics from storage
///
/// # Returns
///
/// * `Ok(StoreStatistics)` - Successfully loaded statistics
/// * `Err(StorageError)` - Failed to query the store
pub fn load_statistics(store: &dyn DocumentStore) -> StorageResult<StoreStatistics> {
    Ok(StoreStatistics {
        total_documents: store.count_documents()?,
        total_urls: store.count_urls()?,
        documents_by_topic: store.documents_by_topic()?,
        documents_by_domain: store.documents_by_domain()?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Index Statistics ===\n");

    println!("Overview:");
    println!("  Documents indexed: {}", stats.total_documents);
    println!("  URLs fetched: {}", stats.total_urls);
    println!();

    if !stats.documents_by_topic.is_empty() {
        println!("Documents by Topic:");
        for (topic, count) in &stats.documents_by_topic {
            println!("  {}: {}", topic, count);
        }
        println!();
    }

    if !stats.documents_by_domain.is_empty() {
        println!("Documents by Domain:");
        for (domain, count) in &stats.documents_by_domain {
            let percentage = if stats.total_documents > 0 {
                (*count as f64 / stats.total_documents as f64) * 100.0
            } else {
                0.0
            };
            println!("  {}: {} ({:.1}%)", domain, count, percentage);
        }
        println!();
    }

    println!(
        "Indexed Rate: {:.1}% ({} / {} fetched URLs stored as documents)",
        stats.indexed_rate(),
        stats.total_documents,
        stats.total_urls
    );
}
