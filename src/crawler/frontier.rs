//! Breadth-first crawl frontier
//!
//! This module handles:
//! - FIFO ordering of URLs waiting to be fetched
//! - Tracking the link depth of each queued URL
//! - The visited set that stops a URL from being processed twice

use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// The URL to fetch
    pub url: Url,

    /// Link hops from the seed (seeds are depth 0)
    pub depth: u32,
}

/// FIFO queue of pending URLs plus the set of URLs already processed
///
/// A URL may sit in the queue more than once; only the first dequeue is
/// processed because [`Frontier::mark_visited`] rejects the rest.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier holding the seeds at depth 0, in order
    pub fn seeded<I>(seeds: I) -> Self
    where
        I: IntoIterator<Item = Url>,
    {
        let mut frontier = Self::new();
        for url in seeds {
            frontier.push(url, 0);
        }
        frontier
    }

    /// Appends a URL to the back of the queue
    pub fn push(&mut self, url: Url, depth: u32) {
        self.queue.push_back(FrontierEntry { url, depth });
    }

    /// Removes the URL at the front of the queue
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    /// Marks a URL as processed
    ///
    /// Returns false if it had already been marked.
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        self.visited.insert(url.as_str().to_string())
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    /// Number of queued entries
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of URLs marked visited
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
