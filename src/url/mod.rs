//! URL handling module for Scholar-Crawl
//!
//! This module provides domain extraction, seed/link normalization and the
//! per-domain whitelist policy that decides which URLs may be fetched.

mod domain;
mod normalize;

use crate::config::SiteEntry;
use crate::ConfigError;
use regex::Regex;
use url::Url;

// Re-export main functions
pub use domain::{extract_domain, DomainPattern};
pub use normalize::{parse_seed, resolve_link};

/// Depth budget given to domains that are not in the site table
pub const DEFAULT_DEPTH_BUDGET: u32 = 1;

/// Crawl rules for one registered domain
#[derive(Debug, Clone)]
pub struct CrawlPolicy {
    /// Maximum link hops followed from a seed on this domain
    pub depth_budget: u32,

    /// Path regexes; order is preserved from configuration
    pub allow_patterns: Vec<Regex>,
}

impl CrawlPolicy {
    /// Policy applied to domains that are not registered
    ///
    /// It carries no allow patterns, and an empty pattern list rejects every
    /// path, so unregistered domains are never fetched.
    pub fn unregistered() -> Self {
        Self {
            depth_budget: DEFAULT_DEPTH_BUDGET,
            allow_patterns: Vec::new(),
        }
    }

    /// Returns true if the path matches at least one allow pattern
    pub fn allows_path(&self, path: &str) -> bool {
        self.allow_patterns.iter().any(|p| p.is_match(path))
    }
}

/// Immutable domain -> policy table, built once from configuration
///
/// Exact domain entries take precedence over wildcard entries; among
/// wildcard entries the first configured match wins.
#[derive(Debug, Clone)]
pub struct Whitelist {
    entries: Vec<(DomainPattern, CrawlPolicy)>,
    fallback: CrawlPolicy,
}

impl Whitelist {
    /// Builds a whitelist from configured site entries
    ///
    /// # Returns
    ///
    /// * `Ok(Whitelist)` - All allow patterns compiled
    /// * `Err(ConfigError)` - An allow pattern is not a valid regex
    pub fn from_sites(sites: &[SiteEntry]) -> Result<Self, ConfigError> {
        let mut entries = Vec::with_capacity(sites.len());

        for site in sites {
            let allow_patterns = site
                .allow
                .iter()
                .map(|pattern| {
                    Regex::new(pattern).map_err(|source| ConfigError::InvalidPathPattern {
                        pattern: pattern.clone(),
                        source,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            entries.push((
                DomainPattern::parse(&site.domain),
                CrawlPolicy {
                    depth_budget: site.depth,
                    allow_patterns,
                },
            ));
        }

        Ok(Self {
            entries,
            fallback: CrawlPolicy::unregistered(),
        })
    }

    /// Looks up the policy for a lowercase host
    pub fn policy_for(&self, host: &str) -> &CrawlPolicy {
        let exact = self
            .entries
            .iter()
            .find(|(pattern, _)| !pattern.is_wildcard() && pattern.matches(host));

        exact
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|(pattern, _)| pattern.is_wildcard() && pattern.matches(host))
            })
            .map(|(_, policy)| policy)
            .unwrap_or(&self.fallback)
    }

    /// Returns the depth budget for a lowercase host
    pub fn depth_budget(&self, host: &str) -> u32 {
        self.policy_for(host).depth_budget
    }

    /// Decides whether a URL may be fetched
    ///
    /// Only the path is matched; query string and host play no part beyond
    /// selecting the policy.
    pub fn is_allowed(&self, url: &Url) -> bool {
        match extract_domain(url) {
            Some(host) => self.policy_for(&host).allows_path(url.path()),
            None => false,
        }
    }

    /// Number of registered domains
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates registered domain patterns with their policies
    pub fn iter(&self) -> impl Iterator<Item = (&DomainPattern, &CrawlPolicy)> {
        self.entries.iter().map(|(pattern, policy)| (pattern, policy))
    }
}
