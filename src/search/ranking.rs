//! Scoring of full-text candidates
//!
//! score = trust(domain) + title bonus - length penalty

use crate::config::SiteEntry;
use crate::storage::DocumentHit;
use crate::url::DomainPattern;
use serde::Serialize;

/// Title words that mark study material (exercise sets, notes, lectures)
pub const TITLE_KEYWORDS: &[&str] = &["practice", "problems", "notes", "lecture", "example"];

/// Bonus for a title containing one of [`TITLE_KEYWORDS`]
pub const TITLE_BONUS: i32 = 2;

/// Text longer than this many characters is penalised
pub const LONG_TEXT_CHARS: usize = 4000;

pub const LENGTH_PENALTY: i32 = 1;

/// Static per-domain reputation weights
///
/// Lookup follows the whitelist rules: an exact entry wins over a wildcard
/// entry. Unlisted domains weigh 0.
#[derive(Debug, Clone, Default)]
pub struct TrustTable {
    entries: Vec<(DomainPattern, i32)>,
}

impl TrustTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sites(sites: &[SiteEntry]) -> Self {
        let mut table = Self::new();
        for site in sites {
            table.insert(&site.domain, site.trust);
        }
        table
    }

    /// Adds a domain (or `*.domain`) weight
    pub fn insert(&mut self, domain: &str, trust: i32) {
        self.entries.push((DomainPattern::parse(domain), trust));
    }

    /// Returns the trust weight of a host
    pub fn get(&self, domain: &str) -> i32 {
        let domain = domain.to_lowercase();

        let exact = self
            .entries
            .iter()
            .find(|(pattern, _)| !pattern.is_wildcard() && pattern.matches(&domain));

        exact
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|(pattern, _)| pattern.is_wildcard() && pattern.matches(&domain))
            })
            .map(|(_, trust)| *trust)
            .unwrap_or(0)
    }
}

/// A ranked search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredResult {
    pub score: i32,
    pub url: String,
    pub title: String,
    pub domain: String,
    /// Human-readable breakdown of the score
    pub why: String,
}

/// Scores and orders candidates from the store
#[derive(Debug, Clone, Default)]
pub struct Ranker {
    trust: TrustTable,
}

impl Ranker {
    pub fn new(trust: TrustTable) -> Self {
        Self { trust }
    }

    /// Scores a single candidate
    pub fn score(&self, hit: &DocumentHit) -> ScoredResult {
        let trust = self.trust.get(&hit.domain);
        let mut score = trust;
        let mut why = vec![format!("trust {:+}", trust)];

        let title = hit.title.to_lowercase();
        if let Some(keyword) = TITLE_KEYWORDS.iter().find(|k| title.contains(*k)) {
            score += TITLE_BONUS;
            why.push(format!("title mentions '{}' {:+}", keyword, TITLE_BONUS));
        }

        if hit.text.chars().count() > LONG_TEXT_CHARS {
            score -= LENGTH_PENALTY;
            why.push(format!("long text {:+}", -LENGTH_PENALTY));
        }

        ScoredResult {
            score,
            url: hit.url.clone(),
            title: hit.title.clone(),
            domain: hit.domain.clone(),
            why: why.join(", "),
        }
    }

    /// Scores candidates, orders them by descending score and keeps `limit`
    ///
    /// The sort is stable: equal scores keep the order the store returned,
    /// which is full-text relevance.
    pub fn rank(&self, hits: &[DocumentHit], limit: usize) -> Vec<ScoredResult> {
        let mut results: Vec<ScoredResult> = hits.iter().map(|hit| self.score(hit)).collect();
        results.sort_by(|a, b| b.score.cmp(&a.score));
        results.truncate(limit);
        results
    }
}
