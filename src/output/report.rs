//! Console rendering of crawl reports, search results and the whitelist

use crate::crawler::CrawlReport;
use crate::search::ScoredResult;
use crate::url::{DomainPattern, Whitelist};

/// Prints the summary of a finished crawl
pub fn print_crawl_report(report: &CrawlReport, topic: &str) {
    println!("=== Crawl Summary ({}) ===\n", topic);
    println!("  Documents stored: {}", report.stored);
    println!("  URLs visited: {}", report.visited);
    println!("  Rejected by whitelist: {}", report.rejected);
    println!("  Fetch failures: {}", report.failed);
    println!("  Too little text: {}", report.thin);
}

/// Prints ranked search results, best first
pub fn print_results(query: &str, results: &[ScoredResult]) {
    if results.is_empty() {
        println!("No results for '{}'", query);
        return;
    }

    for (i, result) in results.iter().enumerate() {
        println!("{:>2}. [{:+}] {}", i + 1, result.score, result.title);
        println!("    {}", result.url);
        println!("    {} ({})", result.domain, result.why);
    }
}

/// Prints each registered domain with its depth budget and allow patterns
pub fn print_whitelist(whitelist: &Whitelist) {
    println!("Whitelist ({} domains):", whitelist.len());

    for (pattern, policy) in whitelist.iter() {
        let domain = match pattern {
            DomainPattern::Exact(domain) => domain.clone(),
            DomainPattern::Subdomains(base) => format!("*.{}", base),
        };
        println!("  {} (depth {})", domain, policy.depth_budget);

        if policy.allow_patterns.is_empty() {
            println!("    (no allow patterns: nothing on this domain is crawled)");
        }
        for regex in &policy.allow_patterns {
            println!("    allow {}", regex.as_str());
        }
    }
}
