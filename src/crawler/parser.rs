//! Link discovery for fetched pages
//!
//! Every `<a href>` is resolved against the page URL; links that cannot lead
//! to another HTML page (javascript:, mailto:, tel:, data:, same-page
//! anchors, non-HTTP schemes) are dropped. Fragments are removed before
//! deduplication so `/a#x` and `/a#y` count as one link.

use crate::url::resolve_link;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts absolute, deduplicated links from an HTML page
///
/// Links keep the order in which they first appear in the document, which
/// makes breadth-first crawl order deterministic for a given page.
///
/// # Example
///
/// ```
/// use scholar_crawl::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<a href="/a">A</a><a href="mailto:x@y.org">mail</a><a href="/a#top">A again</a>"#;
/// let base = Url::parse("https://example.org/page").unwrap();
/// let links = extract_links(html, &base);
/// assert_eq!(links, vec![Url::parse("https://example.org/a").unwrap()]);
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if let Some(url) = resolve_link(href, base_url) {
            if seen.insert(url.as_str().to_string()) {
                links.push(url);
            }
        }
    }

    links
}
