use url::Url;

/// Extracts the lowercase host of a URL
///
/// Ports are not part of the domain, so `https://example.org:8443/` and
/// `https://example.org/` share one whitelist entry and one trust weight.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use scholar_crawl::url::extract_domain;
///
/// let url = Url::parse("https://EN.Wikipedia.org/wiki/Calculus").unwrap();
/// assert_eq!(extract_domain(&url), Some("en.wikipedia.org".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// A domain key from the site table
///
/// `example.org` matches only that host. `*.example.org` matches the bare
/// domain and any subdomain of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainPattern {
    Exact(String),
    Subdomains(String),
}

impl DomainPattern {
    pub fn parse(pattern: &str) -> Self {
        let pattern = pattern.to_lowercase();
        match pattern.strip_prefix("*.") {
            Some(base) => Self::Subdomains(base.to_string()),
            None => Self::Exact(pattern),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Subdomains(_))
    }

    /// Checks a lowercase host against this pattern
    pub fn matches(&self, host: &str) -> bool {
        match self {
            Self::Exact(domain) => host == domain,
            Self::Subdomains(base) => {
                host == base
                    || host
                        .strip_suffix(base.as_str())
                        .is_some_and(|prefix| prefix.ends_with('.'))
            }
        }
    }
}
