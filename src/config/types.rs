use serde::Deserialize;

/// Main configuration structure for Scholar-Crawl
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub storage: StorageConfig,
    #[serde(default, rename = "site")]
    pub sites: Vec<SiteEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Default number of documents a crawl may store
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Fixed pause after every fetch (milliseconds)
    #[serde(rename = "politeness-delay-ms", default = "default_politeness_delay_ms")]
    pub politeness_delay_ms: u64,

    /// Extracted text shorter than this is not stored
    #[serde(rename = "min-text-chars", default = "default_min_text_chars")]
    pub min_text_chars: usize,

    /// Per-request timeout (seconds)
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            politeness_delay_ms: default_politeness_delay_ms(),
            min_text_chars: default_min_text_chars(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

fn default_max_pages() -> usize {
    20
}

fn default_politeness_delay_ms() -> u64 {
    500
}

fn default_min_text_chars() -> usize {
    600
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// A whitelisted site: crawl policy plus ranking trust
#[derive(Debug, Clone, Deserialize)]
pub struct SiteEntry {
    /// Domain pattern (e.g., "en.wikipedia.org" or "*.example.org")
    pub domain: String,

    /// How many link hops to follow from a seed on this domain
    #[serde(default = "default_depth")]
    pub depth: u32,

    /// Path regexes; a URL is crawlable only if its path matches one
    #[serde(default)]
    pub allow: Vec<String>,

    /// Static reputation weight used by search ranking
    #[serde(default)]
    pub trust: i32,
}

fn default_depth() -> u32 {
    1
}
