//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the identifying user agent
//! - GET requests with redirect following and a bounded timeout
//! - The HTML content-type gate
//! - Classifying failures so the crawl can carry on

use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, CONTENT_TYPE, ETAG, LAST_MODIFIED};
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed per request
const MAX_REDIRECTS: usize = 10;

/// Result of a fetch operation
#[derive(Debug, Clone)]
pub enum FetchResult {
    /// HTTP 200 with an HTML body
    Html {
        /// Final URL after redirects
        final_url: Url,
        /// Page body content
        body: String,
        etag: Option<String>,
        last_modified: Option<String>,
    },

    /// Any status other than 200
    HttpError { status_code: u16 },

    /// HTTP 200 but the body is not HTML
    ContentMismatch {
        status_code: u16,
        content_type: String,
    },

    /// No usable response (connection refused, timeout, DNS, body read)
    NetworkError { error: String },
}

impl FetchResult {
    /// Returns the HTTP status, if a response was received
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Html { .. } => Some(StatusCode::OK.as_u16()),
            Self::HttpError { status_code } | Self::ContentMismatch { status_code, .. } => {
                Some(*status_code)
            }
            Self::NetworkError { .. } => None,
        }
    }
}

/// Source of page content for the crawler
///
/// The HTTP implementation is [`HttpFetcher`]; tests substitute canned pages.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches a URL; never fails, problems are described by the result
    async fn fetch(&self, url: &Url) -> FetchResult;
}

/// Formats the identifying user agent
///
/// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use scholar_crawl::config::UserAgentConfig;
/// use scholar_crawl::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "ScholarCrawl".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.org/crawler".to_string(),
///     contact_email: "crawler@example.org".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .timeout(timeout)
        .connect_timeout(timeout)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &UserAgentConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config, timeout)?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> FetchResult {
        fetch_url(&self.client, url).await
    }
}

/// Returns true if a Content-Type header value denotes HTML
pub fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

/// Fetches a URL and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | 200 + HTML content type | `Html` |
/// | 200 + other content type | `ContentMismatch` |
/// | any other status | `HttpError` |
/// | timeout, connect, DNS, body read failure | `NetworkError` |
pub async fn fetch_url(client: &Client, url: &Url) -> FetchResult {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else if e.is_redirect() {
                format!("Redirect error: {}", e)
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    if status != StatusCode::OK {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let headers = response.headers();
    let content_type = header_value(headers, CONTENT_TYPE).unwrap_or_default();
    if !is_html_content_type(&content_type) {
        return FetchResult::ContentMismatch {
            status_code: status.as_u16(),
            content_type,
        };
    }

    let etag = header_value(headers, ETAG);
    let last_modified = header_value(headers, LAST_MODIFIED);
    let final_url = response.url().clone();

    match response.text().await {
        Ok(body) => FetchResult::Html {
            final_url,
            body,
            etag,
            last_modified,
        },
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
        },
    }
}

fn header_value(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
