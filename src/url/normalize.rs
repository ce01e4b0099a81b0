use crate::{UrlError, UrlResult};
use url::Url;

/// Parses a seed URL supplied by the caller
///
/// Seeds must be absolute http(s) URLs with a host. The fragment is dropped
/// so that a seed and a discovered link to the same page share one key.
pub fn parse_seed(raw: &str) -> UrlResult<Url> {
    let mut url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse {
        url: raw.to_string(),
        message: e.to_string(),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "only http and https seeds are supported, got '{}'",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain(raw.to_string()));
    }

    url.set_fragment(None);
    Ok(url)
}

/// Resolves an href against a base URL into a crawlable absolute URL
///
/// Returns `None` for non-navigable targets (`mailto:`, `javascript:`,
/// `tel:`, `data:`), same-page anchors, unparseable hrefs and anything that
/// is not http(s) after resolution. The fragment is always stripped.
pub fn resolve_link(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_fragment(None);
    Some(url)
}
