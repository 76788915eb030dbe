use crate::UrlError;
use url::Url;

/// Schemes that never lead to a crawlable page
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Normalizes an absolute URL into the form used as a frontier key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or relative
/// 2. Require an `http` or `https` scheme
/// 3. Require a host (the parser already lowercases it and drops default ports)
/// 4. Remove the fragment (everything after #)
/// 5. Remove an empty query string (trailing ?)
///
/// Dot segments are resolved by the parser itself. Paths keep their trailing
/// slash, since `/docs` and `/docs/` may be different pages.
///
/// # Examples
///
/// ```
/// use sumi_lens::url::normalize_url;
///
/// let url = normalize_url("HTTPS://Example.COM:443/a/../page?#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    finish_normalization(url)
}

/// Resolves a link href against the page it appeared on
///
/// Returns None if the link should be excluded:
/// - empty hrefs
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - hrefs that fail to resolve
/// - anything that is not HTTP(S) after resolution
///
/// Relative, root-relative and scheme-relative hrefs all resolve to the same
/// absolute form as their fully written equivalent, and fragments are dropped,
/// so `#section` resolves to the page itself.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    let joined = base_url.join(href).ok()?;
    finish_normalization(joined).ok()
}

fn finish_normalization(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    if url.query() == Some("") {
        url.set_query(None);
    }

    Ok(url)
}
