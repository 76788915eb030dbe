use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_lens::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if `link` points at the same site as `page`
///
/// Two addresses belong to the same site when their hosts match and their
/// effective ports match (`http://a.com` and `http://a.com:80` are the same
/// site, `http://a.com:8080` is not). Subdomains count as external.
pub fn is_internal(page: &Url, link: &Url) -> bool {
    extract_host(page).is_some()
        && extract_host(page) == extract_host(link)
        && page.port_or_known_default() == link.port_or_known_default()
}
