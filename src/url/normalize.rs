use crate::UrlError;
use url::Url;

/// Normalizes a URL into the form used as a frontier key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject anything but `http` and `https`
/// 3. Reject URLs without a host
/// 4. Remove the fragment (everything after `#`)
///
/// Parsing already lowercases the host, resolves dot segments and turns an
/// empty path into `/`.
///
/// # Examples
///
/// ```
/// use mirror_crawl::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.com#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", url_str, e)))?;
    normalize_parsed(url)
}

/// Applies the scheme/host checks and fragment removal to an already parsed URL
pub(crate) fn normalize_parsed(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost(url.to_string()));
    }

    url.set_fragment(None);

    Ok(url)
}
