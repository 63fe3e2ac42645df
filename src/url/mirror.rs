use std::path::{Path, PathBuf};
use url::Url;

/// File written for HTML pages inside their path directory
pub const HTML_INDEX_FILE: &str = "index.html";

/// File written for non-HTML resources whose path ends in `/`
pub const RESOURCE_INDEX_FILE: &str = "index";

/// Returns the length in characters of the URL's final path segment
///
/// The segment is measured as it appears in the URL (percent-encoded), which
/// is also how it is written to disk. A path ending in `/` has an empty final
/// segment.
pub fn final_segment_len(url: &Url) -> usize {
    url.path_segments()
        .and_then(|segments| segments.last())
        .map(|segment| segment.chars().count())
        .unwrap_or(0)
}

/// Directory name for a URL's host: `host`, or `host_port` with an explicit port
pub fn host_dir(url: &Url) -> String {
    let host = url.host_str().unwrap_or("unknown-host");
    match url.port() {
        Some(port) => format!("{}_{}", host, port),
        None => host.to_string(),
    }
}

/// Computes where a fetched resource is written inside the mirror tree
///
/// HTML pages become `<root>/<host>/<path>/index.html`; other resources are
/// written to `<root>/<host>/<path>`, or `<root>/<host>/<path>/index` when the
/// path ends in `/`. Query strings do not contribute to the path.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use url::Url;
/// use mirror_crawl::url::mirror_path;
///
/// let url = Url::parse("https://example.com/docs/intro").unwrap();
/// assert_eq!(
///     mirror_path(Path::new("out"), &url, true),
///     Path::new("out/example.com/docs/intro/index.html")
/// );
/// ```
pub fn mirror_path(root: &Path, url: &Url, is_html: bool) -> PathBuf {
    let mut path = root.join(host_dir(url));

    let mut trailing_slash = true;
    if let Some(segments) = url.path_segments() {
        for segment in segments {
            trailing_slash = segment.is_empty();
            if segment.is_empty() || segment == "." || segment == ".." {
                continue;
            }
            path.push(segment);
        }
    }

    if is_html {
        path.push(HTML_INDEX_FILE);
    } else if trailing_slash {
        path.push(RESOURCE_INDEX_FILE);
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_final_segment_len() {
        assert_eq!(final_segment_len(&url("https://example.com/")), 0);
        assert_eq!(final_segment_len(&url("https://example.com/abc")), 3);
        assert_eq!(final_segment_len(&url("https://example.com/abc/de")), 2);
        assert_eq!(final_segment_len(&url("https://example.com/abc/")), 0);
    }

    #[test]
    fn test_final_segment_len_long() {
        let long = "a".repeat(300);
        let u = url(&format!("https://example.com/dir/{}", long));
        assert_eq!(final_segment_len(&u), 300);
    }

    #[test]
    fn test_host_dir_with_port() {
        assert_eq!(host_dir(&url("http://127.0.0.1:8080/")), "127.0.0.1_8080");
        assert_eq!(host_dir(&url("https://example.com/")), "example.com");
        // Default ports are not kept by the parser.
        assert_eq!(host_dir(&url("https://example.com:443/")), "example.com");
    }

    #[test]
    fn test_root_html() {
        let path = mirror_path(Path::new("out"), &url("https://example.com"), true);
        assert_eq!(path, Path::new("out/example.com/index.html"));
    }

    #[test]
    fn test_nested_html() {
        let path = mirror_path(Path::new("out"), &url("https://example.com/a/b/"), true);
        assert_eq!(path, Path::new("out/example.com/a/b/index.html"));
    }

    #[test]
    fn test_resource_file() {
        let path = mirror_path(
            Path::new("out"),
            &url("https://example.com/img/logo.png?v=2"),
            false,
        );
        assert_eq!(path, Path::new("out/example.com/img/logo.png"));
    }

    #[test]
    fn test_resource_with_trailing_slash() {
        let path = mirror_path(Path::new("out"), &url("https://example.com/feed/"), false);
        assert_eq!(path, Path::new("out/example.com/feed/index"));

        let path = mirror_path(Path::new("out"), &url("https://example.com/"), false);
        assert_eq!(path, Path::new("out/example.com/index"));
    }
}
