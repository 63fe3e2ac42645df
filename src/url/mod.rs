//! URL handling module for Mirror-Crawl
//!
//! This module provides URL normalization, same-origin link resolution and the
//! mapping from URLs to paths inside the mirror tree.

mod mirror;
mod normalize;

use url::Url;

// Re-export main functions
pub use mirror::{final_segment_len, host_dir, mirror_path, HTML_INDEX_FILE, RESOURCE_INDEX_FILE};
pub use normalize::normalize_url;

/// Returns true for hrefs the crawler follows: site-relative paths
///
/// Only hrefs starting with a single `/` qualify. Protocol-relative hrefs
/// (`//host/path`) name another host and are skipped.
pub fn is_site_relative(href: &str) -> bool {
    href.starts_with('/') && !href.starts_with("//")
}

/// Resolves a discovered href against the crawl root
///
/// Returns `None` when the href is not site-relative, cannot be joined, or
/// resolves to a different origin than the root. The result has its fragment
/// removed so `/page#a` and `/page#b` share one frontier entry.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use mirror_crawl::url::resolve_same_origin;
///
/// let root = Url::parse("https://example.com/docs/").unwrap();
/// let target = resolve_same_origin(&root, "/about#team").unwrap();
/// assert_eq!(target.as_str(), "https://example.com/about");
///
/// assert!(resolve_same_origin(&root, "https://other.com/").is_none());
/// assert!(resolve_same_origin(&root, "relative/path").is_none());
/// ```
pub fn resolve_same_origin(root: &Url, href: &str) -> Option<Url> {
    if !is_site_relative(href) {
        return None;
    }

    let joined = root.join(href).ok()?;
    if joined.origin() != root.origin() {
        return None;
    }

    normalize::normalize_parsed(joined).ok()
}
