//! HTML link extraction
//!
//! This module turns an HTML document into the ordered list of `href` values
//! found under its `<body>`. Resolution and filtering are left to the caller.

use scraper::{ElementRef, Html, Selector};

/// Extracts every `href` attribute under the document body
///
/// The walk starts at `<body>` itself and visits elements in document order
/// (an element before its children, children left to right). Values are
/// returned raw: not trimmed, not resolved against a base URL and not filtered
/// by scheme. The same input always yields the same sequence.
///
/// The parser always synthesizes a `<body>`, so fragments and documents
/// without one are handled; elements in `<head>` are never visited.
///
/// # Example
///
/// ```
/// use mirror_crawl::crawler::extract_links;
///
/// let html = r#"<html><body><a href="/a">A</a><div><a href="/b">B</a></div></body></html>"#;
/// assert_eq!(extract_links(html), vec!["/a", "/b"]);
/// ```
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let body = match Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
    {
        Some(body) => body,
        None => return Vec::new(),
    };

    // `descendants` is an iterative pre-order traversal that includes `body`.
    body.descendants()
        .filter_map(ElementRef::wrap)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Extracts links from a downloaded body, replacing invalid UTF-8
pub fn extract_links_from_bytes(body: &[u8]) -> Vec<String> {
    extract_links(&String::from_utf8_lossy(body))
}
