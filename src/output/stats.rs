//! Statistics generation from crawl database
//!
//! This module provides functionality for extracting and displaying
//! crawl statistics from the storage layer.

use crate::storage::{ErrorRecord, Storage};
use crate::CrawlError;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Total number of page rows
    pub total_pages: u64,

    /// Pages stored with HTML bodies
    pub html_pages: u64,

    /// Pages stored with an error reference
    pub failed_pages: u64,

    /// Total number of links recorded
    pub total_links: u64,

    /// Error categories with the number of pages referencing each
    pub error_breakdown: Vec<(ErrorRecord, u64)>,
}

impl CrawlStatistics {
    /// Pages stored with a body
    pub fn downloaded_pages(&self) -> u64 {
        self.total_pages.saturating_sub(self.failed_pages)
    }

    /// Share of pages that were downloaded, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_pages > 0 {
            (self.downloaded_pages() as f64 / self.total_pages as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Successfully loaded statistics
/// * `Err(CrawlError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> Result<CrawlStatistics, CrawlError> {
    let total_pages = storage.count_pages()?;
    let html_pages = storage.count_html_pages()?;
    let failed_pages = storage.count_failed_pages()?;
    let total_links = storage.count_links()?;

    let error_breakdown = storage.error_breakdown()?;

    Ok(CrawlStatistics {
        total_pages,
        html_pages,
        failed_pages,
        total_links,
        error_breakdown,
    })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Total pages: {}", stats.total_pages);
    println!("  Downloaded: {}", stats.downloaded_pages());
    println!("  HTML pages: {}", stats.html_pages);
    println!("  Failed: {}", stats.failed_pages);
    println!("  Total links: {}", stats.total_links);
    println!();

    if !stats.error_breakdown.is_empty() {
        println!("Error Summary:");
        for (error, count) in &stats.error_breakdown {
            println!("  {}: {}", error.label(), count);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} pages downloaded)",
        stats.success_rate(),
        stats.downloaded_pages(),
        stats.total_pages
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Page, SqliteStorage};

    #[test]
    fn test_load_statistics_empty() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        let stats = load_statistics(&storage).unwrap();

        assert_eq!(stats.total_pages, 0);
        assert_eq!(stats.total_links, 0);
        assert!(stats.error_breakdown.is_empty());
        assert_eq!(stats.success_rate(), 0.0);
    }

    #[test]
    fn test_load_statistics() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();

        storage
            .create_page(&Page::downloaded("https://example.com/", true, b"<html>".to_vec()))
            .unwrap();
        storage
            .create_page(&Page::downloaded("https://example.com/a.png", false, vec![1, 2]))
            .unwrap();

        let not_found = storage.get_or_create_error(Some(404), None).unwrap();
        storage
            .create_page(&Page::failed("https://example.com/x", not_found.id))
            .unwrap();
        storage
            .create_page(&Page::failed("https://example.com/y", not_found.id))
            .unwrap();

        let refused = storage
            .get_or_create_error(None, Some("connection failed"))
            .unwrap();
        storage
            .create_page(&Page::failed("https://example.com/z", refused.id))
            .unwrap();

        storage
            .insert_link("https://example.com/", "https://example.com/x")
            .unwrap();

        let stats = load_statistics(&storage).unwrap();

        assert_eq!(stats.total_pages, 5);
        assert_eq!(stats.downloaded_pages(), 2);
        assert_eq!(stats.html_pages, 1);
        assert_eq!(stats.failed_pages, 3);
        assert_eq!(stats.total_links, 1);
        assert!((stats.success_rate() - 40.0).abs() < 1e-9);

        // Most frequent category first.
        assert_eq!(stats.error_breakdown[0].0.http_code, Some(404));
        assert_eq!(stats.error_breakdown[0].1, 2);
        assert_eq!(stats.error_breakdown[1].1, 1);
    }
}
