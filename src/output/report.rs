//! End-of-crawl report
//!
//! The report is assembled by the coordinator from its own counters and the
//! shared error tally, then printed by the CLI.

use crate::state::ErrorTally;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Summary of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// The root URL the crawl started from
    pub root: String,

    /// When the crawl started
    pub started_at: DateTime<Utc>,

    /// When the last worker finished
    pub finished_at: DateTime<Utc>,

    /// Wall-clock duration of the crawl
    pub duration: Duration,

    /// URLs claimed for fetching
    pub urls_claimed: u64,

    /// Resources written into the mirror tree
    pub pages_mirrored: u64,

    /// Mirrored resources served as HTML
    pub html_pages: u64,

    /// Same-origin links accepted into the crawl (including duplicates)
    pub links_followed: u64,

    /// Per-category failure counts
    pub errors: ErrorTally,
}

impl CrawlReport {
    /// URLs that were claimed but not mirrored
    pub fn failed_pages(&self) -> u64 {
        self.urls_claimed.saturating_sub(self.pages_mirrored)
    }

    /// Mirrored pages per second of wall-clock time
    pub fn pages_per_second(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.pages_mirrored as f64 / secs
        } else {
            0.0
        }
    }
}

/// Prints the report to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Root: {}", report.root);
    println!("Started: {}", report.started_at.to_rfc3339());
    println!("Finished: {}", report.finished_at.to_rfc3339());
    println!(
        "Duration: {:.2}s ({:.2} pages/sec)",
        report.duration.as_secs_f64(),
        report.pages_per_second()
    );
    println!();

    println!("Overview:");
    println!("  URLs claimed: {}", report.urls_claimed);
    println!("  Pages mirrored: {}", report.pages_mirrored);
    println!("  HTML pages: {}", report.html_pages);
    println!("  Links followed: {}", report.links_followed);
    println!("  Failed: {}", report.failed_pages());
    println!();

    if report.errors.is_empty() {
        println!("No errors.");
        return;
    }

    println!("Errors ({} total):", report.errors.total());

    if !report.errors.unknown.is_empty() {
        println!("  Unknown errors:");
        for (message, count) in &report.errors.unknown {
            println!("    {}: {}", message, count);
        }
    }

    if !report.errors.http.is_empty() {
        println!("  HTTP errors:");
        for (status, count) in &report.errors.http {
            println!("    {}: {}", status, count);
        }
    }

    if report.errors.filename_too_long > 0 {
        println!(
            "  Filename too long: {}",
            report.errors.filename_too_long
        );
    }
}
