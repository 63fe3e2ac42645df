//! Output module for crawl reports and statistics
//!
//! This module handles:
//! - The end-of-crawl report built from in-memory counters
//! - Statistics read back from the crawl database

mod report;
pub mod stats;

pub use report::{print_report, CrawlReport};
pub use stats::{load_statistics, print_statistics, CrawlStatistics};
