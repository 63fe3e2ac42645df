//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching into the mirror tree
//! - HTML link extraction
//! - Global download pacing and the open-handle bound
//! - Work queue management and overall crawl coordination

mod coordinator;
mod fetcher;
mod handle_gate;
mod parser;
mod rate_limiter;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{
    build_http_client, classify_transport_error, is_html_content_type, FetchResult, Fetcher,
};
pub use handle_gate::{HandleGate, HandlePermit};
pub use parser::{extract_links, extract_links_from_bytes};
pub use rate_limiter::RateLimiter;
pub use scheduler::{Admission, QueuedUrl, Scheduler};

use crate::config::Config;
use crate::output::CrawlReport;
use crate::CrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration and the root URL
/// 2. Initialize the storage layer (when a database is configured)
/// 3. Build the HTTP client
/// 4. Fetch the root and every same-origin link reachable from it
/// 5. Return the crawl report
///
/// # Arguments
///
/// * `root` - The URL to start from
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed
/// * `Err(CrawlError)` - Crawl could not be set up
pub async fn crawl(root: &str, config: Config) -> Result<CrawlReport, CrawlError> {
    run_crawl(root, config).await
}
