//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `Frontier`: the set of URLs claimed for fetching, with an atomic claim
//! - `ErrorTally`: failure counts by category, read once for the final report

mod error_tally;
mod frontier;

// Re-export main types
pub use error_tally::ErrorTally;
pub use frontier::Frontier;
