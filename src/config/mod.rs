//! Configuration module for Mirror-Crawl
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; `Config::default()` is what a crawl started without
//! `--config` uses.
//!
//! # Example
//!
//! ```no_run
//! use mirror_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Downloads per second: {}", config.crawler.requests_per_second);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, MAX_DOWNLOAD_INTERVAL};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
