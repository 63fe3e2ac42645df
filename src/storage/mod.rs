//! Storage module for persisting crawl data
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - Page persistence (downloaded bytes or a failure reference)
//! - Link relationship tracking
//! - Lazily created error categories

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::CrawlError;

use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(CrawlError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, CrawlError> {
    SqliteStorage::new(path)
}

/// A crawled URL as stored in the database
///
/// Exactly one of `data` and `error_id` is set. `is_html` only carries
/// meaning when `data` is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    pub is_html: bool,
    pub data: Option<Vec<u8>>,
    pub error_id: Option<i64>,
}

impl Page {
    /// A page whose body was downloaded
    pub fn downloaded(url: impl Into<String>, is_html: bool, data: Vec<u8>) -> Self {
        Self {
            url: url.into(),
            is_html,
            data: Some(data),
            error_id: None,
        }
    }

    /// A page whose fetch failed with the given error category
    pub fn failed(url: impl Into<String>, error_id: i64) -> Self {
        Self {
            url: url.into(),
            is_html: false,
            data: None,
            error_id: Some(error_id),
        }
    }
}

/// Represents a link relationship between pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub origin: String,
    pub target: String,
}

/// A distinct failure category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub id: i64,
    pub http_code: Option<u16>,
    pub message: Option<String>,
}

impl ErrorRecord {
    /// Short label for reports: the status code or the message
    pub fn label(&self) -> String {
        match (self.http_code, &self.message) {
            (Some(code), _) => format!("HTTP {}", code),
            (None, Some(message)) => message.clone(),
            (None, None) => format!("error #{}", self.id),
        }
    }
}
