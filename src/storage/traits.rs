//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{ErrorRecord, LinkRecord, Page};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// The store is write-once per key: there are no update or delete operations.
pub trait Storage {
    // ===== Pages =====

    /// Gets a page by URL
    fn get_page_by_url(&self, url: &str) -> StorageResult<Option<Page>>;

    /// Inserts a page
    ///
    /// Fails with `ConstraintViolation` unless exactly one of `data` and
    /// `error_id` is set. Only the populated columns are written.
    fn create_page(&mut self, page: &Page) -> StorageResult<()>;

    // ===== Errors =====

    /// Gets the error category for an HTTP status code
    fn get_error_by_code(&self, code: u16) -> StorageResult<Option<ErrorRecord>>;

    /// Gets the error category for a failure message
    fn get_error_by_message(&self, message: &str) -> StorageResult<Option<ErrorRecord>>;

    /// Inserts an error category and returns the stored row
    ///
    /// Fails with `ConstraintViolation` if both `code` and `message` are absent.
    /// The row is read back by code, or by message when no code is given.
    fn create_error(&mut self, code: Option<u16>, message: Option<&str>)
        -> StorageResult<ErrorRecord>;

    /// Looks up an error category, creating it on first sight
    fn get_or_create_error(
        &mut self,
        code: Option<u16>,
        message: Option<&str>,
    ) -> StorageResult<ErrorRecord> {
        let existing = match (code, message) {
            (Some(code), _) => self.get_error_by_code(code)?,
            (None, Some(message)) => self.get_error_by_message(message)?,
            (None, None) => None,
        };

        match existing {
            Some(record) => Ok(record),
            None => self.create_error(code, message),
        }
    }

    // ===== Links =====

    /// Records a link between two pages; recording the same pair twice is a no-op
    fn insert_link(&mut self, origin: &str, target: &str) -> StorageResult<()>;

    /// Gets all links whose origin is the given page
    fn get_outgoing_links(&self, origin: &str) -> StorageResult<Vec<LinkRecord>>;

    // ===== Statistics =====

    /// Gets total page count
    fn count_pages(&self) -> StorageResult<u64>;

    /// Counts pages downloaded as HTML
    fn count_html_pages(&self) -> StorageResult<u64>;

    /// Counts pages that reference an error
    fn count_failed_pages(&self) -> StorageResult<u64>;

    /// Counts the total number of links
    fn count_links(&self) -> StorageResult<u64>;

    /// Gets every error category with the number of pages referencing it
    fn error_breakdown(&self) -> StorageResult<Vec<(ErrorRecord, u64)>>;
}
