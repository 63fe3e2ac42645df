//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{ErrorRecord, LinkRecord, Page};
use crate::CrawlError;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database at `path`
    ///
    /// Missing parent directories are created.
    ///
    /// Foreign keys are declared but not enforced: a link is recorded when its
    /// origin page is processed, which can be before the target page lands.
    pub fn new(path: &Path) -> Result<Self, CrawlError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, CrawlError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn page_from_row(row: &Row<'_>) -> rusqlite::Result<Page> {
    Ok(Page {
        url: row.get(0)?,
        is_html: row.get(1)?,
        data: row.get(2)?,
        error_id: row.get(3)?,
    })
}

fn error_from_row(row: &Row<'_>) -> rusqlite::Result<ErrorRecord> {
    Ok(ErrorRecord {
        id: row.get(0)?,
        http_code: row.get(1)?,
        message: row.get(2)?,
    })
}

impl Storage for SqliteStorage {
    // ===== Pages =====

    fn get_page_by_url(&self, url: &str) -> StorageResult<Option<Page>> {
        let page = self
            .conn
            .query_row(
                "SELECT url, isHtml, data, error FROM pages WHERE url = ?1",
                params![url],
                page_from_row,
            )
            .optional()?;

        Ok(page)
    }

    fn create_page(&mut self, page: &Page) -> StorageResult<()> {
        match (&page.data, page.error_id) {
            (None, None) => {
                return Err(StorageError::ConstraintViolation(format!(
                    "page {} must have data or an error",
                    page.url
                )));
            }
            (Some(_), Some(_)) => {
                return Err(StorageError::ConstraintViolation(format!(
                    "page {} cannot have both data and an error",
                    page.url
                )));
            }
            (Some(data), None) => {
                self.conn.execute(
                    "INSERT INTO pages (url, isHtml, data) VALUES (?1, ?2, ?3)",
                    params![page.url, page.is_html, data],
                )?;
            }
            (None, Some(error_id)) => {
                self.conn.execute(
                    "INSERT INTO pages (url, isHtml, error) VALUES (?1, ?2, ?3)",
                    params![page.url, page.is_html, error_id],
                )?;
            }
        }

        Ok(())
    }

    // ===== Errors =====

    fn get_error_by_code(&self, code: u16) -> StorageResult<Option<ErrorRecord>> {
        let error = self
            .conn
            .query_row(
                "SELECT id, http_code, message FROM errors WHERE http_code = ?1",
                params![code],
                error_from_row,
            )
            .optional()?;

        Ok(error)
    }

    fn get_error_by_message(&self, message: &str) -> StorageResult<Option<ErrorRecord>> {
        let error = self
            .conn
            .query_row(
                "SELECT id, http_code, message FROM errors WHERE message = ?1",
                params![message],
                error_from_row,
            )
            .optional()?;

        Ok(error)
    }

    fn create_error(
        &mut self,
        code: Option<u16>,
        message: Option<&str>,
    ) -> StorageResult<ErrorRecord> {
        if code.is_none() && message.is_none() {
            return Err(StorageError::ConstraintViolation(
                "error must have a code or a message".to_string(),
            ));
        }

        self.conn.execute(
            "INSERT INTO errors (http_code, message) VALUES (?1, ?2)",
            params![code, message],
        )?;

        let created = match (code, message) {
            (Some(code), _) => self.get_error_by_code(code)?,
            (None, Some(message)) => self.get_error_by_message(message)?,
            (None, None) => None,
        };

        created.ok_or_else(|| {
            StorageError::Database("inserted error row is not visible".to_string())
        })
    }

    // ===== Links =====

    fn insert_link(&mut self, origin: &str, target: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO links (origin, target) VALUES (?1, ?2)",
            params![origin, target],
        )?;
        Ok(())
    }

    fn get_outgoing_links(&self, origin: &str) -> StorageResult<Vec<LinkRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT origin, target FROM links WHERE origin = ?1 ORDER BY target")?;

        let links = stmt
            .query_map(params![origin], |row| {
                Ok(LinkRecord {
                    origin: row.get(0)?,
                    target: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(links)
    }

    // ===== Statistics =====

    fn count_pages(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_html_pages(&self) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM pages WHERE isHtml AND data IS NOT NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_failed_pages(&self) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM pages WHERE error IS NOT NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_links(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM links", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn error_breakdown(&self) -> StorageResult<Vec<(ErrorRecord, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT e.id, e.http_code, e.message, COUNT(p.url) AS pages
             FROM errors e LEFT JOIN pages p ON p.error = e.id
             GROUP BY e.id
             ORDER BY pages DESC, e.id ASC",
        )?;

        let rows = stmt
            .query_map([], |row| {
                let record = error_from_row(row)?;
                let pages: i64 = row.get(3)?;
                Ok((record, pages as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}
