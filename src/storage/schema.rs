//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Mirror-Crawl database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Distinct failure categories, referenced by failed pages
CREATE TABLE IF NOT EXISTS errors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    http_code INTEGER UNIQUE,
    message TEXT UNIQUE
);

-- One row per claimed URL; exactly one of data/error is set
CREATE TABLE IF NOT EXISTS pages (
    url TEXT NOT NULL PRIMARY KEY,
    isHtml BOOLEAN NOT NULL,
    data BLOB,
    error INTEGER REFERENCES errors(id),
    CHECK ((data IS NULL) <> (error IS NULL))
);

CREATE INDEX IF NOT EXISTS idx_pages_error ON pages(error);

-- Same-origin references between pages
CREATE TABLE IF NOT EXISTS links (
    origin TEXT NOT NULL REFERENCES pages(url),
    target TEXT NOT NULL REFERENCES pages(url),
    PRIMARY KEY(origin, target)
);

CREATE INDEX IF NOT EXISTS idx_links_target ON links(target);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
