//! Database connection management
//!
//! Opening and configuring SQLite connections

use crate::errors::{from_rusqlite, Result};
use rusqlite::Connection;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// SQLite journal mode applied at open time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JournalMode {
    Delete,
    Truncate,
    Memory,
    #[default]
    Wal,
}

impl fmt::Display for JournalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JournalMode::Delete => write!(f, "DELETE"),
            JournalMode::Truncate => write!(f, "TRUNCATE"),
            JournalMode::Memory => write!(f, "MEMORY"),
            JournalMode::Wal => write!(f, "WAL"),
        }
    }
}

/// Connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub foreign_keys: bool,
    pub journal_mode: JournalMode,
    pub busy_timeout_ms: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            foreign_keys: true,
            journal_mode: JournalMode::Wal,
            busy_timeout_ms: 5000,
        }
    }
}

impl StoreConfig {
    pub fn with_foreign_keys(mut self, enabled: bool) -> Self {
        self.foreign_keys = enabled;
        self
    }

    pub fn with_journal_mode(mut self, mode: JournalMode) -> Self {
        self.journal_mode = mode;
        self
    }

    pub fn with_busy_timeout_ms(mut self, millis: u32) -> Self {
        self.busy_timeout_ms = millis;
        self
    }
}

/// Open a SQLite database at the given path
///
/// # Errors
///
/// `StorageFailure` if SQLite cannot open the file.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database
///
/// # Errors
///
/// `StorageFailure` if SQLite cannot allocate the database.
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Apply `config` to a connection
///
/// In-memory databases always journal in memory, so the journal mode is
/// left alone for them.
///
/// # Errors
///
/// `StorageFailure` if a pragma is rejected.
pub fn configure(conn: &Connection, config: &StoreConfig) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", config.foreign_keys)
        .map_err(from_rusqlite)?;

    conn.busy_timeout(Duration::from_millis(u64::from(config.busy_timeout_ms)))
        .map_err(from_rusqlite)?;

    if !is_in_memory(conn)? {
        // journal_mode answers with the mode actually in effect
        let mode: String = conn
            .pragma_update_and_check(None, "journal_mode", config.journal_mode.to_string(), |row| {
                row.get(0)
            })
            .map_err(from_rusqlite)?;
        tracing::debug!(journal_mode = %mode, "configured sqlite journal");
    }

    Ok(())
}

// `main` has an empty file name when it lives in memory
fn is_in_memory(conn: &Connection) -> Result<bool> {
    let file: String = conn
        .query_row("PRAGMA database_list", [], |row| row.get(2))
        .map_err(from_rusqlite)?;
    Ok(file.is_empty())
}
