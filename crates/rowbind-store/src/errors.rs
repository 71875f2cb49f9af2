//! Error handling for rowbind-store
//!
//! Maps rusqlite failures into the core ExError facility

use rowbind_core::errors::ExError;
use rowbind_core::RowbindError;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a storage error from rusqlite::Error, keeping it as the source
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::storage(err).with_op("sqlite")
}

/// Create an error for a column value SQLite returned that `Value` cannot hold
pub fn unsupported_value(column: &str, reason: &str) -> ExError {
    ExError::from(RowbindError::UnsupportedValue {
        column: column.to_string(),
        reason: reason.to_string(),
    })
    .with_op("sqlite")
}
