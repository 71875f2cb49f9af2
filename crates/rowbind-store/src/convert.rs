//! `Value` <-> SQLite conversions
//!
//! | Value       | SQLite                               |
//! |-------------|--------------------------------------|
//! | `Null`      | NULL                                 |
//! | `Integer`   | INTEGER                              |
//! | `Real`      | REAL                                 |
//! | `Text`      | TEXT                                 |
//! | `Boolean`   | INTEGER 0 / 1                        |
//! | `Timestamp` | TEXT `YYYY-MM-DD HH:MM:SS.ffffff` UTC |
//!
//! Reading is the plain inverse per storage class; BLOBs are rejected.

use crate::errors::{unsupported_value, Result};
use rowbind_core::model::value::format_timestamp;
use rowbind_core::Value;
use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};

/// Borrowing adapter that binds a `Value` as a statement parameter
pub struct SqlParam<'a>(pub &'a Value);

impl ToSql for SqlParam<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let out = match self.0 {
            Value::Null => ToSqlOutput::Owned(rusqlite::types::Value::Null),
            Value::Integer(i) => ToSqlOutput::Owned(rusqlite::types::Value::Integer(*i)),
            Value::Real(r) => ToSqlOutput::Owned(rusqlite::types::Value::Real(*r)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Boolean(b) => ToSqlOutput::Owned(rusqlite::types::Value::Integer(i64::from(*b))),
            Value::Timestamp(ts) => {
                ToSqlOutput::Owned(rusqlite::types::Value::Text(format_timestamp(ts)))
            }
        };
        Ok(out)
    }
}

/// Convert one result cell
///
/// # Errors
///
/// `StorageFailure` for BLOB cells and TEXT that is not UTF-8.
pub fn from_value_ref(column: &str, value: ValueRef<'_>) -> Result<Value> {
    match value {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::Integer(i) => Ok(Value::Integer(i)),
        ValueRef::Real(r) => Ok(Value::Real(r)),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map(|s| Value::Text(s.to_string()))
            .map_err(|_| unsupported_value(column, "TEXT is not valid UTF-8")),
        ValueRef::Blob(_) => Err(unsupported_value(column, "BLOB columns are not supported")),
    }
}
