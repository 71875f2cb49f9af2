//! SQLite implementation of `ConnectionGateway`
//!
//! One `rusqlite::Connection` behind a `parking_lot::Mutex`. Each call holds
//! the lock for exactly one statement: prepare, bind, run, and for queries
//! drain every row before the guard drops.

use crate::convert::{from_value_ref, SqlParam};
use crate::db::{self, StoreConfig};
use crate::errors::{from_rusqlite, Result};
use parking_lot::Mutex;
use rowbind_core::{ConnectionGateway, InsertOutcome, Params, Row, Statement, Value};
use rowbind_core_types::Sensitive;
use rusqlite::Connection;
use std::path::Path;

pub struct SqliteGateway {
    conn: Mutex<Connection>,
}

impl SqliteGateway {
    /// Open and configure a file-backed database
    ///
    /// # Errors
    ///
    /// `StorageFailure` if the file cannot be opened or configured.
    pub fn open<P: AsRef<Path>>(path: P, config: &StoreConfig) -> Result<Self> {
        let conn = db::open(path)?;
        db::configure(&conn, config)?;
        Ok(Self::from_connection(conn))
    }

    /// Open a private in-memory database with the default configuration
    ///
    /// # Errors
    ///
    /// `StorageFailure` if SQLite cannot allocate or configure it.
    pub fn open_in_memory() -> Result<Self> {
        let conn = db::open_in_memory()?;
        db::configure(&conn, &StoreConfig::default())?;
        Ok(Self::from_connection(conn))
    }

    /// Wrap an already configured connection
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Run raw SQL with no parameters, e.g. schema DDL
    ///
    /// # Errors
    ///
    /// `StorageFailure` if any statement in the batch fails.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        tracing::debug!(sql = %sql, "sqlite batch");
        self.conn.lock().execute_batch(sql).map_err(from_rusqlite)
    }

    pub fn into_inner(self) -> Connection {
        self.conn.into_inner()
    }
}

impl ConnectionGateway for SqliteGateway {
    fn execute(&self, statement: &Statement) -> Result<u64> {
        trace_statement(statement);
        let conn = self.conn.lock();
        let affected = run(&conn, statement)?;
        tracing::debug!(affected, "sqlite execute done");
        Ok(affected)
    }

    /// INSERT and read its rowid under one lock acquisition
    ///
    /// An insert that changed no row reports no key, since
    /// `last_insert_rowid` would still hold an earlier statement's value.
    fn insert(&self, statement: &Statement) -> Result<InsertOutcome> {
        trace_statement(statement);
        let conn = self.conn.lock();
        let affected = run(&conn, statement)?;
        let generated_key = if affected > 0 {
            Some(conn.last_insert_rowid())
                .filter(|rowid| *rowid != 0)
                .map(Value::Integer)
        } else {
            None
        };
        tracing::debug!(affected, generated_key = ?generated_key, "sqlite insert done");
        Ok(InsertOutcome {
            affected,
            generated_key,
        })
    }

    fn query(&self, statement: &Statement) -> Result<Vec<Row>> {
        trace_statement(statement);
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&statement.sql).map_err(from_rusqlite)?;
        bind(&mut stmt, &statement.params)?;

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt.raw_query();
        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(from_rusqlite)? {
            let mut materialized = Row::new();
            for (idx, column) in columns.iter().enumerate() {
                let cell = row.get_ref(idx).map_err(from_rusqlite)?;
                materialized.push(column.as_str(), from_value_ref(column, cell)?);
            }
            out.push(materialized);
        }
        tracing::debug!(row_count = out.len(), "sqlite query done");
        Ok(out)
    }
}

fn run(conn: &Connection, statement: &Statement) -> Result<u64> {
    let mut stmt = conn.prepare(&statement.sql).map_err(from_rusqlite)?;
    bind(&mut stmt, &statement.params)?;
    let affected = stmt.raw_execute().map_err(from_rusqlite)?;
    Ok(affected as u64)
}

fn trace_statement(statement: &Statement) {
    tracing::debug!(
        sql = %statement.sql,
        param_count = statement.params.len(),
        params = ?Sensitive::new(&statement.params),
        "sqlite statement"
    );
}

fn bind(stmt: &mut rusqlite::Statement<'_>, params: &Params) -> Result<()> {
    match params {
        Params::None => {}
        Params::Positional(values) => {
            for (idx, value) in values.iter().enumerate() {
                stmt.raw_bind_parameter(idx + 1, SqlParam(value))
                    .map_err(from_rusqlite)?;
            }
        }
        Params::Named(pairs) => {
            for (name, value) in pairs {
                let placeholder = format!(":{}", name);
                let idx = stmt
                    .parameter_index(&placeholder)
                    .map_err(from_rusqlite)?
                    .ok_or_else(|| from_rusqlite(rusqlite::Error::InvalidParameterName(placeholder)))?;
                stmt.raw_bind_parameter(idx, SqlParam(value))
                    .map_err(from_rusqlite)?;
            }
        }
    }
    Ok(())
}
