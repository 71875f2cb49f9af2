//! INSERT / UPDATE / DELETE rendering and write staging
//!
//! A write is staged before it runs: timestamps and `deleted_at` are applied
//! to a copy of the record's attributes, the statement is rendered from the
//! copy, and [`StagedWrite::commit`] swaps the copy into the record only
//! after the gateway reported success. A failed write therefore leaves the
//! record untouched.
//!
//! Statement shapes:
//!
//! ```text
//! INSERT INTO <table> (<c1>, <c2>) VALUES (:<c1>, :<c2>)
//! UPDATE <table> SET <c1> = :<c1>, <c2> = :<c2> WHERE <pk> = :<pk>
//! DELETE FROM <table> WHERE <pk> = ?
//! ```

use crate::errors::{Result, RowbindError};
use crate::model::{AttributeStore, Record, Value};
use crate::schema::{EntityType, CREATED_AT, DELETED_AT, UPDATED_AT};
use crate::statement::{ensure_column_name, ensure_identifier, Params, Statement};
use chrono::{DateTime, Duration, Utc};

/// Source of "now" for timestamp columns
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// What a staged write will do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Insert,
    Update,
    Delete,
}

/// A rendered write waiting for execution
#[derive(Debug, Clone)]
#[must_use = "a staged write must be executed and committed"]
pub struct StagedWrite {
    kind: WriteKind,
    statement: Statement,
    attributes: Option<AttributeStore>,
}

impl StagedWrite {
    pub fn kind(&self) -> WriteKind {
        self.kind
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    /// Apply staged attribute changes to the record after a successful run
    pub fn commit(self, record: &mut Record) {
        if let Some(attributes) = self.attributes {
            record.replace_attributes(attributes);
        }
    }
}

/// Render `INSERT INTO ... VALUES (:c, ...)` over every set attribute
///
/// # Errors
///
/// `InvalidArgument` when no attribute is set or a column is not a plain
/// identifier.
pub fn render_insert(entity_type: &EntityType, attributes: &AttributeStore) -> Result<Statement> {
    let table = entity_type.table_name();
    ensure_identifier(table)?;
    if attributes.is_empty() {
        return Err(RowbindError::EmptyAttributes {
            table: table.to_string(),
        }
        .into());
    }

    let named = named_params(attributes)?;
    let columns: Vec<&str> = named.iter().map(|(c, _)| c.as_str()).collect();
    let placeholders: Vec<String> = columns.iter().map(|c| format!(":{}", c)).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders.join(", ")
    );
    Ok(Statement::new(sql, Params::Named(named)))
}

/// Render `UPDATE ... SET c = :c, ... WHERE pk = :pk` over every set attribute
///
/// The primary key is part of the SET list as a no-op assignment.
///
/// # Errors
///
/// `InvalidArgument` when the primary key has no value or a column is not a
/// plain identifier.
pub fn render_update(entity_type: &EntityType, attributes: &AttributeStore) -> Result<Statement> {
    let table = entity_type.table_name();
    let primary_key = entity_type.primary_key();
    ensure_identifier(table)?;
    ensure_column_name(primary_key)?;
    if !attributes.has_value(primary_key) {
        return Err(missing_primary_key(entity_type));
    }

    let named = named_params(attributes)?;
    let assignments: Vec<String> = named
        .iter()
        .map(|(c, _)| format!("{} = :{}", c, c))
        .collect();
    let sql = format!(
        "UPDATE {} SET {} WHERE {} = :{}",
        table,
        assignments.join(", "),
        primary_key,
        primary_key
    );
    Ok(Statement::new(sql, Params::Named(named)))
}

/// Render `DELETE FROM ... WHERE pk = ?`
///
/// # Errors
///
/// `InvalidArgument` when the primary key value is NULL.
pub fn render_delete(entity_type: &EntityType, primary_key_value: &Value) -> Result<Statement> {
    let table = entity_type.table_name();
    let primary_key = entity_type.primary_key();
    ensure_identifier(table)?;
    ensure_column_name(primary_key)?;
    if primary_key_value.is_null() {
        return Err(missing_primary_key(entity_type));
    }
    let sql = format!("DELETE FROM {} WHERE {} = ?", table, primary_key);
    Ok(Statement::new(
        sql,
        Params::Positional(vec![primary_key_value.clone()]),
    ))
}

/// Stage `save`: stamp timestamps, then insert when transient, else update
///
/// With timestamps enabled `updated_at` is always set and `created_at` only
/// on a transient record. `updated_at` strictly increases per record: a
/// clock reading at or before the current value is moved one microsecond
/// past it.
///
/// # Errors
///
/// Rendering errors from [`render_insert`] / [`render_update`].
pub fn stage_save(record: &Record, clock: &dyn Clock) -> Result<StagedWrite> {
    stage_save_attributes(record.entity_type(), record.attributes().clone(), clock)
}

/// Stage an INSERT over the record's current attributes, no stamping
///
/// # Errors
///
/// See [`render_insert`].
pub fn stage_create(record: &Record) -> Result<StagedWrite> {
    let statement = render_insert(record.entity_type(), record.attributes())?;
    Ok(StagedWrite {
        kind: WriteKind::Insert,
        statement,
        attributes: None,
    })
}

/// Stage an UPDATE over the record's current attributes, no stamping
///
/// # Errors
///
/// See [`render_update`].
pub fn stage_update(record: &Record) -> Result<StagedWrite> {
    let statement = render_update(record.entity_type(), record.attributes())?;
    Ok(StagedWrite {
        kind: WriteKind::Update,
        statement,
        attributes: None,
    })
}

/// Stage `delete`
///
/// Soft-deleting types set `deleted_at` and go through the save path, so a
/// transient record becomes an insert that is already marked deleted. Other
/// types render a hard DELETE keyed by the stored primary key.
///
/// # Errors
///
/// `InvalidArgument` for a hard delete of a transient record.
pub fn stage_delete(record: &Record, clock: &dyn Clock) -> Result<StagedWrite> {
    let entity_type = record.entity_type();
    if entity_type.soft_deletes() {
        let mut attributes = record.attributes().clone();
        attributes.set(DELETED_AT, Value::Timestamp(clock.now()));
        return stage_save_attributes(entity_type, attributes, clock);
    }

    let primary_key_value = record
        .primary_key_value()
        .ok_or_else(|| missing_primary_key(entity_type))?;
    let statement = render_delete(entity_type, primary_key_value)?;
    Ok(StagedWrite {
        kind: WriteKind::Delete,
        statement,
        attributes: None,
    })
}

fn stage_save_attributes(
    entity_type: &EntityType,
    mut attributes: AttributeStore,
    clock: &dyn Clock,
) -> Result<StagedWrite> {
    let transient = !attributes.has_value(entity_type.primary_key());

    if entity_type.has_timestamps() {
        let now = clock.now();
        let stamp = next_stamp(attributes.get(UPDATED_AT), now);
        attributes.set(UPDATED_AT, Value::Timestamp(stamp));
        if transient {
            attributes.set(CREATED_AT, Value::Timestamp(now));
        }
    }

    let (kind, statement) = if transient {
        (WriteKind::Insert, render_insert(entity_type, &attributes)?)
    } else {
        (WriteKind::Update, render_update(entity_type, &attributes)?)
    };
    Ok(StagedWrite {
        kind,
        statement,
        attributes: Some(attributes),
    })
}

fn next_stamp(previous: Option<&Value>, now: DateTime<Utc>) -> DateTime<Utc> {
    match previous.and_then(Value::as_timestamp) {
        Some(prev) if prev >= now => prev + Duration::microseconds(1),
        _ => now,
    }
}

fn named_params(attributes: &AttributeStore) -> Result<Vec<(String, Value)>> {
    attributes
        .all_columns()
        .map(|(column, value)| {
            ensure_column_name(column)?;
            Ok((column.to_string(), value.clone()))
        })
        .collect()
}

fn missing_primary_key(entity_type: &EntityType) -> crate::errors::ExError {
    RowbindError::MissingPrimaryKey {
        table: entity_type.table_name().to_string(),
        primary_key: entity_type.primary_key().to_string(),
    }
    .into()
}
