//! Read operations: get, find, all
//!
//! Rows are materialized through `Record::from_row`; the `_as` variants
//! hand each record to `Model::from_record`.

use super::{instrumented, Outcome};
use rowbind_core::errors::{ExError, Result};
use rowbind_core::{ConnectionGateway, EntityType, Model, QueryBuilder, Record, Value};
use std::sync::Arc;

/// Run a configured builder and materialize every row
///
/// # Errors
///
/// Any error deferred by the builder (`InvalidArgument`), or
/// `StorageFailure` from the gateway.
pub fn get<G: ConnectionGateway + ?Sized>(builder: QueryBuilder, gateway: &G) -> Result<Vec<Record>> {
    let entity_type = Arc::clone(builder.entity_type());
    instrumented(
        "get",
        entity_type.table_name(),
        Outcome::Rows,
        |records: &Vec<Record>| records.len() as u64,
        || fetch(&builder, &entity_type, gateway),
    )
}

/// [`get`] materialized as `M`
///
/// # Errors
///
/// See [`get`].
pub fn get_as<M: Model, G: ConnectionGateway + ?Sized>(
    builder: QueryBuilder,
    gateway: &G,
) -> Result<Vec<M>> {
    Ok(get(builder, gateway)?.into_iter().map(M::from_record).collect())
}

/// Row with the given primary key, or `None`
///
/// Soft-deleted rows are not found. "No row" is never an error.
///
/// # Errors
///
/// `StorageFailure` from the gateway.
pub fn find<G: ConnectionGateway + ?Sized>(
    entity_type: &Arc<EntityType>,
    id: impl Into<Value>,
    gateway: &G,
) -> Result<Option<Record>> {
    let builder = QueryBuilder::new(Arc::clone(entity_type)).by_primary_key(id);
    instrumented(
        "find",
        entity_type.table_name(),
        Outcome::Rows,
        |found: &Option<Record>| u64::from(found.is_some()),
        || Ok(fetch(&builder, entity_type, gateway)?.into_iter().next()),
    )
}

/// [`find`] materialized as `M`
///
/// # Errors
///
/// See [`find`].
pub fn find_as<M: Model, G: ConnectionGateway + ?Sized>(
    id: impl Into<Value>,
    gateway: &G,
) -> Result<Option<M>> {
    Ok(find(&M::entity_type(), id, gateway)?.map(M::from_record))
}

/// [`find`] for callers that require the row to exist
///
/// # Errors
///
/// `NotFound` when no live row has the key; otherwise as [`find`].
pub fn find_or_fail<G: ConnectionGateway + ?Sized>(
    entity_type: &Arc<EntityType>,
    id: impl Into<Value>,
    gateway: &G,
) -> Result<Record> {
    let id = id.into();
    find(entity_type, &id, gateway)?
        .ok_or_else(|| ExError::not_found(entity_type.table_name(), &id).with_op("find"))
}

/// Every live row of the type
///
/// # Errors
///
/// `StorageFailure` from the gateway.
pub fn all<G: ConnectionGateway + ?Sized>(
    entity_type: &Arc<EntityType>,
    gateway: &G,
) -> Result<Vec<Record>> {
    let builder = QueryBuilder::new(Arc::clone(entity_type));
    instrumented(
        "all",
        entity_type.table_name(),
        Outcome::Rows,
        |records: &Vec<Record>| records.len() as u64,
        || fetch(&builder, entity_type, gateway),
    )
}

/// [`all`] materialized as `M`
///
/// # Errors
///
/// See [`all`].
pub fn all_as<M: Model, G: ConnectionGateway + ?Sized>(gateway: &G) -> Result<Vec<M>> {
    Ok(all(&M::entity_type(), gateway)?
        .into_iter()
        .map(M::from_record)
        .collect())
}

fn fetch<G: ConnectionGateway + ?Sized>(
    builder: &QueryBuilder,
    entity_type: &Arc<EntityType>,
    gateway: &G,
) -> Result<Vec<Record>> {
    let statement = builder.render()?;
    let rows = gateway.query(&statement)?;
    Ok(rows
        .into_iter()
        .map(|row| Record::from_row(Arc::clone(entity_type), row))
        .collect())
}
