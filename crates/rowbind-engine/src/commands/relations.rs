//! Relation lookups: has_one, has_many, belongs_to
//!
//! All three issue `SELECT * FROM <target> WHERE <foreign_key> = ?` bound
//! to the source's `local_key`. A source without a value there yields an
//! empty result without a query. Soft-deleted targets are returned as-is.

use super::{instrumented, Outcome};
use rowbind_core::errors::Result;
use rowbind_core::{ConnectionGateway, EntityType, Model, Record, RelationDescriptor};
use std::sync::Arc;

/// Related records for an arbitrary descriptor
///
/// Single-valued kinds are truncated to their first row.
///
/// # Errors
///
/// `InvalidArgument` for a malformed target table or foreign key;
/// `StorageFailure` from the gateway.
pub fn resolve<G: ConnectionGateway + ?Sized>(
    source: &Record,
    relation: &RelationDescriptor,
    gateway: &G,
) -> Result<Vec<Record>> {
    let target = relation.target();
    instrumented(
        "resolve_relation",
        target.table_name(),
        Outcome::Rows,
        |records: &Vec<Record>| records.len() as u64,
        || {
            let Some(statement) = relation.lookup(source)? else {
                tracing::debug!(
                    local_key = relation.local_key(),
                    "relation key unset, skipping lookup"
                );
                return Ok(Vec::new());
            };
            let rows = gateway.query(&statement)?;
            let take = if relation.returns_many() { rows.len() } else { 1 };
            Ok(rows
                .into_iter()
                .take(take)
                .map(|row| Record::from_row(Arc::clone(target), row))
                .collect())
        },
    )
}

/// First target row whose `foreign_key` matches the source's `local_key`
///
/// # Errors
///
/// See [`resolve`].
pub fn has_one<G: ConnectionGateway + ?Sized>(
    source: &Record,
    target: &Arc<EntityType>,
    foreign_key: &str,
    local_key: &str,
    gateway: &G,
) -> Result<Option<Record>> {
    let relation = RelationDescriptor::has_one(Arc::clone(target), foreign_key, local_key);
    Ok(resolve(source, &relation, gateway)?.into_iter().next())
}

/// Every target row whose `foreign_key` matches the source's `local_key`
///
/// # Errors
///
/// See [`resolve`].
pub fn has_many<G: ConnectionGateway + ?Sized>(
    source: &Record,
    target: &Arc<EntityType>,
    foreign_key: &str,
    local_key: &str,
    gateway: &G,
) -> Result<Vec<Record>> {
    let relation = RelationDescriptor::has_many(Arc::clone(target), foreign_key, local_key);
    resolve(source, &relation, gateway)
}

/// Owning target row
///
/// `foreign_key` names the target column (usually its primary key) and
/// `local_key` the source column that references it.
///
/// # Errors
///
/// See [`resolve`].
pub fn belongs_to<G: ConnectionGateway + ?Sized>(
    source: &Record,
    target: &Arc<EntityType>,
    foreign_key: &str,
    local_key: &str,
    gateway: &G,
) -> Result<Option<Record>> {
    let relation = RelationDescriptor::belongs_to(Arc::clone(target), foreign_key, local_key);
    Ok(resolve(source, &relation, gateway)?.into_iter().next())
}

/// [`has_one`] materialized as `M`
///
/// # Errors
///
/// See [`resolve`].
pub fn has_one_as<M: Model, G: ConnectionGateway + ?Sized>(
    source: &Record,
    foreign_key: &str,
    local_key: &str,
    gateway: &G,
) -> Result<Option<M>> {
    Ok(has_one(source, &M::entity_type(), foreign_key, local_key, gateway)?.map(M::from_record))
}

/// [`has_many`] materialized as `M`
///
/// # Errors
///
/// See [`resolve`].
pub fn has_many_as<M: Model, G: ConnectionGateway + ?Sized>(
    source: &Record,
    foreign_key: &str,
    local_key: &str,
    gateway: &G,
) -> Result<Vec<M>> {
    Ok(
        has_many(source, &M::entity_type(), foreign_key, local_key, gateway)?
            .into_iter()
            .map(M::from_record)
            .collect(),
    )
}

/// [`belongs_to`] materialized as `M`
///
/// # Errors
///
/// See [`resolve`].
pub fn belongs_to_as<M: Model, G: ConnectionGateway + ?Sized>(
    source: &Record,
    foreign_key: &str,
    local_key: &str,
    gateway: &G,
) -> Result<Option<M>> {
    Ok(belongs_to(source, &M::entity_type(), foreign_key, local_key, gateway)?.map(M::from_record))
}
