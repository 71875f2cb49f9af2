//! Write operations: save, create, update, delete
//!
//! Each operation stages its statement in core, runs it through the
//! gateway, and only then commits staged attribute changes to the record.
//! A failing gateway leaves the record exactly as it was.

use super::{instrumented, Outcome};
use rowbind_core::errors::Result;
use rowbind_core::persistence::{self, StagedWrite, WriteKind};
use rowbind_core::{Clock, ConnectionGateway, Record, SystemClock, Value};

/// What a write did: rows affected and, for an INSERT, the key that very
/// statement generated
///
/// Pass it to [`adopt_generated_key`] to copy the key onto the record that
/// was written.
#[derive(Debug, PartialEq)]
#[must_use]
pub struct WriteOutcome {
    table: String,
    affected: u64,
    generated_key: Option<Value>,
}

impl WriteOutcome {
    /// Table the statement wrote to
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn affected(&self) -> u64 {
        self.affected
    }

    pub fn generated_key(&self) -> Option<&Value> {
        self.generated_key.as_ref()
    }
}

/// Insert a transient record or update a persisted one
///
/// With timestamps enabled, `updated_at` is stamped on every call and
/// `created_at` on inserts. The generated key of an insert is not copied
/// back; use [`save_reporting_key`] and [`adopt_generated_key`] for that.
///
/// ## Returns
///
/// Rows affected, as reported by the gateway
///
/// ## Errors
///
/// - `InvalidArgument`: nothing to insert, or a column is not a plain identifier
/// - `StorageFailure`: the gateway failed
pub fn save<G: ConnectionGateway + ?Sized>(record: &mut Record, gateway: &G) -> Result<u64> {
    save_with_clock(record, gateway, &SystemClock)
}

/// [`save`] with an explicit time source
///
/// # Errors
///
/// See [`save`].
pub fn save_with_clock<G: ConnectionGateway + ?Sized>(
    record: &mut Record,
    gateway: &G,
    clock: &dyn Clock,
) -> Result<u64> {
    Ok(save_reporting_key_with_clock(record, gateway, clock)?.affected)
}

/// [`save`], also reporting the key the INSERT generated
///
/// An UPDATE reports no key.
///
/// # Errors
///
/// See [`save`].
pub fn save_reporting_key<G: ConnectionGateway + ?Sized>(
    record: &mut Record,
    gateway: &G,
) -> Result<WriteOutcome> {
    save_reporting_key_with_clock(record, gateway, &SystemClock)
}

/// [`save_reporting_key`] with an explicit time source
///
/// # Errors
///
/// See [`save`].
pub fn save_reporting_key_with_clock<G: ConnectionGateway + ?Sized>(
    record: &mut Record,
    gateway: &G,
    clock: &dyn Clock,
) -> Result<WriteOutcome> {
    let table = record.table_name().to_string();
    instrumented(
        "save",
        &table,
        Outcome::Affected,
        |o: &WriteOutcome| o.affected,
        || {
            let staged = persistence::stage_save(record, clock)?;
            run_staged(staged, record, gateway)
        },
    )
}

/// INSERT the record's attributes as they are, without stamping
///
/// # Errors
///
/// `InvalidArgument` when no attribute is set; `StorageFailure` from the
/// gateway.
pub fn create<G: ConnectionGateway + ?Sized>(record: &mut Record, gateway: &G) -> Result<u64> {
    Ok(create_reporting_key(record, gateway)?.affected)
}

/// [`create`], also reporting the key the INSERT generated
///
/// # Errors
///
/// See [`create`].
pub fn create_reporting_key<G: ConnectionGateway + ?Sized>(
    record: &mut Record,
    gateway: &G,
) -> Result<WriteOutcome> {
    let table = record.table_name().to_string();
    instrumented(
        "create",
        &table,
        Outcome::Affected,
        |o: &WriteOutcome| o.affected,
        || {
            let staged = persistence::stage_create(record)?;
            run_staged(staged, record, gateway)
        },
    )
}

/// UPDATE the row keyed by the record's primary key, without stamping
///
/// Zero affected rows is not an error.
///
/// # Errors
///
/// `InvalidArgument` when the record is transient; `StorageFailure` from
/// the gateway.
pub fn update<G: ConnectionGateway + ?Sized>(record: &mut Record, gateway: &G) -> Result<u64> {
    let table = record.table_name().to_string();
    instrumented("update", &table, Outcome::Affected, |n: &u64| *n, || {
        let staged = persistence::stage_update(record)?;
        Ok(run_staged(staged, record, gateway)?.affected)
    })
}

/// Soft delete (set `deleted_at`, then save) or hard DELETE by primary key
///
/// # Errors
///
/// `InvalidArgument` for a hard delete of a transient record;
/// `StorageFailure` from the gateway.
pub fn delete<G: ConnectionGateway + ?Sized>(record: &mut Record, gateway: &G) -> Result<u64> {
    delete_with_clock(record, gateway, &SystemClock)
}

/// [`delete`] with an explicit time source
///
/// # Errors
///
/// See [`delete`].
pub fn delete_with_clock<G: ConnectionGateway + ?Sized>(
    record: &mut Record,
    gateway: &G,
    clock: &dyn Clock,
) -> Result<u64> {
    let table = record.table_name().to_string();
    instrumented("delete", &table, Outcome::Affected, |n: &u64| *n, || {
        let staged = persistence::stage_delete(record, clock)?;
        Ok(run_staged(staged, record, gateway)?.affected)
    })
}

/// Copy the key generated by `outcome`'s INSERT onto the record it wrote
///
/// Returns whether a key was adopted. Nothing happens when the record
/// already has a primary key, when the outcome belongs to another table,
/// or when the write generated no key (an UPDATE, or a backend that does
/// not track keys).
pub fn adopt_generated_key(record: &mut Record, outcome: WriteOutcome) -> bool {
    if record.has_primary_key() || outcome.table != record.table_name() {
        return false;
    }
    match outcome.generated_key {
        Some(key) if !key.is_null() => {
            tracing::debug!(table = %outcome.table, key = ?key, "adopting generated key");
            let primary_key = record.entity_type().primary_key().to_string();
            record.set(primary_key, key);
            true
        }
        _ => false,
    }
}

fn run_staged<G: ConnectionGateway + ?Sized>(
    staged: StagedWrite,
    record: &mut Record,
    gateway: &G,
) -> Result<WriteOutcome> {
    let (affected, generated_key) = match staged.kind() {
        WriteKind::Insert => {
            let inserted = gateway.insert(staged.statement())?;
            (inserted.affected, inserted.generated_key)
        }
        WriteKind::Update | WriteKind::Delete => (gateway.execute(staged.statement())?, None),
    };
    tracing::debug!(kind = ?staged.kind(), affected, "committing staged write");
    staged.commit(record);
    Ok(WriteOutcome {
        table: record.table_name().to_string(),
        affected,
        generated_key,
    })
}
