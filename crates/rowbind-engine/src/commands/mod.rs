//! Operation handlers with boundary logging.
//!
//! ## Logging Ownership
//!
//! The engine layer owns lifecycle logging for every operation:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (store, core) use only `tracing::debug!()` for internal details.

pub mod persist;
pub mod query;
pub mod relations;

use rowbind_core::errors::Result;
use rowbind_core::types::RequestId;
use rowbind_core::{log_op_end, log_op_error, log_op_start};
use std::time::Instant;

/// What an operation's end event reports
#[derive(Clone, Copy)]
pub(crate) enum Outcome {
    /// Rows changed by a write
    Affected,
    /// Rows returned by a read
    Rows,
}

/// Run `body` as one logged operation against `table`
///
/// Every event and any returned error carry the same fresh `RequestId`.
pub(crate) fn instrumented<T>(
    op: &'static str,
    table: &str,
    outcome: Outcome,
    count: impl FnOnce(&T) -> u64,
    body: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let request_id = RequestId::new();
    log_op_start!(op, table = table, request_id = %request_id);
    let start = Instant::now();

    let result = body().map_err(|e| {
        let mut e = e.with_request_id(request_id.clone());
        if e.op().is_none() {
            e = e.with_op(op);
        }
        if e.table().is_none() {
            e = e.with_table(table);
        }
        log_op_error!(
            op,
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            table = table,
            request_id = %request_id
        );
        e
    })?;

    let duration_ms = start.elapsed().as_millis() as u64;
    let n = count(&result);
    match outcome {
        Outcome::Affected => {
            log_op_end!(
                op,
                duration_ms = duration_ms,
                table = table,
                affected = n,
                request_id = %request_id
            );
        }
        Outcome::Rows => {
            log_op_end!(
                op,
                duration_ms = duration_ms,
                table = table,
                row_count = n,
                request_id = %request_id
            );
        }
    }

    Ok(result)
}
