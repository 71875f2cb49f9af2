//! Canonical schema constants for structured logging
//!
//! These constants keep field names identical across the engine's boundary
//! logs, the store's debug logs and the error facility.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Statement fields
pub const FIELD_TABLE: &str = "table";
pub const FIELD_SQL: &str = "sql";
pub const FIELD_PARAM_COUNT: &str = "param_count";
pub const FIELD_ROW_COUNT: &str = "row_count";
pub const FIELD_AFFECTED: &str = "affected";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
