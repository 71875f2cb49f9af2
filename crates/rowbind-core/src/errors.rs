use rowbind_core_types::RequestId;
use std::sync::Arc;
use thiserror::Error;

/// Result type alias using the canonical structured error
pub type Result<T> = std::result::Result<T, ExError>;

/// Backend error carried verbatim inside a storage failure
pub type BackendError = Arc<dyn std::error::Error + Send + Sync + 'static>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers and tests can match
/// on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    /// A lookup that the caller required to succeed found no row
    NotFound,
    /// Negative limit/offset, unknown operator, unsafe identifier, missing key
    InvalidArgument,
    /// Constraint violation, connectivity loss, malformed SQL
    StorageFailure,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::InvalidArgument => "ERR_INVALID_ARGUMENT",
            ExErrorKind::StorageFailure => "ERR_STORAGE_FAILURE",
        }
    }
}

/// Canonical structured error type
///
/// Carries a kind for programmatic handling plus the operation, table and
/// request it happened in. Storage failures keep the backend error as
/// their `source()` without reinterpreting it.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    table: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    backend: Option<BackendError>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            table: None,
            request_id: None,
            message: String::new(),
            backend: None,
        }
    }

    /// Storage failure wrapping a backend error
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let message = err.to_string();
        Self::new(ExErrorKind::StorageFailure)
            .with_message(message)
            .with_backend(Arc::new(err))
    }

    /// Not-found error for callers that require a row to exist
    pub fn not_found(table: impl Into<String>, id: impl std::fmt::Display) -> Self {
        RowbindError::RecordNotFound {
            table: table.into(),
            id: id.to_string(),
        }
        .into()
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add table context
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach the underlying backend error
    pub fn with_backend(mut self, backend: BackendError) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the backend error, if this is a storage failure that carries one
    pub fn backend(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.backend.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(table) = &self.table {
            write!(f, " (table: {})", table)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.backend
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Precise failure reasons raised by the mapping and rendering kernel
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowbindError {
    #[error("Limit must be non-negative, got {value}")]
    NegativeLimit { value: i64 },

    #[error("Offset must be non-negative, got {value}")]
    NegativeOffset { value: i64 },

    #[error("Unknown comparison operator: {op}")]
    UnknownOperator { op: String },

    /// Table or column name that is not a plain (optionally dotted) identifier
    #[error("Invalid SQL identifier: {identifier:?}")]
    InvalidIdentifier { identifier: String },

    #[error("Record of table {table} has no value for primary key {primary_key}")]
    MissingPrimaryKey { table: String, primary_key: String },

    #[error("Cannot insert into {table}: no attributes set")]
    EmptyAttributes { table: String },

    #[error("Column {column} holds an unsupported value: {reason}")]
    UnsupportedValue { column: String, reason: String },

    #[error("No row in {table} with primary key {id}")]
    RecordNotFound { table: String, id: String },
}

impl From<RowbindError> for ExError {
    fn from(err: RowbindError) -> Self {
        let message = err.to_string();
        match err {
            RowbindError::NegativeLimit { .. } => ExError::new(ExErrorKind::InvalidArgument)
                .with_op("limit")
                .with_message(message),

            RowbindError::NegativeOffset { .. } => ExError::new(ExErrorKind::InvalidArgument)
                .with_op("offset")
                .with_message(message),

            RowbindError::UnknownOperator { .. } | RowbindError::InvalidIdentifier { .. } => {
                ExError::new(ExErrorKind::InvalidArgument).with_message(message)
            }

            RowbindError::MissingPrimaryKey { table, .. }
            | RowbindError::EmptyAttributes { table } => {
                ExError::new(ExErrorKind::InvalidArgument)
                    .with_table(table)
                    .with_message(message)
            }

            RowbindError::UnsupportedValue { .. } => {
                ExError::new(ExErrorKind::StorageFailure).with_message(message)
            }

            RowbindError::RecordNotFound { table, .. } => ExError::new(ExErrorKind::NotFound)
                .with_table(table)
                .with_message(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_negative_limit_is_invalid_argument() {
        let err: ExError = RowbindError::NegativeLimit { value: -1 }.into();
        assert_eq!(err.kind(), ExErrorKind::InvalidArgument);
        assert_eq!(err.code(), "ERR_INVALID_ARGUMENT");
        assert_eq!(err.op(), Some("limit"));
        assert!(err.message().contains("-1"));
    }

    #[test]
    fn test_missing_primary_key_carries_table() {
        let err: ExError = RowbindError::MissingPrimaryKey {
            table: "users".to_string(),
            primary_key: "id".to_string(),
        }
        .into();
        assert_eq!(err.table(), Some("users"));
    }

    #[test]
    fn test_storage_failure_keeps_backend_source() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "connection lost");
        let err = ExError::storage(io).with_op("execute");

        assert_eq!(err.kind(), ExErrorKind::StorageFailure);
        assert_eq!(err.message(), "connection lost");
        let source = err.source().expect("backend source");
        assert_eq!(source.to_string(), "connection lost");
    }

    #[test]
    fn test_display_includes_code_op_and_table() {
        let err = ExError::not_found("users", 7).with_op("find");
        let text = err.to_string();
        assert!(text.starts_with("[ERR_NOT_FOUND] in operation 'find'"));
        assert!(text.contains("(table: users)"));
    }

    #[test]
    fn test_error_kind_codes_are_unique() {
        let kinds = [
            ExErrorKind::NotFound,
            ExErrorKind::InvalidArgument,
            ExErrorKind::StorageFailure,
        ];
        let mut codes: Vec<_> = kinds.iter().map(|k| k.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }
}
