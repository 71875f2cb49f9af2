//! Rendered SQL statements and their bound parameters
//!
//! Values never appear in SQL text. Identifiers (tables, columns) cannot be
//! bound, so they are checked against a strict identifier grammar before
//! being written into SQL.

use crate::errors::{Result, RowbindError};
use crate::model::Value;

/// Parameters bound to one statement
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Params {
    #[default]
    None,
    /// Bound to `?` placeholders in order
    Positional(Vec<Value>),
    /// Bound to `:name` placeholders; names are stored without the colon
    Named(Vec<(String, Value)>),
}

impl Params {
    pub fn len(&self) -> usize {
        match self {
            Params::None => 0,
            Params::Positional(values) => values.len(),
            Params::Named(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bound values in binding order
    pub fn values(&self) -> Vec<&Value> {
        match self {
            Params::None => Vec::new(),
            Params::Positional(values) => values.iter().collect(),
            Params::Named(pairs) => pairs.iter().map(|(_, v)| v).collect(),
        }
    }
}

/// SQL text plus the parameters to bind to it
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Params,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Params) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

fn is_plain_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Check a name usable as a named placeholder: `[A-Za-z_][A-Za-z0-9_]*`
pub fn ensure_column_name(name: &str) -> Result<()> {
    if is_plain_identifier(name) {
        Ok(())
    } else {
        Err(RowbindError::InvalidIdentifier {
            identifier: name.to_string(),
        }
        .into())
    }
}

/// Check a possibly qualified identifier such as `users.status`
pub fn ensure_identifier(name: &str) -> Result<()> {
    if !name.is_empty() && name.split('.').all(is_plain_identifier) {
        Ok(())
    } else {
        Err(RowbindError::InvalidIdentifier {
            identifier: name.to_string(),
        }
        .into())
    }
}
