//! Connection gateway contract
//!
//! The kernel never talks to a database. Everything it renders is handed to
//! a [`ConnectionGateway`], which owns the connection lifecycle and returns
//! rows or affected-row counts.

use crate::errors::Result;
use crate::model::Value;
use crate::statement::Statement;

/// One result row: column names and raw values in result-set order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.push((column.into(), value.into()));
    }

    /// First value under `column`
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(c, v)| (c.as_str(), v))
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

impl<C: Into<String>, V: Into<Value>> FromIterator<(C, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (C, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (c, v) in iter {
            row.push(c, v);
        }
        row
    }
}

/// What one INSERT did: rows affected and the key that statement generated
///
/// `generated_key` is read in the same backend call as the INSERT, so it
/// never reflects another statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertOutcome {
    pub affected: u64,
    pub generated_key: Option<Value>,
}

/// Executes rendered statements against a backing store
///
/// Implementations must bind `statement.params` and never splice values
/// into the SQL text. Each call is one logical operation: a pooled
/// implementation acquires a connection for the call and releases it on
/// every exit path. Backend failures are reported as
/// [`ExErrorKind::StorageFailure`](crate::errors::ExErrorKind) with the
/// backend error attached.
pub trait ConnectionGateway {
    /// Run a mutating statement, returning the affected-row count
    fn execute(&self, statement: &Statement) -> Result<u64>;

    /// Run a SELECT, returning every row
    fn query(&self, statement: &Statement) -> Result<Vec<Row>>;

    /// Run an INSERT, reporting the key it generated if the backend tracks
    /// one
    ///
    /// The key must come from this statement alone, captured while the
    /// connection is still held for it. Backends without generated keys
    /// keep the default, which reports none.
    fn insert(&self, statement: &Statement) -> Result<InsertOutcome> {
        Ok(InsertOutcome {
            affected: self.execute(statement)?,
            generated_key: None,
        })
    }
}

impl<G: ConnectionGateway + ?Sized> ConnectionGateway for &G {
    fn execute(&self, statement: &Statement) -> Result<u64> {
        (**self).execute(statement)
    }

    fn query(&self, statement: &Statement) -> Result<Vec<Row>> {
        (**self).query(statement)
    }

    fn insert(&self, statement: &Statement) -> Result<InsertOutcome> {
        (**self).insert(statement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_get_returns_first_duplicate() {
        let row: Row = [("id", 1), ("name", 2), ("id", 9)].into_iter().collect();
        assert_eq!(row.get("id"), Some(&Value::Integer(1)));
        assert_eq!(row.len(), 3);
    }

    struct Counting;

    impl ConnectionGateway for Counting {
        fn execute(&self, _statement: &Statement) -> Result<u64> {
            Ok(1)
        }

        fn query(&self, _statement: &Statement) -> Result<Vec<Row>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_default_insert_reports_no_key() {
        let outcome = Counting
            .insert(&Statement::new("INSERT INTO t (a) VALUES (:a)", crate::Params::None))
            .unwrap();
        assert_eq!(outcome.affected, 1);
        assert!(outcome.generated_key.is_none());
    }
}
