//! Ordered attribute bag backing one entity instance

use crate::model::value::Value;

/// Column → value mapping that remembers first-set order
///
/// Column order drives the column order of generated INSERT and UPDATE
/// statements, so iteration is always in the order columns were first set.
/// Re-setting a column replaces its value in place. Any column name is
/// accepted; nothing is checked against a live schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeStore {
    entries: Vec<(String, Value)>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, keeping its original position if already present
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.position(&column) {
            Some(idx) => self.entries[idx].1 = value,
            None => self.entries.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.position(column).map(|idx| &self.entries[idx].1)
    }

    /// True when the column is present and not NULL
    pub fn has_value(&self, column: &str) -> bool {
        self.get(column).is_some_and(|v| !v.is_null())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.position(column).is_some()
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.position(column).map(|idx| self.entries.remove(idx).1)
    }

    /// All `(column, value)` pairs in first-set order
    pub fn all_columns(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.entries.iter().position(|(c, _)| c == column)
    }
}

impl<C, V> FromIterator<(C, V)> for AttributeStore
where
    C: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (C, V)>>(iter: I) -> Self {
        let mut store = AttributeStore::new();
        for (column, value) in iter {
            store.set(column, value);
        }
        store
    }
}

impl IntoIterator for AttributeStore {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
