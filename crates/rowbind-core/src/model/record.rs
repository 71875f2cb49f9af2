//! Entity instances and the typed-model factory

use crate::gateway::Row;
use crate::model::attributes::AttributeStore;
use crate::model::value::{parse_timestamp, Value};
use crate::schema::EntityType;
use std::sync::Arc;

/// One entity instance: a shared type descriptor plus its own attributes
///
/// A record is transient until its primary-key column holds a non-NULL
/// value; from then on it identifies a persisted row.
#[derive(Debug, Clone)]
pub struct Record {
    entity_type: Arc<EntityType>,
    attributes: AttributeStore,
}

impl Record {
    /// Empty transient record
    pub fn new(entity_type: Arc<EntityType>) -> Self {
        Self {
            entity_type,
            attributes: AttributeStore::new(),
        }
    }

    pub fn with_attributes(entity_type: Arc<EntityType>, attributes: AttributeStore) -> Self {
        Self {
            entity_type,
            attributes,
        }
    }

    /// Materialize a result row
    ///
    /// Columns are copied in row order. When a joined result carries the
    /// same column name twice, the first occurrence (the queried table's)
    /// wins. Timestamp columns of this type are parsed back into
    /// `Value::Timestamp` when their text is a valid timestamp.
    pub fn from_row(entity_type: Arc<EntityType>, row: Row) -> Self {
        let timestamp_columns = entity_type.timestamp_columns();
        let mut attributes = AttributeStore::new();
        for (column, value) in row {
            if attributes.contains(&column) {
                continue;
            }
            let value = match value {
                Value::Text(text) if timestamp_columns.iter().any(|c| *c == column) => {
                    parse_timestamp(&text)
                        .map(Value::Timestamp)
                        .unwrap_or(Value::Text(text))
                }
                other => other,
            };
            attributes.set(column, value);
        }
        Self {
            entity_type,
            attributes,
        }
    }

    pub fn entity_type(&self) -> &Arc<EntityType> {
        &self.entity_type
    }

    pub fn table_name(&self) -> &str {
        self.entity_type.table_name()
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.attributes.get(column)
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.attributes.set(column, value);
        self
    }

    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    pub fn into_attributes(self) -> AttributeStore {
        self.attributes
    }

    /// Value of the primary-key column, when set and not NULL
    pub fn primary_key_value(&self) -> Option<&Value> {
        self.attributes
            .get(self.entity_type.primary_key())
            .filter(|v| !v.is_null())
    }

    pub fn has_primary_key(&self) -> bool {
        self.attributes.has_value(self.entity_type.primary_key())
    }

    pub fn is_transient(&self) -> bool {
        !self.has_primary_key()
    }

    pub(crate) fn replace_attributes(&mut self, attributes: AttributeStore) {
        self.attributes = attributes;
    }
}

/// Typed entity backed by a [`Record`]
///
/// Implementations are the explicit factory that turns a materialized row
/// into a concrete type: query results call [`Model::from_record`] once per
/// row.
///
/// ```
/// use std::sync::{Arc, OnceLock};
/// use rowbind_core::{EntityType, Model, Record};
///
/// struct User(Record);
///
/// impl Model for User {
///     fn entity_type() -> Arc<EntityType> {
///         static TYPE: OnceLock<Arc<EntityType>> = OnceLock::new();
///         TYPE.get_or_init(|| EntityType::new("User").shared()).clone()
///     }
///     fn from_record(record: Record) -> Self {
///         User(record)
///     }
///     fn record(&self) -> &Record {
///         &self.0
///     }
///     fn record_mut(&mut self) -> &mut Record {
///         &mut self.0
///     }
/// }
///
/// let mut user = User::new();
/// user.record_mut().set("name", "Ada");
/// assert_eq!(user.record().table_name(), "users");
/// ```
pub trait Model: Sized {
    /// Shared descriptor for every instance of this type
    fn entity_type() -> Arc<EntityType>;

    fn from_record(record: Record) -> Self;

    fn record(&self) -> &Record;

    fn record_mut(&mut self) -> &mut Record;

    /// Fresh transient instance
    fn new() -> Self {
        Self::from_record(Record::new(Self::entity_type()))
    }
}
