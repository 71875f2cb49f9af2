//! Relation descriptors and their lookup statements

use crate::errors::Result;
use crate::model::Record;
use crate::schema::{EntityType, DEFAULT_PRIMARY_KEY};
use crate::statement::{ensure_column_name, ensure_identifier, Params, Statement};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    HasOne,
    HasMany,
    BelongsTo,
}

/// How to reach related rows of `target` from a source record
///
/// Every kind renders the same lookup:
///
/// ```text
/// SELECT * FROM <target table> WHERE <foreign_key> = ?
/// ```
///
/// bound to the source record's `local_key` value. `foreign_key` always
/// names the column on the target table. For `belongs_to` that column is
/// usually the target's primary key and `local_key` the source's
/// referencing column, e.g. `belongs_to(User, "id", "user_id")`.
#[derive(Debug, Clone)]
pub struct RelationDescriptor {
    kind: RelationKind,
    target: Arc<EntityType>,
    foreign_key: String,
    local_key: String,
}

impl RelationDescriptor {
    pub fn new(
        kind: RelationKind,
        target: Arc<EntityType>,
        foreign_key: impl Into<String>,
        local_key: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            target,
            foreign_key: foreign_key.into(),
            local_key: local_key.into(),
        }
    }

    /// One target row whose `foreign_key` equals the source's `local_key`
    pub fn has_one(
        target: Arc<EntityType>,
        foreign_key: impl Into<String>,
        local_key: impl Into<String>,
    ) -> Self {
        Self::new(RelationKind::HasOne, target, foreign_key, local_key)
    }

    /// Every target row whose `foreign_key` equals the source's `local_key`
    pub fn has_many(
        target: Arc<EntityType>,
        foreign_key: impl Into<String>,
        local_key: impl Into<String>,
    ) -> Self {
        Self::new(RelationKind::HasMany, target, foreign_key, local_key)
    }

    pub fn belongs_to(
        target: Arc<EntityType>,
        foreign_key: impl Into<String>,
        local_key: impl Into<String>,
    ) -> Self {
        Self::new(RelationKind::BelongsTo, target, foreign_key, local_key)
    }

    /// `has_one` keyed on the source's `id`
    pub fn has_one_by_id(target: Arc<EntityType>, foreign_key: impl Into<String>) -> Self {
        Self::has_one(target, foreign_key, DEFAULT_PRIMARY_KEY)
    }

    /// `has_many` keyed on the source's `id`
    pub fn has_many_by_id(target: Arc<EntityType>, foreign_key: impl Into<String>) -> Self {
        Self::has_many(target, foreign_key, DEFAULT_PRIMARY_KEY)
    }

    pub fn kind(&self) -> RelationKind {
        self.kind
    }

    pub fn target(&self) -> &Arc<EntityType> {
        &self.target
    }

    pub fn foreign_key(&self) -> &str {
        &self.foreign_key
    }

    pub fn local_key(&self) -> &str {
        &self.local_key
    }

    pub fn returns_many(&self) -> bool {
        self.kind == RelationKind::HasMany
    }

    /// Lookup statement for `source`
    ///
    /// `Ok(None)` when the source has no value (or NULL) under `local_key`:
    /// there is nothing to match and no query needs to run. Soft-deleted
    /// target rows are not filtered out.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when the descriptor fails [`validate`](Self::validate).
    pub fn lookup(&self, source: &Record) -> Result<Option<Statement>> {
        self.validate()?;
        let table = self.target.table_name();

        let key = match source.get(&self.local_key) {
            Some(value) if !value.is_null() => value.clone(),
            _ => return Ok(None),
        };
        let sql = format!("SELECT * FROM {} WHERE {} = ?", table, self.foreign_key);
        tracing::debug!(
            table = %table,
            foreign_key = %self.foreign_key,
            kind = ?self.kind,
            "rendered relation lookup"
        );
        Ok(Some(Statement::new(sql, Params::Positional(vec![key]))))
    }

    /// Target table and foreign key must be identifiers; the local key must
    /// be a plain column of the source record
    ///
    /// # Errors
    ///
    /// `InvalidArgument` naming the first offending identifier.
    pub fn validate(&self) -> Result<()> {
        ensure_identifier(self.target.table_name())?;
        ensure_identifier(&self.foreign_key)?;
        ensure_column_name(&self.local_key)
    }
}
