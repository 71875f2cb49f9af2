//! Entity descriptors and naming conventions
//!
//! An [`EntityType`] is the schema descriptor shared by every instance of
//! one entity: table name, primary key, soft-delete and timestamp flags.
//! Naming is purely conventional and involves no I/O:
//!
//! - table = lowercase(type name) + `s`, unless overridden
//! - primary key = `id`, unless overridden
//! - timestamps = `created_at` / `updated_at`, soft delete = `deleted_at`

use std::sync::Arc;

pub const DEFAULT_PRIMARY_KEY: &str = "id";
pub const CREATED_AT: &str = "created_at";
pub const UPDATED_AT: &str = "updated_at";
pub const DELETED_AT: &str = "deleted_at";

/// Derive the conventional table name for a type name
///
/// Naive pluralization: `User` → `users`, `Person` → `persons`.
pub fn table_name_for(type_name: &str) -> String {
    format!("{}s", type_name.to_lowercase())
}

/// Schema descriptor for one entity type
///
/// Built once with the consuming `with_*` methods and then shared as
/// `Arc<EntityType>`; there are no setters afterwards.
///
/// ```
/// use rowbind_core::EntityType;
///
/// let user = EntityType::new("User").with_soft_delete(true);
/// assert_eq!(user.table_name(), "users");
/// assert_eq!(user.primary_key(), "id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityType {
    name: String,
    table: String,
    primary_key: String,
    soft_delete: bool,
    timestamps: bool,
}

impl EntityType {
    /// Descriptor with conventional table and key; timestamps on, soft delete off
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let table = table_name_for(&name);
        Self {
            name,
            table,
            primary_key: DEFAULT_PRIMARY_KEY.to_string(),
            soft_delete: false,
            timestamps: true,
        }
    }

    /// Override the derived table name
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = column.into();
        self
    }

    pub fn with_soft_delete(mut self, enabled: bool) -> Self {
        self.soft_delete = enabled;
        self
    }

    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    /// Freeze the descriptor for sharing across instances
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn soft_deletes(&self) -> bool {
        self.soft_delete
    }

    pub fn has_timestamps(&self) -> bool {
        self.timestamps
    }

    /// Columns this type stores timestamps in
    pub fn timestamp_columns(&self) -> Vec<&'static str> {
        let mut columns = Vec::new();
        if self.timestamps {
            columns.push(CREATED_AT);
            columns.push(UPDATED_AT);
        }
        if self.soft_delete {
            columns.push(DELETED_AT);
        }
        columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_derived_by_lowercase_plus_s() {
        assert_eq!(EntityType::new("User").table_name(), "users");
        assert_eq!(EntityType::new("Profile").table_name(), "profiles");
    }

    #[test]
    fn test_no_irregular_plurals() {
        assert_eq!(table_name_for("Person"), "persons");
        assert_eq!(table_name_for("Category"), "categorys");
    }

    #[test]
    fn test_explicit_table_override() {
        let ty = EntityType::new("Person").with_table("people");
        assert_eq!(ty.table_name(), "people");
        assert_eq!(ty.name(), "Person");
    }

    #[test]
    fn test_defaults() {
        let ty = EntityType::new("Profile");
        assert_eq!(ty.primary_key(), "id");
        assert!(ty.has_timestamps());
        assert!(!ty.soft_deletes());
        assert_eq!(ty.timestamp_columns(), vec![CREATED_AT, UPDATED_AT]);
    }

    #[test]
    fn test_timestamp_columns_include_deleted_at_for_soft_delete() {
        let ty = EntityType::new("User")
            .with_timestamps(false)
            .with_soft_delete(true);
        assert_eq!(ty.timestamp_columns(), vec![DELETED_AT]);
    }

    #[test]
    fn test_custom_primary_key() {
        let ty = EntityType::new("Account").with_primary_key("account_no");
        assert_eq!(ty.primary_key(), "account_no");
    }
}
