//! Chainable SELECT builder
//!
//! A `QueryBuilder` is a value built for exactly one query against one
//! entity type. Clauses accumulate through consuming methods and render in
//! a fixed order:
//!
//! ```text
//! SELECT * FROM <table>[ <TYPE> JOIN ...]*[ WHERE p1 AND p2 ...][ LIMIT n][ OFFSET n]
//! ```
//!
//! Argument problems (negative limit, unknown operator, unsafe identifier)
//! do not break the chain; the first one is kept and returned by
//! [`QueryBuilder::render`].

use crate::errors::{ExError, Result, RowbindError};
use crate::model::{Model, Value};
use crate::query::clause::{ComparisonOp, IntoComparison, Join, JoinType, Predicate};
use crate::schema::{EntityType, DELETED_AT};
use crate::statement::{ensure_identifier, Params, Statement};
use std::sync::Arc;

#[derive(Debug, Clone)]
#[must_use = "a QueryBuilder does nothing until it is rendered or executed"]
pub struct QueryBuilder {
    entity_type: Arc<EntityType>,
    joins: Vec<Join>,
    predicates: Vec<Predicate>,
    limit: Option<u64>,
    offset: Option<u64>,
    error: Option<ExError>,
}

impl QueryBuilder {
    pub fn new(entity_type: Arc<EntityType>) -> Self {
        Self {
            entity_type,
            joins: Vec::new(),
            predicates: Vec::new(),
            limit: None,
            offset: None,
            error: None,
        }
    }

    /// Builder bound to a model's entity type
    pub fn for_model<M: Model>() -> Self {
        Self::new(M::entity_type())
    }

    /// INNER JOIN
    pub fn join(
        self,
        table: &str,
        left: &str,
        op: impl IntoComparison,
        right: &str,
    ) -> Self {
        self.join_as(JoinType::Inner, table, left, op, right)
    }

    pub fn left_join(
        self,
        table: &str,
        left: &str,
        op: impl IntoComparison,
        right: &str,
    ) -> Self {
        self.join_as(JoinType::Left, table, left, op, right)
    }

    pub fn right_join(
        self,
        table: &str,
        left: &str,
        op: impl IntoComparison,
        right: &str,
    ) -> Self {
        self.join_as(JoinType::Right, table, left, op, right)
    }

    /// Append a join of the given kind; joins render in append order
    pub fn join_as(
        mut self,
        join_type: JoinType,
        table: &str,
        left: &str,
        op: impl IntoComparison,
        right: &str,
    ) -> Self {
        let checked = ensure_identifier(table)
            .and_then(|_| ensure_identifier(left))
            .and_then(|_| ensure_identifier(right))
            .and_then(|_| op.into_comparison().map_err(ExError::from));
        match checked {
            Ok(op) => self.joins.push(Join {
                join_type,
                table: table.to_string(),
                left: left.to_string(),
                op,
                right: right.to_string(),
            }),
            Err(e) => self.record_error(e),
        }
        self
    }

    /// Append a WHERE predicate, ANDed with the previous ones
    ///
    /// The value is always bound as a parameter.
    pub fn filter(mut self, column: &str, op: impl IntoComparison, value: impl Into<Value>) -> Self {
        let checked = ensure_identifier(column)
            .and_then(|_| op.into_comparison().map_err(ExError::from));
        match checked {
            Ok(op) => self.predicates.push(Predicate {
                column: column.to_string(),
                op,
                value: value.into(),
            }),
            Err(e) => self.record_error(e),
        }
        self
    }

    /// Set LIMIT; the last call wins
    pub fn limit(mut self, n: i64) -> Self {
        match u64::try_from(n) {
            Ok(n) => self.limit = Some(n),
            Err(_) => self.record_error(RowbindError::NegativeLimit { value: n }.into()),
        }
        self
    }

    /// Set OFFSET; the last call wins
    ///
    /// Renders ` OFFSET n` whether or not a limit is set. SQLite only
    /// accepts OFFSET after LIMIT, so on the SQLite gateway an offset
    /// without [`limit`](Self::limit) fails with `StorageFailure`; pair it
    /// with a limit there.
    pub fn offset(mut self, n: i64) -> Self {
        match u64::try_from(n) {
            Ok(n) => self.offset = Some(n),
            Err(_) => self.record_error(RowbindError::NegativeOffset { value: n }.into()),
        }
        self
    }

    /// Primary-key lookup: `pk = id`, limited to one row
    pub fn by_primary_key(self, id: impl Into<Value>) -> Self {
        let primary_key = self.entity_type.primary_key().to_string();
        self.filter(&primary_key, ComparisonOp::Eq, id).limit(1)
    }

    pub fn entity_type(&self) -> &Arc<EntityType> {
        &self.entity_type
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn limit_value(&self) -> Option<u64> {
        self.limit
    }

    pub fn offset_value(&self) -> Option<u64> {
        self.offset
    }

    /// Render the SELECT with positional parameters
    ///
    /// Soft-deleting types always get `deleted_at IS NULL` after the caller's
    /// predicates, qualified with the table name when the query joins.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for the first invalid argument given to the builder.
    pub fn render(&self) -> Result<Statement> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        let table = self.entity_type.table_name();
        ensure_identifier(table)?;

        let mut sql = format!("SELECT * FROM {}", table);
        for join in &self.joins {
            sql.push_str(&join.to_sql());
        }

        let mut conditions = Vec::with_capacity(self.predicates.len() + 1);
        let mut params = Vec::new();
        for predicate in &self.predicates {
            let (fragment, bound) = predicate.to_sql();
            conditions.push(fragment);
            if let Some(value) = bound {
                params.push(value.clone());
            }
        }
        if self.entity_type.soft_deletes() {
            if self.joins.is_empty() {
                conditions.push(format!("{} IS NULL", DELETED_AT));
            } else {
                conditions.push(format!("{}.{} IS NULL", table, DELETED_AT));
            }
        }
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }

        tracing::debug!(table = table, sql = %sql, "rendered select");

        let params = if params.is_empty() {
            Params::None
        } else {
            Params::Positional(params)
        };
        Ok(Statement::new(sql, params))
    }

    fn record_error(&mut self, err: ExError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;

    fn users() -> Arc<EntityType> {
        EntityType::new("User").shared()
    }

    fn soft_users() -> Arc<EntityType> {
        EntityType::new("User").with_soft_delete(true).shared()
    }

    #[test]
    fn test_bare_select() {
        let stmt = QueryBuilder::new(users()).render().unwrap();
        assert_eq!(stmt.sql, "SELECT * FROM users");
        assert_eq!(stmt.params, Params::None);
    }

    #[test]
    fn test_full_clause_order() {
        let stmt = QueryBuilder::new(users())
            .limit(10)
            .filter("users.status", "=", "active")
            .join("profiles", "users.id", "=", "profiles.user_id")
            .offset(20)
            .render()
            .unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT * FROM users INNER JOIN profiles ON users.id = profiles.user_id \
             WHERE users.status = ? LIMIT 10 OFFSET 20"
        );
        assert_eq!(stmt.params, Params::Positional(vec![Value::from("active")]));
    }

    #[test]
    fn test_predicates_anded_in_declaration_order() {
        let stmt = QueryBuilder::new(users())
            .filter("age", ">=", 18)
            .filter("name", "LIKE", "A%")
            .render()
            .unwrap();
        assert_eq!(stmt.sql, "SELECT * FROM users WHERE age >= ? AND name LIKE ?");
        assert_eq!(
            stmt.params,
            Params::Positional(vec![Value::from(18), Value::from("A%")])
        );
    }

    #[test]
    fn test_values_never_interpolated() {
        let hostile = "x' OR '1'='1";
        let stmt = QueryBuilder::new(users())
            .filter("name", "=", hostile)
            .render()
            .unwrap();
        assert!(!stmt.sql.contains(hostile));
        assert_eq!(stmt.params.values(), vec![&Value::from(hostile)]);
    }

    #[test]
    fn test_last_limit_and_offset_win() {
        let builder = QueryBuilder::new(users()).limit(5).limit(3).offset(9).offset(1);
        assert_eq!(builder.limit_value(), Some(3));
        assert_eq!(builder.offset_value(), Some(1));
        let stmt = builder.render().unwrap();
        assert_eq!(stmt.sql, "SELECT * FROM users LIMIT 3 OFFSET 1");
    }

    #[test]
    fn test_limit_zero_is_rendered() {
        let stmt = QueryBuilder::new(users()).limit(0).render().unwrap();
        assert_eq!(stmt.sql, "SELECT * FROM users LIMIT 0");
    }

    #[test]
    fn test_negative_limit_is_invalid_argument() {
        let err = QueryBuilder::new(users()).limit(-1).render().unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidArgument);
    }

    #[test]
    fn test_negative_offset_is_invalid_argument() {
        let err = QueryBuilder::new(users()).offset(-3).render().unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidArgument);
        assert!(err.message().contains("-3"));
    }

    #[test]
    fn test_unknown_operator_is_invalid_argument() {
        let err = QueryBuilder::new(users())
            .filter("name", "SOUNDS LIKE", "Ada")
            .render()
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidArgument);
    }

    #[test]
    fn test_first_error_is_kept() {
        let err = QueryBuilder::new(users())
            .limit(-1)
            .filter("name", "~", 1)
            .render()
            .unwrap_err();
        assert_eq!(err.op(), Some("limit"));
    }

    #[test]
    fn test_unsafe_identifier_rejected() {
        let err = QueryBuilder::new(users())
            .join("profiles; DROP TABLE users", "users.id", "=", "profiles.user_id")
            .render()
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidArgument);
    }

    #[test]
    fn test_join_types_render() {
        let stmt = QueryBuilder::new(users())
            .left_join("profiles", "users.id", "=", "profiles.user_id")
            .right_join("teams", "users.team_id", ComparisonOp::Eq, "teams.id")
            .render()
            .unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT * FROM users LEFT JOIN profiles ON users.id = profiles.user_id \
             RIGHT JOIN teams ON users.team_id = teams.id"
        );
    }

    #[test]
    fn test_soft_delete_predicate_appended() {
        let stmt = QueryBuilder::new(soft_users())
            .filter("status", "=", "active")
            .render()
            .unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT * FROM users WHERE status = ? AND deleted_at IS NULL"
        );
    }

    #[test]
    fn test_soft_delete_predicate_qualified_with_joins() {
        let stmt = QueryBuilder::new(soft_users())
            .join("profiles", "users.id", "=", "profiles.user_id")
            .render()
            .unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT * FROM users INNER JOIN profiles ON users.id = profiles.user_id \
             WHERE users.deleted_at IS NULL"
        );
    }

    #[test]
    fn test_by_primary_key() {
        let stmt = QueryBuilder::new(soft_users())
            .by_primary_key(7)
            .render()
            .unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT * FROM users WHERE id = ? AND deleted_at IS NULL LIMIT 1"
        );
        assert_eq!(stmt.params, Params::Positional(vec![Value::Integer(7)]));
    }

    #[test]
    fn test_render_is_deterministic() {
        let builder = QueryBuilder::new(users())
            .join("profiles", "users.id", "=", "profiles.user_id")
            .filter("users.status", "=", "active")
            .limit(2);
        assert_eq!(builder.render().unwrap(), builder.render().unwrap());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn chained_filters_bind_every_value_in_order(values in proptest::collection::vec(any::<i64>(), 0..8)) {
                let mut builder = QueryBuilder::new(users());
                for v in &values {
                    builder = builder.filter("score", ">", *v);
                }
                let stmt = builder.render().unwrap();

                let bound: Vec<Value> = stmt.params.values().into_iter().cloned().collect();
                let expected: Vec<Value> = values.iter().map(|v| Value::Integer(*v)).collect();
                prop_assert_eq!(bound, expected);
                prop_assert_eq!(stmt.sql.matches(" AND ").count(), values.len().saturating_sub(1));
            }

            #[test]
            fn non_negative_limit_offset_always_render(limit in 0i64..10_000, offset in 0i64..10_000) {
                let stmt = QueryBuilder::new(users()).limit(limit).offset(offset).render().unwrap();
                prop_assert_eq!(stmt.sql, format!("SELECT * FROM users LIMIT {} OFFSET {}", limit, offset));
            }
        }
    }
}
