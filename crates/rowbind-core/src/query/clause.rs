//! Clause building blocks: operators, join kinds, joins and predicates

use crate::errors::RowbindError;
use crate::model::Value;
use std::fmt;
use std::str::FromStr;

/// Comparison operators usable in WHERE predicates and JOIN conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
    NotLike,
    Is,
    IsNot,
}

impl ComparisonOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "!=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Like => "LIKE",
            ComparisonOp::NotLike => "NOT LIKE",
            ComparisonOp::Is => "IS",
            ComparisonOp::IsNot => "IS NOT",
        }
    }

    /// `IS` / `IS NOT`, which take a literal NULL instead of a parameter
    pub fn is_null_test(&self) -> bool {
        matches!(self, ComparisonOp::Is | ComparisonOp::IsNot)
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for ComparisonOp {
    type Err = RowbindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.to_ascii_uppercase().as_str() {
            "=" | "==" => Ok(ComparisonOp::Eq),
            "!=" | "<>" => Ok(ComparisonOp::Ne),
            "<" => Ok(ComparisonOp::Lt),
            "<=" => Ok(ComparisonOp::Le),
            ">" => Ok(ComparisonOp::Gt),
            ">=" => Ok(ComparisonOp::Ge),
            "LIKE" => Ok(ComparisonOp::Like),
            "NOT LIKE" => Ok(ComparisonOp::NotLike),
            "IS" => Ok(ComparisonOp::Is),
            "IS NOT" => Ok(ComparisonOp::IsNot),
            _ => Err(RowbindError::UnknownOperator { op: s.to_string() }),
        }
    }
}

/// Anything the builder accepts as an operator: the enum or its SQL spelling
pub trait IntoComparison {
    fn into_comparison(self) -> Result<ComparisonOp, RowbindError>;
}

impl IntoComparison for ComparisonOp {
    fn into_comparison(self) -> Result<ComparisonOp, RowbindError> {
        Ok(self)
    }
}

impl IntoComparison for &str {
    fn into_comparison(self) -> Result<ComparisonOp, RowbindError> {
        self.parse()
    }
}

impl IntoComparison for String {
    fn into_comparison(self) -> Result<ComparisonOp, RowbindError> {
        self.parse()
    }
}

/// Join kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Inner => write!(f, "INNER"),
            JoinType::Left => write!(f, "LEFT"),
            JoinType::Right => write!(f, "RIGHT"),
        }
    }
}

/// Single-predicate join clause
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub join_type: JoinType,
    pub table: String,
    pub left: String,
    pub op: ComparisonOp,
    pub right: String,
}

impl Join {
    /// ` <TYPE> JOIN <table> ON <left> <op> <right>` with its leading space
    pub fn to_sql(&self) -> String {
        format!(
            " {} JOIN {} ON {} {} {}",
            self.join_type, self.table, self.left, self.op, self.right
        )
    }
}

/// `column op value` filter
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: String,
    pub op: ComparisonOp,
    pub value: Value,
}

impl Predicate {
    /// SQL fragment plus the value to bind, if any
    ///
    /// `IS NULL` / `IS NOT NULL` render the literal and bind nothing; every
    /// other comparison binds its value to a `?`.
    pub fn to_sql(&self) -> (String, Option<&Value>) {
        if self.op.is_null_test() && self.value.is_null() {
            (format!("{} {} NULL", self.column, self.op), None)
        } else {
            (format!("{} {} ?", self.column, self.op), Some(&self.value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_parsing() {
        assert_eq!("=".parse::<ComparisonOp>().unwrap(), ComparisonOp::Eq);
        assert_eq!("<>".parse::<ComparisonOp>().unwrap(), ComparisonOp::Ne);
        assert_eq!("like".parse::<ComparisonOp>().unwrap(), ComparisonOp::Like);
        assert_eq!(
            "is   not".parse::<ComparisonOp>().unwrap(),
            ComparisonOp::IsNot
        );
    }

    #[test]
    fn test_unknown_operator() {
        let err = "~=".parse::<ComparisonOp>().unwrap_err();
        assert_eq!(
            err,
            RowbindError::UnknownOperator {
                op: "~=".to_string()
            }
        );
    }

    #[test]
    fn test_join_sql() {
        let join = Join {
            join_type: JoinType::Left,
            table: "profiles".to_string(),
            left: "users.id".to_string(),
            op: ComparisonOp::Eq,
            right: "profiles.user_id".to_string(),
        };
        assert_eq!(
            join.to_sql(),
            " LEFT JOIN profiles ON users.id = profiles.user_id"
        );
    }

    #[test]
    fn test_is_null_predicate_binds_nothing() {
        let pred = Predicate {
            column: "deleted_at".to_string(),
            op: ComparisonOp::Is,
            value: Value::Null,
        };
        assert_eq!(pred.to_sql(), ("deleted_at IS NULL".to_string(), None));
    }

    #[test]
    fn test_value_predicate_binds_placeholder() {
        let pred = Predicate {
            column: "status".to_string(),
            op: ComparisonOp::Eq,
            value: Value::from("active"),
        };
        let (sql, bound) = pred.to_sql();
        assert_eq!(sql, "status = ?");
        assert_eq!(bound, Some(&Value::from("active")));
    }
}
