//! Query building: clause types and the SELECT builder

pub mod builder;
pub mod clause;

pub use builder::QueryBuilder;
pub use clause::{ComparisonOp, IntoComparison, Join, JoinType, Predicate};
