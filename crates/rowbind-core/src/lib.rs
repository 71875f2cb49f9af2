//! rowbind Core - Active-Record mapping and SQL rendering kernel
//!
//! This crate holds everything that does not touch a database:
//! - Entity descriptors with table/primary-key conventions (`schema`)
//! - Ordered attribute bags, records and the `Model` factory trait (`model`)
//! - The chainable SELECT builder (`query`)
//! - INSERT/UPDATE/DELETE rendering with timestamp staging (`persistence`)
//! - Relation descriptors and lookup statements (`relation`)
//! - The `ConnectionGateway` contract the store implements (`gateway`)
//! - Error and logging facilities shared by every crate
//!
//! Rendering never interpolates values: every value travels as a bound
//! parameter inside a [`Statement`].

pub mod errors;
pub mod gateway;
pub mod logging_facility;
pub mod model;
pub mod persistence;
pub mod query;
pub mod relation;
pub mod schema;
pub mod statement;

/// Leaf types re-exported for the logging macros and downstream crates
pub use rowbind_core_types as types;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, Result, RowbindError};
pub use gateway::{ConnectionGateway, InsertOutcome, Row};
pub use model::{AttributeStore, Model, Record, Value};
pub use persistence::{Clock, SystemClock};
pub use query::{ComparisonOp, JoinType, QueryBuilder};
pub use relation::{RelationDescriptor, RelationKind};
pub use schema::EntityType;
pub use statement::{Params, Statement};
