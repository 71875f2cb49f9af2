//! In-memory entity state: values, attribute bags and records

pub mod attributes;
pub mod record;
pub mod value;

pub use attributes::AttributeStore;
pub use record::{Model, Record};
pub use value::Value;
