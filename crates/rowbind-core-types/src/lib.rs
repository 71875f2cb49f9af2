//! Core types shared across rowbind facilities
//!
//! This crate provides the leaf types used by the error facility, the
//! logging facility and the SQLite gateway:
//!
//! - **Correlation types**: RequestId
//! - **Sensitive data**: Sensitive<T> marker for redacting bound parameters
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::RequestId;
pub use sensitive::Sensitive;
