//! rowbind Store - SQLite backend for the rowbind gateway
//!
//! Provides:
//! - Connection open/configure with pragma settings (`db`)
//! - rusqlite error mapping into `ExError` (`errors`)
//! - `Value` <-> SQLite conversions (`convert`)
//! - `SqliteGateway`, the shipped `ConnectionGateway` implementation (`gateway`)

pub mod convert;
pub mod db;
pub mod errors;
pub mod gateway;

// Re-export key types
pub use db::{JournalMode, StoreConfig};
pub use errors::Result;
pub use gateway::SqliteGateway;
