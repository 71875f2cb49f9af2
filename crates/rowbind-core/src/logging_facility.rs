//! Structured logging facility for rowbind
//!
//! This module provides a canonical logging facility with:
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Boundary ownership: the engine logs one start and one end per operation,
//!   the kernel and the store log statement details at debug level only
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use rowbind_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
