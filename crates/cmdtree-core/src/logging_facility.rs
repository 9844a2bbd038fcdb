//! Structured logging facility for command dispatch
//!
//! This module provides:
//! - Single initialization point via `init(profile)`
//! - Dispatch logging macros (`log_dispatch_start!`, `log_dispatch_end!`,
//!   `log_dispatch_fault!`)
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use cmdtree_core::logging_facility::{init, Profile};
//!
//! // Initialize once at host startup
//! init(Profile::Development);
//! ```
//!
//! Every terminal dispatch emits one `start` event and exactly one `end` or
//! `end_error` event, all carrying the qualified command name and the
//! invocation id.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
