//! Core types shared across cmdtree facilities
//!
//! This crate provides foundational types used by both the error and
//! logging facilities of the dispatch engine:
//!
//! - **Correlation types**: InvocationId
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::InvocationId;
