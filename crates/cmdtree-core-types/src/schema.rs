//! Canonical schema constants for structured logging
//!
//! These constants keep dispatch events consistent across the engine,
//! the asynchronous handler scope and the host binary.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_COMMAND: &str = "command";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_INVOCATION_ID: &str = "invocation_id";

// Invocation identity
pub const FIELD_PRINCIPAL: &str = "principal";
pub const FIELD_OUTCOME: &str = "outcome";
pub const FIELD_ARG_COUNT: &str = "arg_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";
pub const FIELD_ERR_MESSAGE: &str = "err.message";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
