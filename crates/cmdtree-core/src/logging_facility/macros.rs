//! Canonical dispatch logging macros
//!
//! Field names match the `FIELD_*` keys in `cmdtree_core_types::schema`;
//! the capture layer and logging tests read events through those keys.

/// Log the start of a terminal dispatch
///
/// # Example
///
/// ```
/// # use cmdtree_core::log_dispatch_start;
/// log_dispatch_start!("tp all", "Alice");
/// log_dispatch_start!("tp all", "Alice", arg_count = 1);
/// ```
#[macro_export]
macro_rules! log_dispatch_start {
    ($command:expr, $principal:expr) => {
        tracing::debug!(
            component = module_path!(),
            command = $command,
            principal = $principal,
            event = $crate::core_types::schema::EVENT_START,
        );
    };
    ($command:expr, $principal:expr, $($field:tt)*) => {
        tracing::debug!(
            component = module_path!(),
            command = $command,
            principal = $principal,
            event = $crate::core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the end of a terminal dispatch
///
/// # Example
///
/// ```
/// # use cmdtree_core::log_dispatch_end;
/// log_dispatch_end!("tp all", outcome = "success", duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_dispatch_end {
    ($command:expr, outcome = $outcome:expr, duration_ms = $duration:expr) => {
        tracing::debug!(
            component = module_path!(),
            command = $command,
            event = $crate::core_types::schema::EVENT_END,
            outcome = $outcome,
            duration_ms = $duration,
        );
    };
    ($command:expr, outcome = $outcome:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::debug!(
            component = module_path!(),
            command = $command,
            event = $crate::core_types::schema::EVENT_END,
            outcome = $outcome,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log a handler fault with command and principal identity
///
/// `$err` must be an `ExError` (or a reference to one).
///
/// # Example
///
/// ```
/// # use cmdtree_core::log_dispatch_fault;
/// # use cmdtree_core::errors::{ExError, ExErrorKind};
/// let err = ExError::new(ExErrorKind::Internal).with_message("boom");
/// log_dispatch_fault!("tp all", "Alice", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_dispatch_fault {
    ($command:expr, $principal:expr, $err:expr, duration_ms = $duration:expr) => {{
        let err: &$crate::errors::ExError = &$err;
        tracing::error!(
            component = module_path!(),
            command = $command,
            principal = $principal,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?err.kind(),
            err.code = err.code(),
            err.message = err.message(),
        );
    }};
    ($command:expr, $principal:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let err: &$crate::errors::ExError = &$err;
        tracing::error!(
            component = module_path!(),
            command = $command,
            principal = $principal,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?err.kind(),
            err.code = err.code(),
            err.message = err.message(),
            $($field)*
        );
    }};
}
