use cmdtree_core_types::InvocationId;
use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Result type returned by handlers and argument accessors
pub type CommandResult<T = ()> = std::result::Result<T, CommandError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code used in log events and in tests.
/// User input kinds never escape the dispatch boundary; they are rendered as
/// a one-line message to the invoking principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // User input
    MissingArgument,
    InvalidArgument,
    NoPermission,
    WrongSender,
    TooManyArguments,
    OnCooldown,

    // Resolution
    UnknownCommand,

    // Registration
    DuplicateName,
    InvalidSpec,

    // Configuration
    InvalidConfig,

    // Scheduling
    ScopeClosed,
    HandlerPanic,

    // Integration/IO
    Io,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::MissingArgument => "ERR_MISSING_ARGUMENT",
            ExErrorKind::InvalidArgument => "ERR_INVALID_ARGUMENT",
            ExErrorKind::NoPermission => "ERR_NO_PERMISSION",
            ExErrorKind::WrongSender => "ERR_WRONG_SENDER",
            ExErrorKind::TooManyArguments => "ERR_TOO_MANY_ARGUMENTS",
            ExErrorKind::OnCooldown => "ERR_ON_COOLDOWN",
            ExErrorKind::UnknownCommand => "ERR_UNKNOWN_COMMAND",
            ExErrorKind::DuplicateName => "ERR_DUPLICATE_NAME",
            ExErrorKind::InvalidSpec => "ERR_INVALID_SPEC",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::ScopeClosed => "ERR_SCOPE_CLOSED",
            ExErrorKind::HandlerPanic => "ERR_HANDLER_PANIC",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind plus optional context about which command,
/// principal and invocation the error belongs to.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    command: Option<String>,
    principal: Option<String>,
    invocation_id: Option<InvocationId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            command: None,
            principal: None,
            invocation_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Create an internal error from any displayable fault
    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::new(ExErrorKind::Internal).with_message(err.to_string())
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add fully-qualified command name context
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Add principal name context
    pub fn with_principal(mut self, principal: impl Into<String>) -> Self {
        self.principal = Some(principal.into());
        self
    }

    /// Add invocation ID context
    pub fn with_invocation_id(mut self, invocation_id: InvocationId) -> Self {
        self.invocation_id = Some(invocation_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the command context, if any
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    /// Get the principal context, if any
    pub fn principal(&self) -> Option<&str> {
        self.principal.as_deref()
    }

    /// Get the invocation ID context, if any
    pub fn invocation_id(&self) -> Option<&InvocationId> {
        self.invocation_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(command) = &self.command {
            write!(f, " (command: {})", command)?;
        }
        if let Some(principal) = &self.principal {
            write!(f, " (principal: {})", principal)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<std::io::Error> for ExError {
    fn from(err: std::io::Error) -> Self {
        ExError::new(ExErrorKind::Io).with_message(err.to_string())
    }
}

// ========== End Error Facility ==========

/// Control-flow signal raised by handlers and argument accessors
///
/// Every variant propagates unchanged through accessors and nested child
/// dispatch and is resolved exactly once, at the invoke step of the terminal
/// command node.
#[derive(Error, Debug, Clone)]
pub enum CommandError {
    /// Abort with a message delivered verbatim to the principal
    #[error("{0}")]
    Fail(String),

    /// Abort silently; nothing is shown to the principal
    #[error("command stopped")]
    Stop,

    /// Unexpected fault; logged, and the principal sees a generic message
    #[error(transparent)]
    Fault(#[from] ExError),
}

impl CommandError {
    /// Wrap any displayable error as an unexpected fault
    pub fn fault(err: impl std::fmt::Display) -> Self {
        CommandError::Fault(ExError::internal(err))
    }

    /// Returns true for the user-facing abort signal
    pub fn is_fail(&self) -> bool {
        matches!(self, CommandError::Fail(_))
    }

    /// Returns true for the silent abort signal
    pub fn is_stop(&self) -> bool {
        matches!(self, CommandError::Stop)
    }

    /// The abort message, if this is a `Fail`
    pub fn fail_message(&self) -> Option<&str> {
        match self {
            CommandError::Fail(message) => Some(message),
            _ => None,
        }
    }
}

/// Abort the current command with a message for the principal
pub fn fail(message: impl Into<String>) -> CommandError {
    CommandError::Fail(message.into())
}

/// Abort the current command without any message
pub fn stop() -> CommandError {
    CommandError::Stop
}

/// Converts an absent value into an abort signal
///
/// ```
/// use cmdtree_core::errors::{CommandResult, OrFail};
///
/// fn first(values: &[u32]) -> CommandResult<u32> {
///     let value = values.first().or_fail("nothing to pick")?;
///     Ok(*value)
/// }
///
/// assert!(first(&[]).is_err());
/// assert_eq!(first(&[7]).unwrap(), 7);
/// ```
pub trait OrFail<T> {
    /// Returns the value, or aborts with `message`
    fn or_fail(self, message: impl Into<String>) -> CommandResult<T>;

    /// Returns the value, or aborts silently
    fn or_stop(self) -> CommandResult<T>;
}

impl<T> OrFail<T> for Option<T> {
    fn or_fail(self, message: impl Into<String>) -> CommandResult<T> {
        self.ok_or_else(|| fail(message))
    }

    fn or_stop(self) -> CommandResult<T> {
        self.ok_or(CommandError::Stop)
    }
}

impl<T, E> OrFail<T> for std::result::Result<T, E> {
    fn or_fail(self, message: impl Into<String>) -> CommandResult<T> {
        self.map_err(|_| fail(message))
    }

    fn or_stop(self) -> CommandResult<T> {
        self.map_err(|_| CommandError::Stop)
    }
}
