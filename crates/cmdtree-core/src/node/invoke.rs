//! Invoke step: run a handler and resolve its signals
//!
//! `Fail`, `Stop` and faults raised anywhere below the handler are resolved
//! here, exactly once, for the terminal node of a dispatch.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use cmdtree_core_types::InvocationId;
use futures::FutureExt;

use crate::dispatch::DispatchEnv;
use crate::errors::{CommandError, CommandResult, ExError, ExErrorKind};
use crate::messages::DispatchSettings;
use crate::node::{CommandNode, Handler};
use crate::principal::Principal;
use crate::{log_dispatch_end, log_dispatch_fault, log_dispatch_start};

/// Why a dispatch was turned away before the handler ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    WrongSender,
    NoPermission,
    TooManyArguments,
}

/// Result of one dispatch through a command node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Handler returned normally
    Success,
    /// Async handler was submitted to the handler scope
    Scheduled,
    /// Handler aborted with a message
    Failed,
    /// Handler aborted silently
    Stopped,
    /// Handler raised an unexpected fault or panicked
    Faulted,
    /// A check failed before the handler ran
    Rejected(Rejection),
    /// A help listing was sent instead of running a handler
    Help,
}

impl Outcome {
    /// True only for `Success` and `Scheduled`
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success | Outcome::Scheduled)
    }

    /// Stable name used in log events
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Scheduled => "scheduled",
            Outcome::Failed => "failed",
            Outcome::Stopped => "stopped",
            Outcome::Faulted => "faulted",
            Outcome::Rejected(Rejection::WrongSender) => "rejected_sender",
            Outcome::Rejected(Rejection::NoPermission) => "rejected_permission",
            Outcome::Rejected(Rejection::TooManyArguments) => "rejected_arg_count",
            Outcome::Help => "help",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn invoke(
    node: &Arc<CommandNode>,
    handler: &Handler,
    principal: Arc<dyn Principal>,
    tokens: Vec<String>,
    env: &DispatchEnv,
) -> Outcome {
    let started = Instant::now();
    let command = node.qualified_name().to_string();
    let mut inv = node.sender().context(
        Arc::clone(&principal),
        Arc::clone(node),
        tokens,
        Arc::clone(&env.settings),
    );
    let id = inv.id().clone();

    log_dispatch_start!(
        command.as_str(),
        principal.name(),
        arg_count = inv.len(),
        invocation_id = %id
    );

    match handler {
        Handler::Sync(f) => {
            let result = std::panic::catch_unwind(AssertUnwindSafe(|| f(&mut inv)))
                .unwrap_or_else(|payload| Err(panic_fault(payload)));
            resolve(&command, principal.as_ref(), &id, result, &env.settings, started)
        }
        Handler::Async(f) => {
            let Some(scope) = env.scope.as_ref() else {
                let err = ExError::new(ExErrorKind::ScopeClosed)
                    .with_op("invoke")
                    .with_message("no handler scope attached");
                return resolve(
                    &command,
                    principal.as_ref(),
                    &id,
                    Err(err.into()),
                    &env.settings,
                    started,
                );
            };

            let future = f(inv);
            let task_principal = Arc::clone(&principal);
            let task_settings = Arc::clone(&env.settings);
            let task_command = command.clone();
            let task_id = id.clone();
            let task = async move {
                let result = AssertUnwindSafe(future)
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|payload| Err(panic_fault(payload)));
                resolve(
                    &task_command,
                    task_principal.as_ref(),
                    &task_id,
                    result,
                    &task_settings,
                    started,
                );
            };

            match scope.spawn(task) {
                Ok(()) => {
                    log_dispatch_end!(
                        command.as_str(),
                        outcome = Outcome::Scheduled.as_str(),
                        duration_ms = elapsed_ms(started),
                        invocation_id = %id
                    );
                    Outcome::Scheduled
                }
                Err(err) => resolve(
                    &command,
                    principal.as_ref(),
                    &id,
                    Err(err.into()),
                    &env.settings,
                    started,
                ),
            }
        }
    }
}

fn resolve(
    command: &str,
    principal: &dyn Principal,
    id: &InvocationId,
    result: CommandResult,
    settings: &DispatchSettings,
    started: Instant,
) -> Outcome {
    let outcome = match result {
        Ok(()) => Outcome::Success,
        Err(CommandError::Fail(message)) => {
            principal.send_message(&message);
            Outcome::Failed
        }
        Err(CommandError::Stop) => Outcome::Stopped,
        Err(CommandError::Fault(err)) => {
            let err = err
                .with_command(command)
                .with_principal(principal.name())
                .with_invocation_id(id.clone());
            log_dispatch_fault!(
                command,
                principal.name(),
                err,
                duration_ms = elapsed_ms(started),
                invocation_id = %id
            );
            send_fault(principal, &err, settings);
            return Outcome::Faulted;
        }
    };

    log_dispatch_end!(
        command,
        outcome = outcome.as_str(),
        duration_ms = elapsed_ms(started),
        invocation_id = %id
    );
    outcome
}

fn send_fault(principal: &dyn Principal, err: &ExError, settings: &DispatchSettings) {
    let generic = &settings.messages.internal_error;
    if settings.show_fault_details && principal.is_privileged() {
        let detail = if err.message().is_empty() {
            err.code()
        } else {
            err.message()
        };
        principal.send_message(&format!("{}: {}", generic, detail));
    } else {
        principal.send_message(generic);
    }
}

fn panic_fault(payload: Box<dyn Any + Send>) -> CommandError {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "handler panicked".to_string());
    ExError::new(ExErrorKind::HandlerPanic)
        .with_op("invoke")
        .with_message(message)
        .into()
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
