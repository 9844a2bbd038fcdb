//! CLI subcommands and the session they share

pub mod complete;
pub mod repl;
pub mod run;

use std::path::Path;
use std::sync::Arc;

use clap::Args;
use cmdtree_core::{
    CommandRegistry, CooldownTable, DispatchSettings, HandlerScope, Messages, Outcome,
    PrincipalKind,
};
use tokio::runtime::Runtime;

use crate::demo::{self, CliPrincipal};

/// Who is typing
#[derive(Debug, Args)]
pub struct PrincipalArgs {
    /// Principal name
    #[arg(long = "as", value_name = "NAME", default_value = "Steve")]
    pub name: String,

    /// Act as the console instead of a player
    #[arg(long)]
    pub console: bool,

    /// Grant a permission (repeatable; `*` grants everything)
    #[arg(long = "perm", value_name = "P")]
    pub permissions: Vec<String>,
}

impl PrincipalArgs {
    pub fn principal(&self) -> Arc<CliPrincipal> {
        let kind = if self.console {
            PrincipalKind::Console
        } else {
            PrincipalKind::Player
        };
        Arc::new(CliPrincipal::new(&self.name, kind, self.permissions.clone()))
    }
}

/// Registry, runtime and scopes for one CLI run
pub struct Session {
    pub registry: CommandRegistry,
    handlers: HandlerScope,
    maintenance: HandlerScope,
    cooldowns: CooldownTable,
    runtime: Runtime,
}

impl Session {
    /// Build the demo registry, loading a message catalog when given
    pub fn open(messages: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let messages = match messages {
            Some(path) => Messages::load(path)?,
            None => Messages::default(),
        };

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let handlers = HandlerScope::new(runtime.handle().clone());
        let maintenance = HandlerScope::new(runtime.handle().clone());
        let cooldowns = CooldownTable::new();

        let mut registry = CommandRegistry::new()
            .with_settings(DispatchSettings::with_messages(messages))
            .with_scope(handlers.clone());
        for node in demo::commands(&cooldowns) {
            registry.register(node)?;
        }
        tracing::debug!(commands = registry.names().len(), "session opened");

        Ok(Self {
            registry,
            handlers,
            maintenance,
            cooldowns,
            runtime,
        })
    }

    /// Dispatch one line; returns the process exit code for it
    pub fn run_line(&self, principal: Arc<CliPrincipal>, line: &str) -> i32 {
        let outcome = self.registry.execute_line(principal, line);
        self.wait_for_handlers();
        exit_code(outcome)
    }

    /// Purge stale cooldowns in the background until the session ends
    pub fn start_maintenance(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.cooldowns.spawn_sweeper(
            &self.maintenance,
            demo::COOLDOWN_SWEEP_EVERY,
            demo::KIT_COOLDOWN,
        )?;
        Ok(())
    }

    /// Block until scheduled async handlers finish
    pub fn wait_for_handlers(&self) {
        self.runtime.block_on(self.handlers.drain());
    }

    pub fn close(&self) {
        self.wait_for_handlers();
        tracing::debug!(cooldowns = self.cooldowns.len(), "session closing");
        self.maintenance.shutdown();
        self.handlers.shutdown();
    }
}

/// 0 handled and successful, 1 handled but unsuccessful, 2 unknown command
pub fn exit_code(outcome: Option<Outcome>) -> i32 {
    match outcome {
        Some(outcome) if outcome.is_success() => 0,
        Some(_) => 1,
        None => 2,
    }
}
