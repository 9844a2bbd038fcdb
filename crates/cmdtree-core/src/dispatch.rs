//! Dispatch engine
//!
//! [`CommandRegistry`] owns the top-level command table. It is filled at
//! setup and only read while dispatching.

use std::collections::HashMap;
use std::sync::Arc;

use crate::completion::filter_prefix;
use crate::errors::{ExError, ExErrorKind, Result};
use crate::messages::DispatchSettings;
use crate::node::{CommandNode, Outcome};
use crate::principal::Principal;
use crate::scope::HandlerScope;

/// State shared by every dispatch through one registry
#[derive(Debug, Clone, Default)]
pub struct DispatchEnv {
    pub settings: Arc<DispatchSettings>,
    pub scope: Option<HandlerScope>,
}

/// Split a raw command line into tokens
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// Case-insensitive table of top-level commands
#[derive(Debug, Default)]
pub struct CommandRegistry {
    env: DispatchEnv,
    roots: HashMap<String, Arc<CommandNode>>,
    aliases: HashMap<String, String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(mut self, settings: DispatchSettings) -> Self {
        self.env.settings = Arc::new(settings);
        self
    }

    /// Attach the scope async handlers are submitted to
    pub fn with_scope(mut self, scope: HandlerScope) -> Self {
        self.env.scope = Some(scope);
        self
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.env.settings
    }

    pub fn scope(&self) -> Option<&HandlerScope> {
        self.env.scope.as_ref()
    }

    /// Add a root node under its name and aliases
    ///
    /// Aliases never shadow another command's primary name, and an alias
    /// already taken keeps its first owner.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateName` when the primary name is taken, or
    /// `InvalidSpec` when a name in the tree is empty or contains whitespace.
    pub fn register(&mut self, node: Arc<CommandNode>) -> Result<()> {
        validate_tree(&node)?;

        let key = node.name().to_lowercase();
        if self.roots.contains_key(&key) {
            return Err(ExError::new(ExErrorKind::DuplicateName)
                .with_op("register")
                .with_command(node.name())
                .with_message("command already registered"));
        }
        // A new primary name takes precedence over an existing alias
        self.aliases.remove(&key);

        for alias in node.aliases() {
            let alias_key = alias.to_lowercase();
            if self.roots.contains_key(&alias_key) || self.aliases.contains_key(&alias_key) {
                tracing::warn!(
                    component = module_path!(),
                    command = node.name(),
                    alias = alias.as_str(),
                    "alias already taken"
                );
                continue;
            }
            self.aliases.insert(alias_key, key.clone());
        }

        tracing::debug!(component = module_path!(), command = node.name(), "command registered");
        self.roots.insert(key, node);
        Ok(())
    }

    /// Remove a command by name or alias
    pub fn unregister(&mut self, name: &str) -> Option<Arc<CommandNode>> {
        let key = self.resolve_key(name)?;
        let node = self.roots.remove(&key)?;
        self.aliases.retain(|_, target| *target != key);
        Some(node)
    }

    /// Root node by name or alias, case-insensitive
    pub fn get(&self, name: &str) -> Option<&Arc<CommandNode>> {
        self.resolve_key(name).and_then(|key| self.roots.get(&key))
    }

    /// Primary names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.roots.values().map(|n| n.name().to_string()).collect();
        names.sort_by_key(|n| n.to_lowercase());
        names
    }

    /// Run one dispatch; `None` when `name` is not registered
    pub fn execute(&self, principal: Arc<dyn Principal>, name: &str, tokens: &[String]) -> Option<Outcome> {
        let Some(node) = self.get(name) else {
            tracing::debug!(component = module_path!(), command = name, "unknown command");
            return None;
        };
        Some(node.execute(principal, tokens, &self.env))
    }

    /// Whether `name` was recognized and processed
    pub fn dispatch(&self, principal: Arc<dyn Principal>, name: &str, tokens: &[String]) -> bool {
        self.execute(principal, name, tokens).is_some()
    }

    /// Tokenize a raw line (leading `/` optional) and run it
    pub fn execute_line(&self, principal: Arc<dyn Principal>, line: &str) -> Option<Outcome> {
        let tokens = tokenize(line.trim_start().trim_start_matches('/'));
        let (name, rest) = tokens.split_first()?;
        self.execute(principal, name, rest)
    }

    /// Line form of [`dispatch`](Self::dispatch)
    pub fn dispatch_line(&self, principal: Arc<dyn Principal>, line: &str) -> bool {
        self.execute_line(principal, line).is_some()
    }

    /// Suggestions for the last token of `tokens` under command `name`
    pub fn complete(&self, principal: Arc<dyn Principal>, name: &str, tokens: &[String]) -> Vec<String> {
        match self.get(name) {
            Some(node) => node.complete(principal, tokens, &self.env),
            None => Vec::new(),
        }
    }

    /// Suggestions for a raw line
    ///
    /// A trailing space starts a new, empty token. A line holding only a
    /// partial command name completes root names the principal may use.
    pub fn complete_line(&self, principal: Arc<dyn Principal>, line: &str) -> Vec<String> {
        let line = line.trim_start().trim_start_matches('/');
        let mut tokens = tokenize(line);
        if line.is_empty() || line.ends_with(char::is_whitespace) {
            tokens.push(String::new());
        }

        match tokens.split_first() {
            Some((name, rest)) if !rest.is_empty() => self.complete(principal, name, rest),
            Some((name, _)) => self.complete_root(principal.as_ref(), name),
            None => Vec::new(),
        }
    }

    fn complete_root(&self, principal: &dyn Principal, current: &str) -> Vec<String> {
        let mut visible: Vec<&str> = self
            .roots
            .values()
            .filter(|node| node.is_visible_to(principal) && node.sender().accepts(principal))
            .map(|node| node.name())
            .collect();
        visible.sort_by_key(|n| n.to_lowercase());
        filter_prefix(visible, current)
    }

    fn resolve_key(&self, name: &str) -> Option<String> {
        let key = name.to_lowercase();
        if self.roots.contains_key(&key) {
            return Some(key);
        }
        self.aliases.get(&key).cloned()
    }
}

fn validate_tree(node: &CommandNode) -> Result<()> {
    for label in node.labels() {
        if label.is_empty() || label.contains(char::is_whitespace) {
            return Err(ExError::new(ExErrorKind::InvalidSpec)
                .with_op("register")
                .with_command(node.qualified_name())
                .with_message(format!("invalid command label '{}'", label)));
        }
    }
    node.children().iter().try_for_each(|child| validate_tree(child))
}
