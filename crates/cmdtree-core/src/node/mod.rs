//! Command nodes
//!
//! A [`CommandNode`] is one named unit of the dispatch tree. Trees are
//! described with [`CommandSpec`] and frozen by [`CommandSpec::build`];
//! after that they are immutable and shared by `Arc`.
//!
//! One dispatch through a node runs these states in order, any of which may
//! end the dispatch early:
//!
//! 1. **Child match** - the first token names a child (case-insensitive):
//!    strip it and continue in the child
//! 2. **Sender check** - the sender restriction rejects the principal
//! 3. **Permission check** - the principal lacks the node's permission
//!    (answered with the unknown-command message)
//! 4. **Argument count** - more tokens than `max_args`
//! 5. **Help** - no handler, or a help keyword on a node with children
//! 6. **Invoke** - build the invocation and run the handler, resolving
//!    signals and faults

pub mod handler;
pub mod invoke;
pub mod spec;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use crate::completion::CompletionProvider;
use crate::dispatch::DispatchEnv;
use crate::help;
use crate::messages::Messages;
use crate::principal::Principal;
use crate::sender::SenderRestriction;

pub use handler::Handler;
pub use invoke::{Outcome, Rejection};
pub use spec::CommandSpec;

/// Max-argument value meaning "no limit"
pub const UNLIMITED_ARGS: i32 = -1;

/// An immutable node of the command tree
pub struct CommandNode {
    name: String,
    aliases: Vec<String>,
    description: Option<String>,
    sender: SenderRestriction,
    permission: Option<String>,
    help_permission: Option<String>,
    max_args: i32,
    usage_args: String,
    qualified_name: String,
    parent: Weak<CommandNode>,
    children: Vec<Arc<CommandNode>>,
    lookup: HashMap<String, usize>,
    handler: Option<Handler>,
    completion: Option<Arc<dyn CompletionProvider>>,
}

impl CommandNode {
    /// Primary name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Alias names, in declaration order
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Primary name followed by aliases
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// One-line description used in help listings
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Sender restriction
    pub fn sender(&self) -> SenderRestriction {
        self.sender
    }

    /// Permission required to run (and see) this node
    pub fn permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    /// Permission required to see this node's help listing
    pub fn help_permission(&self) -> Option<&str> {
        self.help_permission.as_deref()
    }

    /// Maximum token count; negative means unlimited
    pub fn max_args(&self) -> i32 {
        self.max_args
    }

    /// Cached argument description used in usage lines
    pub fn usage_args(&self) -> &str {
        &self.usage_args
    }

    /// Cached space-joined chain of names from the root
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Parent node; `None` for roots
    pub fn parent(&self) -> Option<Arc<CommandNode>> {
        self.parent.upgrade()
    }

    /// Qualified name recomputed by walking the parent chain
    pub fn resolve_qualified_name(&self) -> String {
        let mut names = vec![self.name.clone()];
        let mut current = self.parent();
        while let Some(node) = current {
            names.push(node.name.clone());
            current = node.parent();
        }
        names.reverse();
        names.join(" ").trim().to_string()
    }

    /// Children in insertion order
    pub fn children(&self) -> &[Arc<CommandNode>] {
        &self.children
    }

    /// Whether the node has children
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Child by name or alias, case-insensitive
    pub fn child(&self, label: &str) -> Option<&Arc<CommandNode>> {
        self.lookup
            .get(&label.to_lowercase())
            .and_then(|&i| self.children.get(i))
    }

    /// Attached handler, if any
    pub fn handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }

    /// Attached completion provider, if any
    pub fn completion(&self) -> Option<&Arc<dyn CompletionProvider>> {
        self.completion.as_ref()
    }

    /// Whether `principal` passes this node's permission
    pub fn is_visible_to(&self, principal: &dyn Principal) -> bool {
        self.permission
            .as_deref()
            .map_or(true, |p| principal.has_permission(p))
    }

    /// Usage line for this node
    pub fn usage_message(&self, messages: &Messages) -> String {
        messages.usage_line(&self.qualified_name, &self.usage_args)
    }

    /// Run one dispatch through this node (and its matching descendants)
    pub fn execute(
        self: &Arc<Self>,
        principal: Arc<dyn Principal>,
        tokens: &[String],
        env: &DispatchEnv,
    ) -> Outcome {
        if let Some((first, rest)) = tokens.split_first() {
            if let Some(child) = self.child(first) {
                return child.execute(principal, rest, env);
            }
        }

        let messages = &env.settings.messages;

        if !self.sender.accepts(principal.as_ref()) {
            principal.send_message(self.sender.rejection_message(messages));
            return Outcome::Rejected(Rejection::WrongSender);
        }

        if !self.is_visible_to(principal.as_ref()) {
            principal.send_message(&messages.unknown_command);
            return Outcome::Rejected(Rejection::NoPermission);
        }

        if self.max_args >= 0 && tokens.len() > self.max_args as usize {
            principal.send_message(&self.usage_message(messages));
            return Outcome::Rejected(Rejection::TooManyArguments);
        }

        let help_requested = self.has_children()
            && tokens
                .first()
                .is_some_and(|t| env.settings.is_help_keyword(t));
        let Some(handler) = self.handler.as_ref().filter(|_| !help_requested) else {
            return help::send_help(self, principal.as_ref(), messages);
        };

        invoke::invoke(self, handler, principal, tokens.to_vec(), env)
    }

    /// Completion suggestions for the in-progress last token
    ///
    /// Descends into a child only when a complete token precedes the one
    /// being typed. Principals that fail the sender or permission check get
    /// no suggestions.
    pub fn complete(
        self: &Arc<Self>,
        principal: Arc<dyn Principal>,
        tokens: &[String],
        env: &DispatchEnv,
    ) -> Vec<String> {
        if tokens.len() > 1 {
            if let Some(child) = self.child(&tokens[0]) {
                return child.complete(principal, &tokens[1..], env);
            }
        }

        if !self.sender.accepts(principal.as_ref()) || !self.is_visible_to(principal.as_ref()) {
            return Vec::new();
        }

        let current = tokens.last().cloned().unwrap_or_default();
        let inv = self.sender.context(
            principal,
            Arc::clone(self),
            tokens.to_vec(),
            Arc::clone(&env.settings),
        );
        match &self.completion {
            Some(provider) => provider.complete(&inv, &current),
            None => crate::completion::ChildCompletion.complete(&inv, &current),
        }
    }
}

impl fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNode")
            .field("qualified_name", &self.qualified_name)
            .field("aliases", &self.aliases)
            .field("sender", &self.sender)
            .field("permission", &self.permission)
            .field("max_args", &self.max_args)
            .field(
                "children",
                &self.children.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}
