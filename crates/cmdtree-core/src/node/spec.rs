//! Builder DSL for command trees

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Weak};

use crate::completion::{CompletionProvider, FnCompletion, PrefixCompletion};
use crate::errors::CommandResult;
use crate::invocation::Invocation;
use crate::node::{CommandNode, Handler, UNLIMITED_ARGS};
use crate::sender::SenderRestriction;

/// Separator between a node's primary name and its aliases
pub const ALIAS_SEPARATOR: char = '|';

/// Mutable description of a command node and its subtree
///
/// ```
/// use cmdtree_core::node::CommandSpec;
///
/// let tp = CommandSpec::new("tp|teleport")
///     .permission("cmd.tp")
///     .child(CommandSpec::new("here").performs(|inv| {
///         inv.reply("teleported");
///         Ok(())
///     }))
///     .build();
///
/// assert_eq!(tp.aliases(), ["teleport"]);
/// assert_eq!(tp.child("HERE").map(|c| c.qualified_name()), Some("tp here"));
/// ```
pub struct CommandSpec {
    name: String,
    aliases: Vec<String>,
    description: Option<String>,
    sender: SenderRestriction,
    permission: Option<String>,
    help_permission: Option<String>,
    max_args: i32,
    usage: Option<String>,
    handler: Option<Handler>,
    completion: Option<Arc<dyn CompletionProvider>>,
    children: Vec<CommandSpec>,
}

impl CommandSpec {
    /// Start a node from `"name|alias1|alias2"`
    pub fn new(label: &str) -> Self {
        let mut labels = label
            .split(ALIAS_SEPARATOR)
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string);
        let name = labels.next().unwrap_or_default();
        Self {
            name,
            aliases: labels.collect(),
            description: None,
            sender: SenderRestriction::Any,
            permission: None,
            help_permission: None,
            max_args: UNLIMITED_ARGS,
            usage: None,
            handler: None,
            completion: None,
            children: Vec::new(),
        }
    }

    /// Which principals may run this node
    pub fn sender(mut self, sender: SenderRestriction) -> Self {
        self.sender = sender;
        self
    }

    /// Shorthand for `sender(SenderRestriction::PlayerOnly)`
    pub fn player_only(self) -> Self {
        self.sender(SenderRestriction::PlayerOnly)
    }

    /// Shorthand for `sender(SenderRestriction::ConsoleOnly)`
    pub fn console_only(self) -> Self {
        self.sender(SenderRestriction::ConsoleOnly)
    }

    /// Permission required to run and see this node
    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    /// Permission required to see this node's help listing
    pub fn help_permission(mut self, permission: impl Into<String>) -> Self {
        self.help_permission = Some(permission.into());
        self
    }

    /// Argument template shown after the qualified name in usage lines
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    /// One-line description shown in help listings
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Maximum token count at this node; negative means unlimited
    pub fn max_args(mut self, max_args: i32) -> Self {
        self.max_args = max_args;
        self
    }

    /// Attach a completion provider
    pub fn suggests(mut self, provider: impl CompletionProvider + 'static) -> Self {
        self.completion = Some(Arc::new(provider));
        self
    }

    /// Suggest from a literal candidate set, filtered by prefix
    pub fn suggests_values<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggests(PrefixCompletion::new(values))
    }

    /// Suggest from a transform over arbitrary entries
    pub fn suggests_from<I, T, F>(self, entries: I, transform: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> String,
    {
        let values: Vec<String> = entries.into_iter().map(|e| transform(&e)).collect();
        self.suggests(PrefixCompletion::new(values))
    }

    /// Suggest from a closure evaluated on every completion request
    pub fn suggests_with<F>(self, f: F) -> Self
    where
        F: Fn(&Invocation, &str) -> Vec<String> + Send + Sync + 'static,
    {
        self.suggests(FnCompletion::new(f))
    }

    /// Attach a handler run on the dispatching thread
    pub fn performs<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Invocation) -> CommandResult + Send + Sync + 'static,
    {
        self.handler = Some(Handler::sync(f));
        self
    }

    /// Attach a handler whose body runs in the registry's handler scope
    pub fn performs_async<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CommandResult> + Send + 'static,
    {
        self.handler = Some(Handler::from_async(f));
        self
    }

    /// Append a child node
    pub fn child(mut self, child: CommandSpec) -> Self {
        self.children.push(child);
        self
    }

    /// Freeze the tree
    pub fn build(self) -> Arc<CommandNode> {
        build_node(self, Weak::new(), None)
    }
}

fn build_node(spec: CommandSpec, parent: Weak<CommandNode>, parent_name: Option<&str>) -> Arc<CommandNode> {
    let qualified_name = match parent_name {
        Some(parent_name) => format!("{} {}", parent_name, spec.name),
        None => spec.name.clone(),
    }
    .trim()
    .to_string();

    Arc::new_cyclic(|this| {
        let children: Vec<Arc<CommandNode>> = spec
            .children
            .into_iter()
            .map(|child| build_node(child, this.clone(), Some(qualified_name.as_str())))
            .collect();

        let mut lookup = HashMap::new();
        for (i, child) in children.iter().enumerate() {
            for label in child.labels() {
                if let Some(prev) = lookup.insert(label.to_lowercase(), i) {
                    tracing::warn!(
                        command = qualified_name.as_str(),
                        label = label,
                        replaced = children[prev].name(),
                        "duplicate child label"
                    );
                }
            }
        }

        let usage_args = spec.usage.unwrap_or_else(|| {
            if children.is_empty() {
                String::new()
            } else {
                let names: Vec<&str> = children.iter().map(|c| c.name()).collect();
                format!("<{}>", names.join("|"))
            }
        });

        CommandNode {
            name: spec.name,
            aliases: spec.aliases,
            description: spec.description,
            sender: spec.sender,
            permission: spec.permission,
            help_permission: spec.help_permission,
            max_args: spec.max_args,
            usage_args,
            qualified_name,
            parent,
            children,
            lookup,
            handler: spec.handler,
            completion: spec.completion,
        }
    })
}
