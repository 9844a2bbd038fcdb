//! Invocation context: the positional argument cursor
//!
//! An [`Invocation`] is built fresh for every handler call. It owns the
//! tokens of the terminal node's level (tokens consumed while resolving
//! ancestors are already stripped) and a cursor that only moves forward.
//!
//! Reads at the default index advance the cursor on every attempt, including
//! reads past the end of the token array, so chained optional reads never get
//! stuck on a missing slot.

use std::sync::Arc;

use cmdtree_core_types::InvocationId;

use crate::args::ArgRequest;
use crate::errors::{fail, CommandResult};
use crate::messages::{DispatchSettings, Messages};
use crate::node::CommandNode;
use crate::principal::Principal;

/// Per-invocation handler context
pub struct Invocation {
    id: InvocationId,
    principal: Arc<dyn Principal>,
    node: Arc<CommandNode>,
    args: Vec<String>,
    cursor: usize,
    settings: Arc<DispatchSettings>,
}

impl Invocation {
    /// Create a context with the cursor at 0
    pub fn new(
        principal: Arc<dyn Principal>,
        node: Arc<CommandNode>,
        args: Vec<String>,
        settings: Arc<DispatchSettings>,
    ) -> Self {
        Self {
            id: InvocationId::new(),
            principal,
            node,
            args,
            cursor: 0,
            settings,
        }
    }

    /// Read the token at `index` (default: the cursor)
    ///
    /// A default-index read advances the cursor whether or not a token is
    /// present. An explicit index leaves the cursor alone.
    ///
    /// # Errors
    ///
    /// Aborts with the `no_permission` message when a token exists at the slot,
    /// `permission` is given and the principal lacks it. An absent token never
    /// triggers the permission check.
    pub fn read(
        &mut self,
        index: Option<usize>,
        permission: Option<&str>,
    ) -> CommandResult<Option<String>> {
        let index = match index {
            Some(index) => index,
            None => {
                let current = self.cursor;
                self.cursor += 1;
                current
            }
        };

        let Some(token) = self.args.get(index) else {
            return Ok(None);
        };

        if let Some(permission) = permission {
            if !self.principal.has_permission(permission) {
                return Err(fail(self.settings.messages.no_permission.clone()));
            }
        }

        Ok(Some(token.clone()))
    }

    /// Token at `index` without moving the cursor or checking permissions
    pub fn peek(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Start a typed argument read
    pub fn arg(&mut self) -> ArgRequest<'_> {
        ArgRequest::new(self)
    }

    /// Next default read index; may exceed `len()`
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn skip_to_end(&mut self) {
        self.cursor = self.cursor.max(self.args.len());
    }

    /// All tokens for this level
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Number of tokens for this level
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Whether no tokens were given
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Correlation id of this invocation
    pub fn id(&self) -> &InvocationId {
        &self.id
    }

    /// The invoking principal
    pub fn principal(&self) -> &dyn Principal {
        self.principal.as_ref()
    }

    /// Shared handle to the invoking principal
    pub fn principal_arc(&self) -> Arc<dyn Principal> {
        Arc::clone(&self.principal)
    }

    /// The resolved terminal node
    pub fn node(&self) -> &Arc<CommandNode> {
        &self.node
    }

    /// Dispatch settings in effect
    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    /// Message catalog in effect
    pub fn messages(&self) -> &Messages {
        &self.settings.messages
    }

    /// Usage line of the terminal node
    pub fn usage(&self) -> String {
        self.node.usage_message(&self.settings.messages)
    }

    /// Send one line to the invoking principal
    pub fn reply(&self, message: impl AsRef<str>) {
        self.principal.send_message(message.as_ref());
    }
}

impl std::fmt::Debug for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invocation")
            .field("id", &self.id)
            .field("principal", &self.principal.name())
            .field("command", &self.node.qualified_name())
            .field("args", &self.args)
            .field("cursor", &self.cursor)
            .finish()
    }
}
