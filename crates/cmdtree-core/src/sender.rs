//! Sender restrictions
//!
//! A closed set of strategies, each pairing a capability predicate, a
//! rejection message and the factory that builds the invocation context.

use std::sync::Arc;

use crate::invocation::Invocation;
use crate::messages::{DispatchSettings, Messages};
use crate::node::CommandNode;
use crate::principal::{Principal, PrincipalKind};

/// Which principals may run a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SenderRestriction {
    /// Players and the console
    #[default]
    Any,
    /// Players only
    PlayerOnly,
    /// The console only
    ConsoleOnly,
}

impl SenderRestriction {
    /// Capability predicate
    pub fn accepts(&self, principal: &dyn Principal) -> bool {
        match self {
            SenderRestriction::Any => true,
            SenderRestriction::PlayerOnly => principal.kind() == PrincipalKind::Player,
            SenderRestriction::ConsoleOnly => principal.kind() == PrincipalKind::Console,
        }
    }

    /// Message sent when `accepts` fails
    pub fn rejection_message<'m>(&self, messages: &'m Messages) -> &'m str {
        match self {
            SenderRestriction::Any => &messages.internal_error,
            SenderRestriction::PlayerOnly => &messages.player_only,
            SenderRestriction::ConsoleOnly => &messages.console_only,
        }
    }

    /// Build a fresh invocation context for `node`
    pub fn context(
        &self,
        principal: Arc<dyn Principal>,
        node: Arc<CommandNode>,
        args: Vec<String>,
        settings: Arc<DispatchSettings>,
    ) -> Invocation {
        Invocation::new(principal, node, args, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(PrincipalKind);

    impl Principal for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }
        fn kind(&self) -> PrincipalKind {
            self.0
        }
        fn has_permission(&self, _permission: &str) -> bool {
            true
        }
        fn send_message(&self, _message: &str) {}
    }

    #[test]
    fn test_predicates() {
        let player = Fixed(PrincipalKind::Player);
        let console = Fixed(PrincipalKind::Console);

        assert!(SenderRestriction::Any.accepts(&player));
        assert!(SenderRestriction::Any.accepts(&console));
        assert!(SenderRestriction::PlayerOnly.accepts(&player));
        assert!(!SenderRestriction::PlayerOnly.accepts(&console));
        assert!(SenderRestriction::ConsoleOnly.accepts(&console));
        assert!(!SenderRestriction::ConsoleOnly.accepts(&player));
    }

    #[test]
    fn test_rejection_messages_come_from_catalog() {
        let messages = Messages::default();
        assert_eq!(
            SenderRestriction::PlayerOnly.rejection_message(&messages),
            messages.player_only
        );
        assert_eq!(
            SenderRestriction::ConsoleOnly.rejection_message(&messages),
            messages.console_only
        );
    }
}
