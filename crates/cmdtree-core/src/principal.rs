//! The invoking actor, supplied by the host runtime.

use std::fmt;

/// Broad category of an invoking principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrincipalKind {
    /// A connected player
    Player,
    /// The server console (or an equivalent operator channel)
    Console,
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrincipalKind::Player => write!(f, "player"),
            PrincipalKind::Console => write!(f, "console"),
        }
    }
}

/// Capability surface the engine needs from an invoking principal
///
/// Implemented by the host runtime. Implementations must be cheap to query
/// since permission checks run on every dispatch.
pub trait Principal: Send + Sync {
    /// Display name, also used as the identity in logs and cooldown tables
    fn name(&self) -> &str;

    /// Player or console
    fn kind(&self) -> PrincipalKind;

    /// Whether the principal holds permission `permission`
    fn has_permission(&self, permission: &str) -> bool;

    /// Deliver one line of output to the principal
    fn send_message(&self, message: &str);

    /// Privileged principals may see fault details after the generic message
    fn is_privileged(&self) -> bool {
        self.kind() == PrincipalKind::Console
    }
}
