//! Correlation types for invocation tracking
//!
//! Every terminal dispatch gets an `InvocationId` so that the start, end and
//! fault events of one invocation can be joined in the logs, including events
//! emitted later from an asynchronously scheduled handler.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single command invocation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvocationId(String);

impl InvocationId {
    /// Generate a new InvocationId using UUIDv7 (time-ordered)
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for InvocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InvocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_id_generation() {
        let id1 = InvocationId::new();
        let id2 = InvocationId::new();

        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
    }

    #[test]
    fn test_invocation_id_display() {
        let id = InvocationId::new();
        assert_eq!(format!("{}", id), id.as_str());
    }

    #[test]
    fn test_invocation_ids_are_time_ordered() {
        let earlier = InvocationId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let later = InvocationId::new();
        assert!(earlier.as_str() < later.as_str());
    }

    #[test]
    fn test_serialization() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            id: InvocationId,
        }

        let wrapper = Wrapper {
            id: InvocationId::from_string("inv-1".to_string()),
        };
        let text = toml::to_string(&wrapper).unwrap();
        assert_eq!(text.trim(), "id = \"inv-1\"");

        let back: Wrapper = toml::from_str(&text).unwrap();
        assert_eq!(back.id, wrapper.id);
    }
}
