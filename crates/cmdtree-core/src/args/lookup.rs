//! Domain lookups
//!
//! Lookups resolve a token against host state (online players, worlds,
//! materials, ...). The engine only knows the contract; hosts implement
//! [`Lookup`] for their own sources.

use crate::messages::{render, Messages};

/// Resolves a token to a domain value
pub trait Lookup {
    /// Resolved value
    type Output;

    /// Name used for the `{type}` placeholder
    fn kind(&self) -> &str;

    /// Resolve one token; `None` means not found
    fn lookup(&self, raw: &str) -> Option<Self::Output>;

    /// Message for a token that did not resolve
    fn invalid_message(&self, raw: &str, messages: &Messages) -> String {
        render(&messages.invalid_value, &[("arg", raw), ("type", self.kind())])
    }

    /// Candidate spellings for tab completion
    fn candidates(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Case-insensitive lookup over a fixed table of names
///
/// ```
/// use cmdtree_core::args::{EnumLookup, Lookup};
///
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// enum Mode { Survival, Creative }
///
/// let modes = EnumLookup::new("game mode")
///     .entry(&["survival", "s", "0"], Mode::Survival)
///     .entry(&["creative", "c", "1"], Mode::Creative);
///
/// assert_eq!(modes.lookup("C"), Some(Mode::Creative));
/// assert_eq!(modes.lookup("hardcore"), None);
/// ```
#[derive(Debug, Clone)]
pub struct EnumLookup<T> {
    kind: String,
    entries: Vec<(Vec<String>, T)>,
}

impl<T: Clone> EnumLookup<T> {
    /// Create an empty table
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            entries: Vec::new(),
        }
    }

    /// Add a value with its spellings; the first spelling is the display name
    pub fn entry(mut self, names: &[&str], value: T) -> Self {
        let names = names.iter().map(|n| n.to_lowercase()).collect();
        self.entries.push((names, value));
        self
    }
}

impl<T: Clone> Lookup for EnumLookup<T> {
    type Output = T;

    fn kind(&self) -> &str {
        &self.kind
    }

    fn lookup(&self, raw: &str) -> Option<T> {
        let raw = raw.to_lowercase();
        self.entries
            .iter()
            .find(|(names, _)| names.iter().any(|n| *n == raw))
            .map(|(_, value)| value.clone())
    }

    fn candidates(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|(names, _)| names.first().cloned())
            .collect()
    }
}

/// Lookup backed by a closure
pub struct FnLookup<F> {
    kind: String,
    resolve: F,
}

/// Build a lookup from a closure
pub fn fn_lookup<T, F>(kind: impl Into<String>, resolve: F) -> FnLookup<F>
where
    F: Fn(&str) -> Option<T>,
{
    FnLookup {
        kind: kind.into(),
        resolve,
    }
}

impl<T, F> Lookup for FnLookup<F>
where
    F: Fn(&str) -> Option<T>,
{
    type Output = T;

    fn kind(&self) -> &str {
        &self.kind
    }

    fn lookup(&self, raw: &str) -> Option<T> {
        (self.resolve)(raw)
    }
}
