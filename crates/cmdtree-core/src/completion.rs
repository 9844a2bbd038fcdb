//! Completion providers
//!
//! A provider turns an invocation context and the in-progress token into an
//! ordered list of suggestions. Results are recomputed on every call.

use std::fmt;

use crate::args::Lookup;
use crate::invocation::Invocation;

/// Source of completion suggestions for one node
pub trait CompletionProvider: Send + Sync {
    fn complete(&self, inv: &Invocation, current: &str) -> Vec<String>;
}

/// Candidates that start with `current`, case-insensitive, in input order
pub fn filter_prefix<'a, I>(candidates: I, current: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix = current.to_lowercase();
    candidates
        .into_iter()
        .filter(|c| c.to_lowercase().starts_with(&prefix))
        .map(str::to_string)
        .collect()
}

/// Always suggests nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCompletion;

impl CompletionProvider for EmptyCompletion {
    fn complete(&self, _inv: &Invocation, _current: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Prefix filter over a fixed candidate set
#[derive(Debug, Clone, Default)]
pub struct PrefixCompletion {
    candidates: Vec<String>,
}

impl PrefixCompletion {
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    /// Sort candidates case-insensitively
    pub fn sorted(mut self) -> Self {
        self.candidates.sort_by_key(|c| c.to_lowercase());
        self
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }
}

impl CompletionProvider for PrefixCompletion {
    fn complete(&self, _inv: &Invocation, current: &str) -> Vec<String> {
        filter_prefix(self.candidates.iter().map(String::as_str), current)
    }
}

/// Suggests the names and aliases of children the principal may see
#[derive(Debug, Clone, Copy, Default)]
pub struct ChildCompletion;

impl CompletionProvider for ChildCompletion {
    fn complete(&self, inv: &Invocation, current: &str) -> Vec<String> {
        let principal = inv.principal();
        let labels = inv
            .node()
            .children()
            .iter()
            .filter(|child| child.is_visible_to(principal))
            .flat_map(|child| child.labels());
        let mut suggestions = filter_prefix(labels, current);
        dedup_in_order(&mut suggestions);
        suggestions
    }
}

/// Child-name suggestions, falling back to another provider when none match
#[derive(Debug, Clone, Default)]
pub struct ChildrenOr<P> {
    fallback: P,
}

impl<P> ChildrenOr<P> {
    pub fn new(fallback: P) -> Self {
        Self { fallback }
    }
}

impl<P: CompletionProvider> CompletionProvider for ChildrenOr<P> {
    fn complete(&self, inv: &Invocation, current: &str) -> Vec<String> {
        let children = ChildCompletion.complete(inv, current);
        if children.is_empty() {
            self.fallback.complete(inv, current)
        } else {
            children
        }
    }
}

/// Concatenation of two providers, first provider's results first
#[derive(Debug, Clone, Default)]
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<A: CompletionProvider, B: CompletionProvider> CompletionProvider for Chain<A, B> {
    fn complete(&self, inv: &Invocation, current: &str) -> Vec<String> {
        let mut suggestions = self.first.complete(inv, current);
        suggestions.extend(self.second.complete(inv, current));
        suggestions
    }
}

/// Suggests the candidates of a [`Lookup`]
#[derive(Debug, Clone, Default)]
pub struct LookupCompletion<L> {
    lookup: L,
}

impl<L> LookupCompletion<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }
}

impl<L: Lookup + Send + Sync> CompletionProvider for LookupCompletion<L> {
    fn complete(&self, _inv: &Invocation, current: &str) -> Vec<String> {
        let candidates = self.lookup.candidates();
        filter_prefix(candidates.iter().map(String::as_str), current)
    }
}

/// Provider backed by a closure
pub struct FnCompletion<F> {
    f: F,
}

impl<F> FnCompletion<F>
where
    F: Fn(&Invocation, &str) -> Vec<String> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> CompletionProvider for FnCompletion<F>
where
    F: Fn(&Invocation, &str) -> Vec<String> + Send + Sync,
{
    fn complete(&self, inv: &Invocation, current: &str) -> Vec<String> {
        (self.f)(inv, current)
    }
}

impl<F> fmt::Debug for FnCompletion<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnCompletion")
    }
}

/// Combinators for providers
pub trait CompletionExt: CompletionProvider + Sized {
    /// Append another provider's suggestions after this one's
    fn then<B: CompletionProvider>(self, second: B) -> Chain<Self, B> {
        Chain {
            first: self,
            second,
        }
    }
}

impl<P: CompletionProvider> CompletionExt for P {}

fn dedup_in_order(values: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    values.retain(|v| seen.insert(v.clone()));
}
