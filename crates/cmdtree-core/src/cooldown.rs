//! Per-principal cooldown timestamps
//!
//! Written from the dispatch thread and purged from a background sweep, so
//! the table is a concurrent map. Each principal only needs to observe its
//! own latest timestamp.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::errors::{fail, CommandResult, Result};
use crate::invocation::Invocation;
use crate::messages::render;
use crate::scope::HandlerScope;

/// Last-use timestamps keyed by principal name
#[derive(Clone, Default)]
pub struct CooldownTable {
    entries: Arc<DashMap<String, Instant>>,
}

impl CooldownTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Err(remaining)` while `principal` is still cooling down
    pub fn check(&self, principal: &str, cooldown: Duration) -> std::result::Result<(), Duration> {
        self.check_at(principal, cooldown, Instant::now())
    }

    fn check_at(
        &self,
        principal: &str,
        cooldown: Duration,
        now: Instant,
    ) -> std::result::Result<(), Duration> {
        match self.entries.get(principal) {
            Some(last) => {
                let elapsed = now.saturating_duration_since(*last);
                if elapsed < cooldown {
                    Err(cooldown - elapsed)
                } else {
                    Ok(())
                }
            }
            None => Ok(()),
        }
    }

    /// Record a use by `principal` now
    pub fn touch(&self, principal: &str) {
        self.entries.insert(principal.to_string(), Instant::now());
    }

    /// Record a use now unless `principal` is still cooling down
    ///
    /// The check and the update happen under one map entry lock, so two
    /// concurrent callers for the same principal cannot both succeed.
    pub fn try_acquire(&self, principal: &str, cooldown: Duration) -> std::result::Result<(), Duration> {
        self.try_acquire_at(principal, cooldown, Instant::now())
    }

    fn try_acquire_at(
        &self,
        principal: &str,
        cooldown: Duration,
        now: Instant,
    ) -> std::result::Result<(), Duration> {
        match self.entries.entry(principal.to_string()) {
            Entry::Occupied(mut entry) => {
                let elapsed = now.saturating_duration_since(*entry.get());
                if elapsed < cooldown {
                    return Err(cooldown - elapsed);
                }
                entry.insert(now);
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
            }
        }
        Ok(())
    }

    /// Abort while cooling down, otherwise record the use
    ///
    /// # Errors
    ///
    /// Aborts with the `cooldown` message, remaining seconds rounded up.
    pub fn enforce(&self, inv: &Invocation, cooldown: Duration) -> CommandResult<()> {
        self.try_acquire(inv.principal().name(), cooldown)
            .map_err(|remaining| {
                let seconds = remaining_seconds(remaining).to_string();
                fail(render(
                    &inv.messages().cooldown,
                    &[("seconds", seconds.as_str())],
                ))
            })
    }

    /// Remove entries older than `max_age`; returns how many were removed
    pub fn purge(&self, max_age: Duration) -> usize {
        let before = self.entries.len();
        let now = Instant::now();
        self.entries
            .retain(|_, last| now.saturating_duration_since(*last) < max_age);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Purge every `every` on the scope until it shuts down
    ///
    /// # Errors
    ///
    /// Returns `ScopeClosed` when the scope is already shut down.
    pub fn spawn_sweeper(&self, scope: &HandlerScope, every: Duration, max_age: Duration) -> Result<()> {
        let table = self.clone();
        scope.spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = table.purge(max_age);
                if removed > 0 {
                    tracing::debug!(
                        component = module_path!(),
                        removed = removed,
                        "cooldown entries purged"
                    );
                }
            }
        })
    }
}

impl std::fmt::Debug for CooldownTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CooldownTable")
            .field("entries", &self.entries.len())
            .finish()
    }
}

fn remaining_seconds(remaining: Duration) -> u64 {
    let secs = remaining.as_secs();
    if remaining.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_reports_remaining() {
        let table = CooldownTable::new();
        assert!(table.check("alice", Duration::from_secs(10)).is_ok());

        table.touch("alice");
        let remaining = table.check("alice", Duration::from_secs(10)).unwrap_err();
        assert!(remaining <= Duration::from_secs(10));
        assert!(remaining > Duration::from_secs(9));

        assert!(table.check("bob", Duration::from_secs(10)).is_ok());
    }

    #[test]
    fn test_check_after_expiry() {
        let table = CooldownTable::new();
        table.touch("alice");
        let later = Instant::now() + Duration::from_secs(11);
        assert!(table
            .check_at("alice", Duration::from_secs(10), later)
            .is_ok());
    }

    #[test]
    fn test_remaining_seconds_round_up() {
        assert_eq!(remaining_seconds(Duration::from_millis(1)), 1);
        assert_eq!(remaining_seconds(Duration::from_secs(3)), 3);
        assert_eq!(remaining_seconds(Duration::from_millis(2500)), 3);
    }

    #[test]
    fn test_purge_removes_stale() {
        let table = CooldownTable::new();
        table.touch("alice");
        table.touch("bob");
        assert_eq!(table.purge(Duration::from_secs(60)), 0);
        assert_eq!(table.purge(Duration::ZERO), 2);
        assert!(table.is_empty());
    }

    #[test]
    fn test_try_acquire_records_use() {
        let table = CooldownTable::new();
        let start = Instant::now();
        assert!(table.try_acquire_at("alice", Duration::from_secs(10), start).is_ok());

        let blocked = table.try_acquire_at("alice", Duration::from_secs(10), start + Duration::from_secs(4));
        assert_eq!(blocked, Err(Duration::from_secs(6)));

        let later = start + Duration::from_secs(10);
        assert!(table.try_acquire_at("alice", Duration::from_secs(10), later).is_ok());
        assert_eq!(
            table.try_acquire_at("alice", Duration::from_secs(10), later + Duration::from_secs(1)),
            Err(Duration::from_secs(9))
        );
    }

    #[test]
    fn test_concurrent_acquire_admits_one_caller() {
        let table = &CooldownTable::new();
        let barrier = &std::sync::Barrier::new(8);

        let admitted: usize = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    s.spawn(move || {
                        barrier.wait();
                        table.try_acquire("alice", Duration::from_secs(30)).is_ok()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| usize::from(h.join().unwrap()))
                .sum()
        });

        assert_eq!(admitted, 1);
    }
}
