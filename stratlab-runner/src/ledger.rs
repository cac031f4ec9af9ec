//! History ledger — bounded, newest-first record of backtest results.
//!
//! The only shared mutable state in the engine. A single `RwLock` guards the
//! insert-and-trim sequence, so concurrent `record` calls never interleave and
//! readers never observe more than `capacity` entries. `list` copies a snapshot
//! out under the read lock; the backing deque is never exposed.
//!
//! Lives in memory only: nothing survives a restart.

use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use stratlab_core::BacktestResult;

/// Default number of results kept.
pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug)]
pub struct HistoryLedger {
    entries: RwLock<VecDeque<BacktestResult>>,
    capacity: usize,
}

impl Default for HistoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Ledger holding at most `capacity` results (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity + 1)),
            capacity,
        }
    }

    /// Prepend a result, evicting the oldest entries beyond capacity.
    ///
    /// Returns the number of entries evicted (0 or 1 in steady state).
    pub fn record(&self, result: BacktestResult) -> usize {
        let mut entries = self.write();
        entries.push_front(result);

        let evicted = entries.len().saturating_sub(self.capacity);
        entries.truncate(self.capacity);
        drop(entries);

        if evicted > 0 {
            tracing::debug!(evicted, capacity = self.capacity, "ledger evicted oldest results");
        }
        evicted
    }

    /// Up to `limit` most recent results, newest first. `limit == 0` yields nothing.
    pub fn list(&self, limit: usize) -> Vec<BacktestResult> {
        self.read().iter().take(limit).cloned().collect()
    }

    /// Most recently recorded result.
    pub fn latest(&self) -> Option<BacktestResult> {
        self.read().front().cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // The deque is consistent after every statement of `record`, so a panic
    // elsewhere while holding the lock cannot leave it half-updated.
    fn read(&self) -> RwLockReadGuard<'_, VecDeque<BacktestResult>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, VecDeque<BacktestResult>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
