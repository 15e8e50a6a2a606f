//! Bounded undo history shared by the closed and twisted maps.

use std::collections::VecDeque;

/// Maximum number of snapshots kept per map.
pub const HISTORY_CAP: usize = 20;

/// LIFO of `(snapshot, iteration counter)`; the oldest entry is dropped once
/// the cap is exceeded.
#[derive(Clone, Debug)]
pub struct History<T> {
    entries: VecDeque<(T, u64)>,
    cap: usize,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::with_cap(HISTORY_CAP)
    }
}

impl<T> History<T> {
    pub fn with_cap(cap: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(cap + 1),
            cap,
        }
    }

    pub fn push(&mut self, state: T, iterations: u64) {
        self.entries.push_back((state, iterations));
        while self.entries.len() > self.cap {
            self.entries.pop_front();
        }
    }

    pub fn pop(&mut self) -> Option<(T, u64)> {
        self.entries.pop_back()
    }

    /// Most recent entry.
    pub fn peek(&self) -> Option<&(T, u64)> {
        self.entries.back()
    }

    /// Oldest surviving entry.
    pub fn oldest(&self) -> Option<&(T, u64)> {
        self.entries.front()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
