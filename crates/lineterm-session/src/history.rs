//! Bounded history of submitted chat input.

use std::collections::VecDeque;

/// Default number of entries kept.
pub const HISTORY_CAPACITY: usize = 100;

/// Most recent submitted inputs, oldest evicted first.
#[derive(Debug, Clone)]
pub struct InputHistory {
    entries: VecDeque<String>,
    capacity: usize,
}

impl Default for InputHistory {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl InputHistory {
    /// Empty history holding at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: VecDeque::with_capacity(capacity), capacity }
    }

    /// Append an entry, evicting the oldest one when full.
    pub fn push(&mut self, entry: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry.into());
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Most recent entry.
    pub fn latest(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }
}
