//! Bounded conversation history — the last [`HISTORY_CAPACITY`] user messages.
//!
//! FIFO: once full, the oldest message is dropped before the newest is kept.
//! There is no explicit clear; the buffer lives as long as the bot.

use std::collections::VecDeque;

/// Number of user messages retained.
pub const HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    capacity: usize,
    messages: VecDeque<String>,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// A zero capacity is raised to one so `append` always keeps the newest.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { capacity, messages: VecDeque::with_capacity(capacity + 1) }
    }

    /// Add `message` as the newest entry, evicting the oldest on overflow.
    pub fn append(&mut self, message: impl Into<String>) {
        self.messages.push_back(message.into());
        if self.messages.len() > self.capacity {
            self.messages.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest → newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> + '_ {
        self.messages.iter().map(String::as_str)
    }

    /// Owned copy, oldest → newest. Taken under the bot's lock so request
    /// building can run after the lock is released.
    pub fn snapshot(&self) -> Vec<String> {
        self.messages.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let h = HistoryBuffer::new();
        assert!(h.is_empty());
        assert_eq!(h.capacity(), HISTORY_CAPACITY);
    }

    #[test]
    fn eleventh_append_evicts_first() {
        let mut h = HistoryBuffer::new();
        for i in 1..=11 {
            h.append(format!("m{i}"));
        }
        assert_eq!(h.len(), 10);
        let expected: Vec<String> = (2..=11).map(|i| format!("m{i}")).collect();
        assert_eq!(h.snapshot(), expected);
        assert!(!h.iter().any(|m| m == "m1"));
    }

    #[test]
    fn length_never_exceeds_capacity() {
        let mut h = HistoryBuffer::with_capacity(3);
        for i in 0..50 {
            h.append(i.to_string());
            assert!(h.len() <= 3);
        }
        assert_eq!(h.snapshot(), vec!["47", "48", "49"]);
    }

    #[test]
    fn duplicates_are_kept() {
        let mut h = HistoryBuffer::new();
        h.append("same");
        h.append("same");
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn zero_capacity_keeps_newest() {
        let mut h = HistoryBuffer::with_capacity(0);
        h.append("a");
        h.append("b");
        assert_eq!(h.snapshot(), vec!["b"]);
    }

    #[test]
    fn iter_reverses_newest_first() {
        let mut h = HistoryBuffer::new();
        h.append("old");
        h.append("new");
        assert_eq!(h.iter().rev().collect::<Vec<_>>(), vec!["new", "old"]);
    }
}
