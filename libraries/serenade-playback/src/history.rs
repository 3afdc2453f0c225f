//! Shuffle history tracking
//!
//! Records the indices the controller moved away from, most recent last.
//! Shuffle consults it to avoid repeats within a cycle and "previous" pops
//! it to undo shuffle jumps.

use std::collections::VecDeque;

/// Bounded history of playlist indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    /// History buffer (most recent = back)
    indices: VecDeque<usize>,

    /// Maximum history size
    max_size: usize,
}

impl History {
    /// Create new history with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            indices: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Record an index
    ///
    /// If history is full, oldest entry is discarded
    pub fn push(&mut self, index: usize) {
        if self.max_size == 0 {
            return;
        }
        if self.indices.len() >= self.max_size {
            self.indices.pop_front();
        }
        self.indices.push_back(index);
    }

    /// Most recent entry (without removing)
    pub fn peek(&self) -> Option<usize> {
        self.indices.back().copied()
    }

    /// Pop most recent entry
    pub fn pop(&mut self) -> Option<usize> {
        self.indices.pop_back()
    }

    /// Whether `index` was already played in this cycle
    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// All entries (oldest first)
    pub fn to_vec(&self) -> Vec<usize> {
        self.indices.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    /// Drop every entry that no longer indexes a playlist of `len` tracks
    pub fn retain_below(&mut self, len: usize) {
        self.indices.retain(|&index| index < len);
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Set maximum history size
    ///
    /// If new size is smaller than current, oldest entries are discarded
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;

        while self.indices.len() > max_size {
            self.indices.pop_front();
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_history() {
        let history = History::new(10);
        assert_eq!(history.max_size(), 10);
        assert_eq!(history.len(), 0);
        assert!(history.is_empty());
    }

    #[test]
    fn pop_returns_most_recent_first() {
        let mut history = History::new(10);
        history.push(1);
        history.push(2);
        history.push(3);

        assert_eq!(history.peek(), Some(3));
        assert_eq!(history.pop(), Some(3));
        assert_eq!(history.pop(), Some(2));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn history_bounded() {
        let mut history = History::new(3);
        for index in 1..=4 {
            history.push(index);
        }

        // Oldest (1) discarded
        assert_eq!(history.to_vec(), vec![2, 3, 4]);
    }

    #[test]
    fn zero_capacity_records_nothing() {
        let mut history = History::new(0);
        history.push(7);
        assert!(history.is_empty());
    }

    #[test]
    fn retain_below_drops_stale_indices() {
        let mut history = History::new(10);
        for index in [0, 4, 2, 5, 1] {
            history.push(index);
        }

        history.retain_below(3);
        assert_eq!(history.to_vec(), vec![0, 2, 1]);
    }

    #[test]
    fn shrinking_max_size_trims_oldest() {
        let mut history = History::new(5);
        for index in 1..=5 {
            history.push(index);
        }

        history.set_max_size(3);
        assert_eq!(history.max_size(), 3);
        assert_eq!(history.to_vec(), vec![3, 4, 5]);
    }

    #[test]
    fn contains_and_clear() {
        let mut history = History::default();
        history.push(2);
        assert!(history.contains(2));
        assert!(!history.contains(3));

        history.clear();
        assert!(!history.contains(2));
        assert_eq!(history.max_size(), 50);
    }
}
