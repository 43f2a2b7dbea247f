//! Bounded generation history.

use std::collections::VecDeque;

use crate::io::Snapshot;

/// Default maximum number of retained generations.
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Ordered, bounded list of snapshots with a cursor pointing at the generation
/// currently being viewed.
///
/// When the history is non-empty the cursor is always a valid index. Pushing
/// past capacity evicts from the front (oldest first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    snapshots: VecDeque<Snapshot>,
    capacity: usize,
    cursor: usize,
}
impl Default for History {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl History {
    /// Creates an empty history that retains at most `capacity` snapshots.
    /// A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            snapshots: VecDeque::with_capacity(capacity),
            capacity,
            cursor: 0,
        }
    }

    /// Replaces the whole history with a single snapshot.
    pub fn reset(&mut self, snapshot: Snapshot) {
        self.snapshots.clear();
        self.snapshots.push_back(snapshot);
        self.cursor = 0;
    }

    /// Appends a snapshot, evicting the oldest ones beyond capacity, and moves
    /// the cursor to it. Returns the number of evicted snapshots.
    pub fn push(&mut self, snapshot: Snapshot) -> usize {
        self.snapshots.push_back(snapshot);
        let evicted = self.evict();
        self.cursor = self.snapshots.len() - 1;
        evicted
    }

    /// Discards every snapshot after the cursor.
    pub fn truncate_after_cursor(&mut self) {
        self.snapshots.truncate(self.cursor + 1);
    }

    /// Returns the snapshot at `index`, or `None` if it is out of range.
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }
    /// Returns the snapshot at the cursor.
    pub fn current(&self) -> Option<&Snapshot> {
        self.snapshots.get(self.cursor)
    }
    /// Returns the most recent snapshot.
    pub fn newest(&self) -> Option<&Snapshot> {
        self.snapshots.back()
    }
    /// Returns an iterator over all retained snapshots, oldest first.
    pub fn iter(&self) -> impl '_ + DoubleEndedIterator<Item = &Snapshot> {
        self.snapshots.iter()
    }

    /// Returns the number of retained snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }
    /// Returns whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Returns the cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
    /// Moves the cursor, clamping it to the retained range, and returns the
    /// new position.
    pub fn set_cursor(&mut self, index: usize) -> usize {
        self.cursor = index.min(self.snapshots.len().saturating_sub(1));
        self.cursor
    }
    /// Returns whether the cursor is at the most recent snapshot.
    pub fn is_at_newest(&self) -> bool {
        self.cursor + 1 >= self.snapshots.len()
    }

    /// Returns the maximum number of retained snapshots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    /// Sets the maximum number of retained snapshots, evicting the oldest
    /// immediately if necessary. The cursor keeps pointing at the same
    /// generation if it is still retained, or at the oldest one otherwise.
    /// Returns the number of evicted snapshots.
    pub fn set_capacity(&mut self, capacity: usize) -> usize {
        self.capacity = capacity.max(1);
        let evicted = self.evict();
        self.cursor = self.cursor.saturating_sub(evicted);
        evicted
    }

    fn evict(&mut self) -> usize {
        let excess = self.snapshots.len().saturating_sub(self.capacity);
        self.snapshots.drain(..excess);
        excess
    }
}
