//! Bounded most-recent-first history store
//!
//! Training level and progress are pure functions of the entry count; the
//! store keeps no other state.

use std::collections::VecDeque;

use tracing::debug;

use sentinel_engine::Layout;

use crate::entry::HistoryEntry;

/// Default store capacity (K)
pub const MAX_HISTORY_SIZE: usize = 50;

/// Layouts handed to the estimator by default
pub const DEFAULT_RECENT_PATTERNS: usize = 3;

/// Entries per training level
const ENTRIES_PER_LEVEL: usize = 5;

const MAX_TRAINING_LEVEL: u32 = 10;

/// Entry count at which training progress reaches 100%
const PROGRESS_SATURATION: usize = 50;

/// Confirmed layouts, newest first, never more than `capacity`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryStore {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl HistoryStore {
    /// Empty store with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY_SIZE)
    }

    /// Empty store holding at most `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        HistoryStore {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Store seeded from previously persisted entries (newest first).
    /// Entries beyond `capacity` are dropped from the old end.
    pub fn from_entries(entries: Vec<HistoryEntry>, capacity: usize) -> Self {
        let mut entries = VecDeque::from(entries);
        entries.truncate(capacity);
        HistoryStore { entries, capacity }
    }

    /// Record a confirmed layout as the newest entry, evicting the oldest
    /// entry when full.
    pub fn record(&mut self, layout: Layout, mine_count: usize) -> HistoryEntry {
        let mut entry = HistoryEntry::new(layout, mine_count);
        while self.entries.iter().any(|e| e.id() == entry.id()) {
            entry = HistoryEntry::new(entry.layout().clone(), mine_count);
        }
        self.entries.push_front(entry.clone());
        self.entries.truncate(self.capacity);
        debug!(id = entry.id(), total = self.entries.len(), "recorded layout");
        entry
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Up to `count` most recent layouts, newest first
    pub fn recent_patterns(&self, count: usize) -> Vec<Layout> {
        self.entries
            .iter()
            .take(count)
            .map(|e| e.layout().clone())
            .collect()
    }

    /// `min(len / 5, 10)`
    pub fn training_level(&self) -> u32 {
        ((self.entries.len() / ENTRIES_PER_LEVEL) as u32).min(MAX_TRAINING_LEVEL)
    }

    /// `min(len / 50 × 100, 100)`
    pub fn training_progress(&self) -> f64 {
        (self.entries.len() as f64 / PROGRESS_SATURATION as f64 * 100.0).min(100.0)
    }

    pub fn total_entries(&self) -> usize {
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries, newest first
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Owned copy of the entries, newest first, for persistence
    pub fn to_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_engine::GRID_CELLS;

    fn layout_for(i: usize) -> Layout {
        Layout::new([i % GRID_CELLS, (i + 1) % GRID_CELLS, (i + 2) % GRID_CELLS], 3, GRID_CELLS)
            .unwrap()
    }

    fn filled(n: usize) -> HistoryStore {
        let mut store = HistoryStore::new();
        for i in 0..n {
            store.record(layout_for(i), 3);
        }
        store
    }

    #[test]
    fn test_record_prepends() {
        let mut store = HistoryStore::new();
        store.record(layout_for(0), 3);
        let newest = store.record(layout_for(5), 3);
        assert_eq!(store.len(), 2);
        assert_eq!(store.entries().next().unwrap(), &newest);
        assert_eq!(store.recent_patterns(1), vec![layout_for(5)]);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut store = HistoryStore::with_capacity(10);
        let mut ids = Vec::new();
        for i in 0..15 {
            ids.push(store.record(layout_for(i), 3).id().to_string());
        }
        assert_eq!(store.len(), 10);
        let kept: Vec<&str> = store.entries().map(|e| e.id()).collect();
        let expected: Vec<&str> = ids.iter().rev().take(10).map(String::as_str).collect();
        assert_eq!(kept, expected);
    }

    #[test]
    fn test_default_capacity_holds_fifty() {
        assert_eq!(HistoryStore::new().capacity(), MAX_HISTORY_SIZE);
        let store = filled(55);
        assert_eq!(store.len(), MAX_HISTORY_SIZE);
        // newest recorded layout (i = 54) is first
        assert_eq!(store.recent_patterns(1), vec![layout_for(54)]);
    }

    #[test]
    fn test_recent_patterns_fewer_than_requested() {
        let store = filled(2);
        let recent = store.recent_patterns(DEFAULT_RECENT_PATTERNS);
        assert_eq!(recent, vec![layout_for(1), layout_for(0)]);
    }

    #[test]
    fn test_training_level() {
        assert_eq!(filled(0).training_level(), 0);
        assert_eq!(filled(4).training_level(), 0);
        assert_eq!(filled(5).training_level(), 1);
        assert_eq!(filled(27).training_level(), 5);
        assert_eq!(filled(50).training_level(), 10);

        let mut store = HistoryStore::with_capacity(80);
        let mut last = 0;
        for i in 0..80 {
            store.record(layout_for(i), 3);
            let level = store.training_level();
            assert!(level >= last && level <= 10);
            last = level;
        }
    }

    #[test]
    fn test_training_progress() {
        assert_eq!(filled(0).training_progress(), 0.0);
        assert!((filled(10).training_progress() - 20.0).abs() < 1e-9);
        assert!((filled(50).training_progress() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_clear() {
        let mut store = filled(7);
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.training_level(), 0);
        assert!(store.recent_patterns(3).is_empty());
    }

    #[test]
    fn test_from_entries_truncates() {
        let entries = filled(8).to_vec();
        let store = HistoryStore::from_entries(entries.clone(), 5);
        assert_eq!(store.capacity(), 5);
        assert_eq!(store.len(), 5);
        assert_eq!(store.to_vec(), entries[..5].to_vec());
    }
}
