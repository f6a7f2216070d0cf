//! History store bound to a persistence provider
//!
//! A failed load never blocks estimation: the store starts empty and the
//! failure is reported back as [`LoadOutcome::Recovered`].

use tracing::{info, warn};

use sentinel_engine::Layout;

use crate::entry::HistoryEntry;
use crate::error::HistoryError;
use crate::provider::HistoryProvider;
use crate::store::HistoryStore;

/// How the persisted history was obtained on open
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Entries were read back
    Loaded(usize),
    /// Nothing was persisted yet
    Empty,
    /// Persisted data was unreadable; started empty
    Recovered(String),
}

/// A [`HistoryStore`] that writes through to a [`HistoryProvider`].
pub struct PersistentHistory<P: HistoryProvider> {
    store: HistoryStore,
    provider: P,
}

impl<P: HistoryProvider> PersistentHistory<P> {
    /// Load history from `provider`, tolerating corrupt data.
    pub fn open(provider: P, capacity: usize) -> (Self, LoadOutcome) {
        let (store, outcome) = match provider.load() {
            Ok(entries) if entries.is_empty() => {
                (HistoryStore::with_capacity(capacity), LoadOutcome::Empty)
            }
            Ok(entries) => {
                let store = HistoryStore::from_entries(entries, capacity);
                info!(entries = store.len(), "history loaded");
                let n = store.len();
                (store, LoadOutcome::Loaded(n))
            }
            Err(e) => {
                warn!("Failed to load training history: {}, starting empty", e);
                (HistoryStore::with_capacity(capacity), LoadOutcome::Recovered(e.to_string()))
            }
        };
        (PersistentHistory { store, provider }, outcome)
    }

    /// Read-only view of the in-memory store
    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    /// Record a layout and persist the new history.
    ///
    /// The in-memory store is updated even when saving fails.
    pub fn record(
        &mut self,
        layout: Layout,
        mine_count: usize,
    ) -> Result<HistoryEntry, HistoryError> {
        let entry = self.store.record(layout, mine_count);
        self.provider.save(&self.store.to_vec())?;
        Ok(entry)
    }

    /// Clear the store and delete persisted data.
    pub fn clear(&mut self) -> Result<(), HistoryError> {
        self.store.clear();
        self.provider.remove()
    }

    pub fn recent_patterns(&self, count: usize) -> Vec<Layout> {
        self.store.recent_patterns(count)
    }

    pub fn training_level(&self) -> u32 {
        self.store.training_level()
    }

    pub fn training_progress(&self) -> f64 {
        self.store.training_progress()
    }

    pub fn total_entries(&self) -> usize {
        self.store.total_entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MemoryProvider;
    use crate::store::MAX_HISTORY_SIZE;
    use sentinel_engine::GRID_CELLS;

    fn layout(cells: [usize; 3]) -> Layout {
        Layout::new(cells, 3, GRID_CELLS).unwrap()
    }

    #[test]
    fn test_open_empty() {
        let (history, outcome) = PersistentHistory::open(MemoryProvider::new(), MAX_HISTORY_SIZE);
        assert_eq!(outcome, LoadOutcome::Empty);
        assert_eq!(history.total_entries(), 0);
    }

    #[test]
    fn test_corrupt_data_recovers_empty() {
        let provider = MemoryProvider::with_raw("[{\"broken\": ");
        let (history, outcome) = PersistentHistory::open(provider, MAX_HISTORY_SIZE);
        assert!(matches!(outcome, LoadOutcome::Recovered(_)));
        assert_eq!(history.total_entries(), 0);
    }

    #[test]
    fn test_malformed_positions_recover_empty() {
        let raw = r#"[{"id":"1-a","timestamp":"2026-01-01T00:00:00Z",
            "minePositions":[3,3,99],"mineCount":2}]"#;
        let (history, outcome) =
            PersistentHistory::open(MemoryProvider::with_raw(raw), MAX_HISTORY_SIZE);
        assert!(matches!(outcome, LoadOutcome::Recovered(_)));
        assert!(history.recent_patterns(3).is_empty());

        let raw = r#"[{"id":"1-a","timestamp":"2026-01-01T00:00:00Z",
            "minePositions":[3,99],"mineCount":2}]"#;
        let (history, outcome) =
            PersistentHistory::open(MemoryProvider::with_raw(raw), MAX_HISTORY_SIZE);
        assert!(matches!(outcome, LoadOutcome::Recovered(_)));
        assert_eq!(history.total_entries(), 0);
    }

    #[test]
    fn test_record_writes_through() {
        let (mut history, _) = PersistentHistory::open(MemoryProvider::new(), MAX_HISTORY_SIZE);
        history.record(layout([1, 2, 3]), 3).unwrap();
        history.record(layout([4, 5, 6]), 3).unwrap();

        let saved = history.provider.load().unwrap();
        assert_eq!(saved, history.store().to_vec());
        assert_eq!(history.recent_patterns(1), vec![layout([4, 5, 6])]);
    }

    #[test]
    fn test_reopen_restores_history() {
        let (mut history, _) = PersistentHistory::open(MemoryProvider::new(), MAX_HISTORY_SIZE);
        for i in 0..6 {
            history.record(layout([i, i + 6, i + 12]), 3).unwrap();
        }
        let raw = history.provider.raw().unwrap();

        let (reopened, outcome) =
            PersistentHistory::open(MemoryProvider::with_raw(raw), MAX_HISTORY_SIZE);
        assert_eq!(outcome, LoadOutcome::Loaded(6));
        assert_eq!(reopened.store().to_vec(), history.store().to_vec());
        assert_eq!(reopened.training_level(), 1);
    }

    #[test]
    fn test_clear_removes_persisted_data() {
        let (mut history, _) = PersistentHistory::open(MemoryProvider::new(), MAX_HISTORY_SIZE);
        history.record(layout([7, 8, 9]), 3).unwrap();
        history.clear().unwrap();
        assert_eq!(history.total_entries(), 0);
        assert!(history.provider.raw().is_none());
    }
}
