//! Sentinel History - confirmed layout history and its persistence
//!
//! This crate keeps the bounded, most-recent-first record of layouts an
//! operator has confirmed, derives the training signals from it, and hands
//! recent layouts to the engine as a snapshot before each run.
//!
//! Storage is pluggable through [`HistoryProvider`]; the store itself never
//! touches the filesystem.

pub mod entry;
pub mod error;
pub mod persistent;
pub mod provider;
pub mod store;

pub use entry::HistoryEntry;
pub use error::HistoryError;
pub use persistent::{LoadOutcome, PersistentHistory};
pub use provider::{HistoryProvider, JsonFileProvider, MemoryProvider};
pub use store::{HistoryStore, DEFAULT_RECENT_PATTERNS, MAX_HISTORY_SIZE};
