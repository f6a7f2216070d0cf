//! Durable storage for history entries
//!
//! Providers store the ordered entry list as a JSON array. They must keep
//! order and entry identity across a save/load cycle.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info};

use crate::entry::HistoryEntry;
use crate::error::HistoryError;

/// Abstract interface for history persistence.
pub trait HistoryProvider {
    /// Load all entries, newest first. Missing data loads as empty.
    fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError>;

    /// Replace persisted data with `entries`.
    fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError>;

    /// Delete persisted data entirely.
    fn remove(&self) -> Result<(), HistoryError>;
}

/// Parse and validate a serialized entry list.
fn decode(raw: &str) -> Result<Vec<HistoryEntry>, HistoryError> {
    let entries: Vec<HistoryEntry> = serde_json::from_str(raw)?;
    for entry in &entries {
        entry.validate()?;
    }
    Ok(entries)
}

/// History kept in a JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileProvider { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryProvider for JsonFileProvider {
    fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        if !self.path.exists() {
            debug!("No history at {}, starting empty", self.path.display());
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        let entries = decode(&raw)?;
        info!("Loaded {} history entries from {}", entries.len(), self.path.display());
        Ok(entries)
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        // Write then rename so a crash never leaves a half-written file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!("Saved {} history entries to {}", entries.len(), self.path.display());
        Ok(())
    }

    fn remove(&self) -> Result<(), HistoryError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process provider holding the serialized JSON; useful for tests and
/// for hosts that persist the string themselves.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    data: Mutex<Option<String>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider pre-loaded with raw serialized data
    pub fn with_raw(raw: impl Into<String>) -> Self {
        MemoryProvider {
            data: Mutex::new(Some(raw.into())),
        }
    }

    /// Current serialized data, if any
    pub fn raw(&self) -> Option<String> {
        self.data.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl HistoryProvider for MemoryProvider {
    fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        match self.raw() {
            Some(raw) => decode(&raw),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        let raw = serde_json::to_string(entries)?;
        *self.data.lock().unwrap_or_else(|e| e.into_inner()) = Some(raw);
        Ok(())
    }

    fn remove(&self) -> Result<(), HistoryError> {
        *self.data.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}
