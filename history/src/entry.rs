//! A single confirmed layout

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use sentinel_engine::{Layout, GRID_CELLS};

use crate::error::HistoryError;

/// Length of the random suffix in generated ids
const ID_SUFFIX_LEN: usize = 9;

/// One confirmed mine layout.
///
/// Serialized as `{id, timestamp, minePositions, mineCount}` with an ISO-8601
/// timestamp. Entries are immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    id: String,
    timestamp: DateTime<Utc>,
    mine_positions: Layout,
    mine_count: usize,
}

impl HistoryEntry {
    /// New entry stamped with the current time and a fresh id.
    pub fn new(layout: Layout, mine_count: usize) -> Self {
        let timestamp = Utc::now();
        HistoryEntry {
            id: generate_id(timestamp),
            timestamp,
            mine_positions: layout,
            mine_count,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Mine positions, sorted ascending
    pub fn layout(&self) -> &Layout {
        &self.mine_positions
    }

    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    /// Check an entry read back from storage against the reference grid.
    pub fn validate(&self) -> Result<(), HistoryError> {
        let invalid = |reason: String| HistoryError::InvalidEntry {
            id: self.id.clone(),
            reason,
        };
        if self.id.is_empty() {
            return Err(invalid("empty id".to_string()));
        }
        if self.mine_count == 0 {
            return Err(invalid("mine count is zero".to_string()));
        }
        if self.mine_positions.len() != self.mine_count {
            return Err(invalid(format!(
                "{} positions recorded for mine count {}",
                self.mine_positions.len(),
                self.mine_count
            )));
        }
        if let Some(&bad) = self.mine_positions.cells().iter().find(|&&c| c >= GRID_CELLS) {
            return Err(invalid(format!(
                "cell {bad} is outside the grid (0..{GRID_CELLS})"
            )));
        }
        Ok(())
    }
}

/// `<unix millis>-<9 random lowercase alphanumerics>`
fn generate_id(timestamp: DateTime<Utc>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("{}-{}", timestamp.timestamp_millis(), suffix)
}
