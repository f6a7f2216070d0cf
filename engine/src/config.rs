//! Estimator configuration parameters.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::grid::GRID_CELLS;
use crate::similarity::DEFAULT_SIMILARITY_THRESHOLD;

/// Retry budget the estimator gives the adaptive generator for each draw.
pub const ESTIMATOR_MAX_ATTEMPTS: usize = 5;

/// Configuration for one Monte Carlo estimation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Number of hidden mines (M). Must satisfy `0 < mines < total_cells`.
    pub mines: usize,

    /// Total simulated layouts per run.
    pub iterations: usize,

    /// Confidence a cell needs to be reported safe, before the training bonus
    /// relaxes it.
    pub base_threshold: f64,

    /// Grid size (N).
    pub total_cells: usize,

    /// Draws the generator may make per sample before accepting a layout that
    /// resembles recent history.
    pub max_attempts: usize,

    /// Jaccard index at or above which a draw counts as a repeat of history.
    pub similarity_threshold: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            mines: 3,
            iterations: 1000,
            base_threshold: 0.97,
            total_cells: GRID_CELLS,
            max_attempts: ESTIMATOR_MAX_ATTEMPTS,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl EstimatorConfig {
    /// Small, fast config for tests.
    pub fn for_testing() -> Self {
        Self {
            iterations: 200,
            ..Self::default()
        }
    }

    /// Builder pattern: set mine count.
    pub fn with_mines(mut self, mines: usize) -> Self {
        self.mines = mines;
        self
    }

    /// Builder pattern: set iteration count.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Builder pattern: set base confidence threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.base_threshold = threshold;
        self
    }

    /// Builder pattern: set grid size.
    pub fn with_total_cells(mut self, total_cells: usize) -> Self {
        self.total_cells = total_cells;
        self
    }

    /// Reject configurations that cannot produce a meaningful run.
    ///
    /// Nothing is clamped: a bad mine count or iteration count is a caller
    /// bug and is reported as such.
    pub fn validate(&self) -> Result<()> {
        if self.mines == 0 {
            return Err(EngineError::InvalidConfig(
                "mine count must be at least 1".to_string(),
            ));
        }
        if self.mines >= self.total_cells {
            return Err(EngineError::InvalidConfig(format!(
                "mine count {} must be less than the number of cells ({})",
                self.mines, self.total_cells
            )));
        }
        if self.iterations == 0 {
            return Err(EngineError::InvalidConfig(
                "iterations must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.base_threshold) {
            return Err(EngineError::InvalidConfig(format!(
                "base threshold {} must be within [0, 1]",
                self.base_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(EngineError::InvalidConfig(format!(
                "similarity threshold {} must be within [0, 1]",
                self.similarity_threshold
            )));
        }
        if self.max_attempts == 0 {
            return Err(EngineError::InvalidConfig(
                "max attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
