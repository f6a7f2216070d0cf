//! Closed-form priors, posteriors and entropy for display metrics.
//!
//! None of this steers the estimator; it summarizes how much is known about
//! the grid.

use std::collections::BTreeSet;

use tracing::warn;

use crate::grid::{CellIndex, ConfidenceMap};

/// Prior probability that a single unrevealed cell is a mine: `mines / total_cells`.
pub fn base_probability(mines: usize, total_cells: usize) -> f64 {
    if total_cells == 0 {
        return 0.0;
    }
    mines as f64 / total_cells as f64
}

/// Per-cell safety posterior given revealed cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Posterior {
    pub probabilities: ConfidenceMap,
    pub remaining_mines: i64,
    pub remaining_cells: i64,
    /// Set when the inputs leave no consistent uniform posterior (no cells
    /// left, or more mines than cells). Probabilities are clamped to [0, 1].
    pub degenerate: bool,
}

/// Posterior safety probability for every cell.
///
/// Revealed safe cells map to 1 and revealed mines to 0; every other cell
/// gets `1 − remaining_mines / remaining_cells`. Out-of-range indices are
/// ignored and duplicates count once. A cell listed as both safe and mine is
/// treated as safe.
pub fn posterior(
    mines: usize,
    revealed_safe: &[CellIndex],
    revealed_mines: &[CellIndex],
    total_cells: usize,
) -> Posterior {
    let safe: BTreeSet<CellIndex> = revealed_safe
        .iter()
        .copied()
        .filter(|&c| c < total_cells)
        .collect();
    let mined: BTreeSet<CellIndex> = revealed_mines
        .iter()
        .copied()
        .filter(|&c| c < total_cells)
        .collect();

    let remaining_mines = mines as i64 - mined.len() as i64;
    let remaining_cells = total_cells as i64 - safe.len() as i64 - mined.len() as i64;

    let degenerate =
        remaining_cells <= 0 || remaining_mines < 0 || remaining_mines > remaining_cells;
    let uniform = if remaining_mines <= 0 {
        1.0
    } else if remaining_cells <= 0 {
        0.0
    } else {
        (1.0 - remaining_mines as f64 / remaining_cells as f64).clamp(0.0, 1.0)
    };

    if degenerate {
        warn!(
            mines,
            remaining_mines,
            remaining_cells,
            "degenerate posterior input, probabilities clamped"
        );
    }

    let values = (0..total_cells)
        .map(|cell| {
            if safe.contains(&cell) {
                1.0
            } else if mined.contains(&cell) {
                0.0
            } else {
                uniform
            }
        })
        .collect();

    Posterior {
        probabilities: ConfidenceMap::from_values(values),
        remaining_mines,
        remaining_cells,
        degenerate,
    }
}

/// Shannon entropy in bits, summed over cells with `0 < p < 1`.
pub fn entropy(map: &ConfidenceMap) -> f64 {
    map.values()
        .iter()
        .filter(|&&p| p > 0.0 && p < 1.0)
        .map(|&p| -(p * p.log2() + (1.0 - p) * (1.0 - p).log2()))
        .sum()
}

/// Entropy divided by the number of cells, in `[0, 1]`.
pub fn normalized_entropy(map: &ConfidenceMap) -> f64 {
    if map.is_empty() {
        return 0.0;
    }
    entropy(map) / map.len() as f64
}
