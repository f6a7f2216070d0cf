//! Grid, layout and confidence-map types
//!
//! The engine only cares about how many cells the grid has; row/column
//! decomposition is offered as a display helper. Layouts are kept sorted and
//! duplicate-free so that they behave as sets everywhere else in the crate.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Number of cells in the reference 5×5 grid
pub const GRID_CELLS: usize = 25;

/// Width of the reference grid (used only for row/column display)
pub const GRID_WIDTH: usize = 5;

/// Cell index type (position in the flat grid, 0-based)
pub type CellIndex = usize;

/// Split a flat cell index into `(row, col)` for a grid of the given width.
pub fn row_col(cell: CellIndex, width: usize) -> (usize, usize) {
    (cell / width, cell % width)
}

/// A set of mine positions for one simulated or confirmed grid.
///
/// Cells are stored sorted ascending with no duplicates. `Layout::new` checks
/// the full invariant (exact size, in range); `from_cells` only normalizes and
/// is meant for comparison inputs of arbitrary size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<CellIndex>", into = "Vec<CellIndex>")]
pub struct Layout(Vec<CellIndex>);

impl Layout {
    /// Build a validated layout of exactly `mine_count` distinct cells in
    /// `[0, total_cells)`.
    pub fn new(
        cells: impl IntoIterator<Item = CellIndex>,
        mine_count: usize,
        total_cells: usize,
    ) -> Result<Self> {
        let mut cells: Vec<CellIndex> = cells.into_iter().collect();
        if let Some(&bad) = cells.iter().find(|&&c| c >= total_cells) {
            return Err(EngineError::InvalidLayout(format!(
                "cell {bad} is outside the grid (0..{total_cells})"
            )));
        }
        cells.sort_unstable();
        let before = cells.len();
        cells.dedup();
        if cells.len() != before {
            return Err(EngineError::InvalidLayout(
                "layout contains duplicate cells".to_string(),
            ));
        }
        if cells.len() != mine_count {
            return Err(EngineError::InvalidLayout(format!(
                "expected {mine_count} mines, got {}",
                cells.len()
            )));
        }
        Ok(Layout(cells))
    }

    /// Normalize any collection of cells into a layout (sorted, deduplicated).
    pub fn from_cells(cells: impl IntoIterator<Item = CellIndex>) -> Self {
        let mut cells: Vec<CellIndex> = cells.into_iter().collect();
        cells.sort_unstable();
        cells.dedup();
        Layout(cells)
    }

    /// Sorted mine positions
    pub fn cells(&self) -> &[CellIndex] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check whether `cell` is a mine in this layout
    pub fn contains(&self, cell: CellIndex) -> bool {
        self.0.binary_search(&cell).is_ok()
    }
}

/// Deserialization path: order is normalized, duplicates are rejected.
impl TryFrom<Vec<CellIndex>> for Layout {
    type Error = EngineError;

    fn try_from(mut cells: Vec<CellIndex>) -> Result<Self> {
        cells.sort_unstable();
        if cells.windows(2).any(|w| w[0] == w[1]) {
            return Err(EngineError::InvalidLayout(
                "layout contains duplicate cells".to_string(),
            ));
        }
        Ok(Layout(cells))
    }
}

impl From<Layout> for Vec<CellIndex> {
    fn from(layout: Layout) -> Self {
        layout.0
    }
}

/// Per-cell probability that the cell is safe, defined for every cell.
///
/// Values are always in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfidenceMap(Vec<f64>);

impl ConfidenceMap {
    /// Wrap per-cell values, clamping each into `[0, 1]`.
    pub fn from_values(values: Vec<f64>) -> Self {
        ConfidenceMap(values.into_iter().map(|p| p.clamp(0.0, 1.0)).collect())
    }

    /// Same probability for every cell
    pub fn uniform(p: f64, total_cells: usize) -> Self {
        Self::from_values(vec![p; total_cells])
    }

    pub fn get(&self, cell: CellIndex) -> Option<f64> {
        self.0.get(cell).copied()
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Number of cells covered (the grid size)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(cell, probability)` pairs in cell order
    pub fn iter(&self) -> impl Iterator<Item = (CellIndex, f64)> + '_ {
        self.0.iter().copied().enumerate()
    }
}
