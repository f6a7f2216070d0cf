//! Plain-text rendering of grids and progress lines

use sentinel_engine::grid::row_col;
use sentinel_engine::{CellIndex, ConfidenceMap, Severity, Stage, GRID_WIDTH};

/// Confidence grid as percentages; highlighted cells are marked with `*`.
pub fn confidence_grid(map: &ConfidenceMap, highlight: &[CellIndex]) -> String {
    let mut out = String::new();
    for (cell, p) in map.iter() {
        let mark = if highlight.contains(&cell) { '*' } else { ' ' };
        out.push_str(&format!("{:>6.1}{}", p * 100.0, mark));
        if (cell + 1) % GRID_WIDTH == 0 {
            out.push('\n');
        }
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// `cell (row, col)` label
pub fn cell_label(cell: CellIndex) -> String {
    let (row, col) = row_col(cell, GRID_WIDTH);
    format!("{cell:>2} [{row},{col}]")
}

/// One progress line: `[ 45%] HH:MM:SS message`
pub fn progress_line(percent: u8, stage: &Stage) -> String {
    let tag = match stage.severity {
        Severity::Info => "info",
        Severity::Process => "proc",
        Severity::Success => " ok ",
        Severity::Warning => "warn",
    };
    format!(
        "[{percent:>3}%] {} {tag} {}",
        stage.timestamp.format("%H:%M:%S"),
        stage.message
    )
}
