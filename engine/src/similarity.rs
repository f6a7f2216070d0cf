//! Pattern similarity between mine layouts (Jaccard index)

use crate::grid::{CellIndex, Layout};

/// Similarity at or above which a layout is treated as a repeat.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.6;

/// Jaccard index |a ∩ b| / |a ∪ b| of two layouts.
///
/// Returns 0.0 when either layout is empty. Symmetric, and defined for layouts
/// of different sizes.
pub fn similarity(a: &Layout, b: &Layout) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let shared = count_shared(a.cells(), b.cells());
    let union = a.len() + b.len() - shared;
    shared as f64 / union as f64
}

/// Size of the intersection of two sorted, duplicate-free slices.
fn count_shared(a: &[CellIndex], b: &[CellIndex]) -> usize {
    let (mut i, mut j, mut shared) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                shared += 1;
                i += 1;
                j += 1;
            }
        }
    }
    shared
}

/// True iff `candidate` is at least `threshold`-similar to any layout in
/// `recent`. Stops at the first match.
pub fn is_too_similar(candidate: &Layout, recent: &[Layout], threshold: f64) -> bool {
    recent
        .iter()
        .any(|pattern| similarity(candidate, pattern) >= threshold)
}
