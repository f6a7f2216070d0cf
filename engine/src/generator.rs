//! Adaptive layout generator
//!
//! Draws uniformly random mine layouts, re-drawing (within a fixed budget)
//! whenever a draw is too close to one of the recently confirmed layouts.
//! The budget guarantees termination: after `max_attempts` draws the last one
//! is accepted regardless.

use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{EngineError, Result};
use crate::grid::Layout;
use crate::similarity::{is_too_similar, DEFAULT_SIMILARITY_THRESHOLD};

/// Default retry budget for standalone generation.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// Outcome of one adaptive generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    /// Accepted layout
    pub layout: Layout,
    /// Draws performed, in `1..=max_attempts`
    pub attempts: usize,
    /// True iff at least one draw was rejected for resembling history
    pub avoided: bool,
}

/// Seeded ChaCha source when `seed` is given, OS entropy otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Uniformly random layout of `mine_count` distinct cells in `[0, total_cells)`.
///
/// Caller guarantees `mine_count <= total_cells`.
pub fn random_layout<R: Rng + ?Sized>(
    mine_count: usize,
    total_cells: usize,
    rng: &mut R,
) -> Layout {
    Layout::from_cells(index::sample(rng, total_cells, mine_count).into_vec())
}

/// Generate a layout that avoids patterns similar to `recent`, using the
/// default similarity threshold.
pub fn generate<R: Rng + ?Sized>(
    mine_count: usize,
    recent: &[Layout],
    max_attempts: usize,
    total_cells: usize,
    rng: &mut R,
) -> Result<Generated> {
    generate_with_threshold(
        mine_count,
        recent,
        max_attempts,
        total_cells,
        DEFAULT_SIMILARITY_THRESHOLD,
        rng,
    )
}

/// Same as [`generate`] with an explicit similarity threshold.
pub fn generate_with_threshold<R: Rng + ?Sized>(
    mine_count: usize,
    recent: &[Layout],
    max_attempts: usize,
    total_cells: usize,
    similarity_threshold: f64,
    rng: &mut R,
) -> Result<Generated> {
    if mine_count == 0 || mine_count >= total_cells {
        return Err(EngineError::InvalidConfig(format!(
            "mine count {mine_count} must be in 1..{total_cells}"
        )));
    }
    Ok(draw_adaptive(
        mine_count,
        recent,
        max_attempts,
        total_cells,
        similarity_threshold,
        rng,
    ))
}

/// Unchecked core of the generator, shared with the estimator hot loop.
/// A `max_attempts` of 0 still performs one draw.
pub(crate) fn draw_adaptive<R: Rng + ?Sized>(
    mine_count: usize,
    recent: &[Layout],
    max_attempts: usize,
    total_cells: usize,
    similarity_threshold: f64,
    rng: &mut R,
) -> Generated {
    let max_attempts = max_attempts.max(1);
    let mut avoided = false;
    let mut attempts = 0;

    loop {
        let layout = random_layout(mine_count, total_cells, rng);
        attempts += 1;

        if attempts >= max_attempts || !is_too_similar(&layout, recent, similarity_threshold) {
            return Generated {
                layout,
                attempts,
                avoided,
            };
        }
        avoided = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GRID_CELLS;

    #[test]
    fn test_layout_has_exact_size_and_range() {
        let mut rng = rng_from_seed(Some(7));
        for _ in 0..500 {
            let generated = generate(5, &[], DEFAULT_MAX_ATTEMPTS, GRID_CELLS, &mut rng).unwrap();
            let cells = generated.layout.cells();
            assert_eq!(cells.len(), 5);
            assert!(cells.iter().all(|&c| c < GRID_CELLS));
            assert!(cells.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_empty_history_never_avoids() {
        let mut rng = rng_from_seed(Some(11));
        for _ in 0..200 {
            let generated = generate(3, &[], DEFAULT_MAX_ATTEMPTS, GRID_CELLS, &mut rng).unwrap();
            assert!(!generated.avoided);
            assert_eq!(generated.attempts, 1);
        }
    }

    #[test]
    fn test_exhausted_budget_accepts_last_draw() {
        // With 24 of 25 cells mined any two layouts share ≥ 23 cells, so every
        // draw is too similar and the budget runs out.
        let mut rng = rng_from_seed(Some(3));
        let recent = vec![Layout::from_cells(0..24)];
        let generated = generate(24, &recent, 4, GRID_CELLS, &mut rng).unwrap();
        assert_eq!(generated.attempts, 4);
        assert!(generated.avoided);
        assert_eq!(generated.layout.len(), 24);
    }

    #[test]
    fn test_explicit_threshold_controls_avoidance() {
        let recent = vec![Layout::from_cells([0, 1, 2])];

        // Every pair of layouts scores at least 0, so a zero threshold rejects
        // every draw until the budget runs out.
        let mut rng = rng_from_seed(Some(23));
        let strict = generate_with_threshold(3, &recent, 7, GRID_CELLS, 0.0, &mut rng).unwrap();
        assert_eq!(strict.attempts, 7);
        assert!(strict.avoided);

        // Above 1 nothing can be too similar, not even an exact repeat.
        let loose = generate_with_threshold(3, &recent, 7, GRID_CELLS, 1.1, &mut rng).unwrap();
        assert_eq!(loose.attempts, 1);
        assert!(!loose.avoided);

        assert!(generate_with_threshold(0, &recent, 7, GRID_CELLS, 0.5, &mut rng).is_err());
    }

    #[test]
    fn test_zero_attempts_still_draws_once() {
        let mut rng = rng_from_seed(Some(5));
        let recent = vec![Layout::from_cells(0..24)];
        let generated = generate(24, &recent, 0, GRID_CELLS, &mut rng).unwrap();
        assert_eq!(generated.attempts, 1);
        assert!(!generated.avoided);
    }

    #[test]
    fn test_attempts_within_budget() {
        let mut rng = rng_from_seed(Some(19));
        let recent = vec![
            Layout::from_cells([0, 1, 2]),
            Layout::from_cells([3, 4, 5]),
            Layout::from_cells([6, 7, 8]),
        ];
        for _ in 0..300 {
            let generated = generate(3, &recent, 6, GRID_CELLS, &mut rng).unwrap();
            assert!((1..=6).contains(&generated.attempts));
            assert_eq!(generated.avoided, generated.attempts > 1);
        }
    }

    #[test]
    fn test_rejects_invalid_mine_count() {
        let mut rng = rng_from_seed(Some(1));
        assert!(generate(0, &[], 10, GRID_CELLS, &mut rng).is_err());
        assert!(generate(25, &[], 10, GRID_CELLS, &mut rng).is_err());
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = generate(4, &[], 10, GRID_CELLS, &mut rng_from_seed(Some(42))).unwrap();
        let b = generate(4, &[], 10, GRID_CELLS, &mut rng_from_seed(Some(42))).unwrap();
        assert_eq!(a, b);
    }
}
