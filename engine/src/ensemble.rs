//! Independent replicate runs for error bars
//!
//! Replicates share nothing but immutable references to the estimator and the
//! history snapshot, so Rayon can run them concurrently. Each replicate gets
//! its own seeded RNG (`base_seed + i`), which keeps the summary reproducible
//! regardless of scheduling.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::estimator::{Estimator, SimulationResult};
use crate::grid::Layout;
use crate::progress::NoProgress;

/// Per-cell spread of confidence across replicates
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleSummary {
    pub replicates: usize,
    /// Mean confidence per cell
    pub mean: Vec<f64>,
    /// Sample standard deviation per cell (0 for a single replicate)
    pub std_dev: Vec<f64>,
    /// Replicates that had to use the fallback safe set
    pub fallback_runs: usize,
}

/// Run `replicates` seeded estimator runs in parallel and summarize them.
pub fn run_ensemble(
    estimator: &Estimator,
    recent_patterns: &[Layout],
    training_level: u32,
    base_seed: u64,
    replicates: usize,
) -> Result<EnsembleSummary> {
    if replicates == 0 {
        return Err(EngineError::InvalidConfig(
            "ensemble needs at least one replicate".to_string(),
        ));
    }

    let results: Vec<SimulationResult> = (0..replicates)
        .into_par_iter()
        .map(|i| {
            let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(i as u64));
            estimator.run(recent_patterns, training_level, &mut rng, &mut NoProgress)
        })
        .collect::<Result<Vec<_>>>()?;

    let cells = estimator.config().total_cells;
    let n = results.len() as f64;
    let mut mean = vec![0.0; cells];
    for result in &results {
        for (cell, p) in result.confidence.iter() {
            mean[cell] += p / n;
        }
    }

    let mut std_dev = vec![0.0; cells];
    if results.len() > 1 {
        for result in &results {
            for (cell, p) in result.confidence.iter() {
                std_dev[cell] += (p - mean[cell]).powi(2);
            }
        }
        for s in &mut std_dev {
            *s = (*s / (n - 1.0)).sqrt();
        }
    }

    let fallback_runs = results.iter().filter(|r| r.used_fallback).count();
    debug!(replicates, fallback_runs, "ensemble complete");

    Ok(EnsembleSummary {
        replicates,
        mean,
        std_dev,
        fallback_runs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EstimatorConfig;

    #[test]
    fn test_ensemble_is_reproducible() {
        let est = Estimator::new(EstimatorConfig::for_testing()).unwrap();
        let a = run_ensemble(&est, &[], 0, 100, 6).unwrap();
        let b = run_ensemble(&est, &[], 0, 100, 6).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_ensemble_mean_near_prior() {
        let est = Estimator::new(EstimatorConfig::default()).unwrap();
        let summary = run_ensemble(&est, &[], 0, 7, 8).unwrap();
        assert_eq!(summary.mean.len(), 25);
        for (&m, &s) in summary.mean.iter().zip(&summary.std_dev) {
            assert!((m - 0.88).abs() < 0.04, "mean {m}");
            assert!(s >= 0.0 && s < 0.05, "std dev {s}");
        }
        assert_eq!(summary.fallback_runs, 8);
    }

    #[test]
    fn test_single_replicate_has_zero_spread() {
        let est = Estimator::new(EstimatorConfig::for_testing()).unwrap();
        let summary = run_ensemble(&est, &[], 0, 1, 1).unwrap();
        assert!(summary.std_dev.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_zero_replicates_rejected() {
        let est = Estimator::new(EstimatorConfig::for_testing()).unwrap();
        assert!(run_ensemble(&est, &[], 0, 1, 0).is_err());
    }
}
