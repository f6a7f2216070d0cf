//! Sentinel Engine - adaptive safe-cell estimation
//!
//! This crate estimates, for every cell of a small mine grid, how likely the
//! cell is to be safe. Estimates come from Monte Carlo sampling of random
//! mine layouts, steered away from layouts that resemble recently confirmed
//! ones.
//!
//! The engine has no persistence or UI dependencies. History is passed in as
//! a snapshot of layouts, randomness as an explicit `Rng`, and progress goes
//! out through a [`progress::ProgressSink`].

pub mod bayes;
pub mod config;
pub mod ensemble;
pub mod error;
pub mod estimator;
pub mod generator;
pub mod grid;
pub mod progress;
pub mod similarity;

pub use bayes::{base_probability, entropy, normalized_entropy, posterior, Posterior};
pub use config::EstimatorConfig;
pub use ensemble::{run_ensemble, EnsembleSummary};
pub use error::{EngineError, Result};
pub use estimator::{AdaptiveInfo, Estimator, SimulationResult};
pub use generator::{generate, rng_from_seed, Generated};
pub use grid::{CellIndex, ConfidenceMap, Layout, GRID_CELLS, GRID_WIDTH};
pub use progress::{NoProgress, ProgressLog, ProgressSink, Severity, Stage};
pub use similarity::{is_too_similar, similarity};
