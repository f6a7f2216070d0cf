//! Monte Carlo safe-cell estimator
//!
//! Each run samples `iterations` mine layouts through the adaptive generator
//! and counts, per cell, how often the cell was left clear. Counts become
//! confidences (`hits / iterations`), cells at or above the adjusted threshold
//! are reported safe, and when none qualify the best five are returned
//! instead.
//!
//! Sampling is split into ten sequential batches. Progress is emitted after
//! each batch, and the sink may abort the run before the next batch starts.

use rand::Rng;
use tracing::{debug, info, trace, warn};

use crate::config::EstimatorConfig;
use crate::error::{EngineError, Result};
use crate::generator::draw_adaptive;
use crate::grid::{CellIndex, ConfidenceMap, Layout};
use crate::progress::{ProgressSink, Reporter, Severity};

/// Number of progress batches per run
pub const BATCHES: usize = 10;

/// Cells returned when nothing reaches the threshold
pub const FALLBACK_CELLS: usize = 5;

/// Threshold relief per training level
pub const TRAINING_BONUS_STEP: f64 = 0.005;

/// Maximum threshold relief from training
pub const TRAINING_BONUS_CAP: f64 = 0.05;

/// The adjusted threshold never drops below this
pub const THRESHOLD_FLOOR: f64 = 0.90;

/// Threshold relief earned by a training level: `min(level × 0.005, 0.05)`.
pub fn training_bonus(training_level: u32) -> f64 {
    (training_level as f64 * TRAINING_BONUS_STEP).min(TRAINING_BONUS_CAP)
}

/// Effective threshold: `max(base − bonus, 0.90)`.
pub fn adjusted_threshold(base_threshold: f64, training_level: u32) -> f64 {
    (base_threshold - training_bonus(training_level)).max(THRESHOLD_FLOOR)
}

/// Auxiliary counters reported alongside a result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveInfo {
    /// Draws where the generator rejected at least one history-like layout
    pub patterns_avoided: usize,
    /// Training bonus as a percentage (0.0 – 5.0)
    pub training_bonus_pct: f64,
}

/// Outcome of one estimator run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub iterations: usize,
    /// Threshold after the training adjustment
    pub threshold: f64,
    pub confidence: ConfidenceMap,
    /// Safe cells, by descending confidence then ascending index
    pub safe_cells: Vec<CellIndex>,
    /// True when no cell met the threshold and the top cells were used instead
    pub used_fallback: bool,
    pub adaptive: AdaptiveInfo,
}

impl SimulationResult {
    /// The `k` most confident safe cells
    pub fn top(&self, k: usize) -> &[CellIndex] {
        &self.safe_cells[..k.min(self.safe_cells.len())]
    }

    pub fn confidence_of(&self, cell: CellIndex) -> Option<f64> {
        self.confidence.get(cell)
    }
}

/// Per-cell count of draws in which the cell was not a mine.
///
/// Single writer for the duration of a run.
struct HitCounts {
    hits: Vec<u64>,
    draws: u64,
}

impl HitCounts {
    fn new(total_cells: usize) -> Self {
        HitCounts {
            hits: vec![0; total_cells],
            draws: 0,
        }
    }

    fn record(&mut self, layout: &Layout) {
        for (cell, hits) in self.hits.iter_mut().enumerate() {
            if !layout.contains(cell) {
                *hits += 1;
            }
        }
        self.draws += 1;
    }

    fn confidence_map(&self) -> ConfidenceMap {
        let draws = self.draws.max(1) as f64;
        ConfidenceMap::from_values(self.hits.iter().map(|&h| h as f64 / draws).collect())
    }
}

/// Draws per batch. The remainder of an uneven split goes to the last batch.
fn batch_sizes(iterations: usize) -> impl Iterator<Item = usize> {
    let base = iterations / BATCHES;
    let remainder = iterations % BATCHES;
    (0..BATCHES).map(move |b| if b + 1 == BATCHES { base + remainder } else { base })
}

/// Cells ranked by descending confidence, ties by ascending index.
fn rank_cells(confidence: &ConfidenceMap) -> Vec<CellIndex> {
    let values = confidence.values();
    let mut ranked: Vec<CellIndex> = (0..values.len()).collect();
    ranked.sort_by(|&a, &b| values[b].total_cmp(&values[a]).then(a.cmp(&b)));
    ranked
}

/// Apply the threshold, falling back to the top [`FALLBACK_CELLS`] cells.
/// Returns the ordered safe set and whether the fallback was used.
fn select_safe_cells(confidence: &ConfidenceMap, threshold: f64) -> (Vec<CellIndex>, bool) {
    let ranked = rank_cells(confidence);
    let safe: Vec<CellIndex> = ranked
        .iter()
        .copied()
        .filter(|&cell| confidence.values()[cell] >= threshold)
        .collect();
    if safe.is_empty() {
        (ranked.into_iter().take(FALLBACK_CELLS).collect(), true)
    } else {
        (safe, false)
    }
}

/// Monte Carlo estimator bound to a validated configuration.
#[derive(Debug, Clone)]
pub struct Estimator {
    config: EstimatorConfig,
}

impl Estimator {
    /// Validate `config` up front; no sampling happens with a bad config.
    pub fn new(config: EstimatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Estimator { config })
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Run the adaptive simulation.
    ///
    /// `recent_patterns` is a snapshot of recent confirmed layouts that draws
    /// are steered away from; `training_level` relaxes the threshold.
    pub fn run<R, S>(
        &self,
        recent_patterns: &[Layout],
        training_level: u32,
        rng: &mut R,
        sink: &mut S,
    ) -> Result<SimulationResult>
    where
        R: Rng + ?Sized,
        S: ProgressSink + ?Sized,
    {
        let config = &self.config;
        let bonus = training_bonus(training_level);
        let threshold = adjusted_threshold(config.base_threshold, training_level);
        let mut progress = Reporter::new(sink);

        debug!(
            mines = config.mines,
            iterations = config.iterations,
            base_threshold = config.base_threshold,
            threshold,
            training_level,
            recent = recent_patterns.len(),
            "starting simulation"
        );

        progress.emit(5, Severity::Info, "[INIT] Initializing adaptive simulation engine...");
        if !recent_patterns.is_empty() {
            progress.emit(
                10,
                Severity::Info,
                format!("[TRAIN] Loading {} patterns from history...", recent_patterns.len()),
            );
        }
        progress.emit(
            15,
            Severity::Process,
            format!("[CALC] Computing {} adaptive permutations...", config.iterations),
        );

        let mut counts = HitCounts::new(config.total_cells);
        let mut patterns_avoided = 0usize;

        for (batch, size) in batch_sizes(config.iterations).enumerate() {
            if progress.should_abort() {
                warn!(completed_batches = batch, "simulation aborted by caller");
                return Err(EngineError::Cancelled {
                    completed_batches: batch,
                    total_batches: BATCHES,
                });
            }

            for _ in 0..size {
                let drawn = draw_adaptive(
                    config.mines,
                    recent_patterns,
                    config.max_attempts,
                    config.total_cells,
                    config.similarity_threshold,
                    rng,
                );
                if drawn.avoided {
                    patterns_avoided += 1;
                }
                counts.record(&drawn.layout);
            }

            let done = batch + 1;
            trace!(batch = done, draws = counts.draws, "batch complete");
            progress.emit(
                (20 + done * 6) as u8,
                Severity::Process,
                format!("[SIM] Processing batch {done}/{BATCHES}... ({}%)", done * 10),
            );
        }

        if training_level > 0 {
            progress.emit(
                82,
                Severity::Info,
                format!("[ADAPT] Applying training correction (level {training_level})..."),
            );
        }

        let confidence = counts.confidence_map();
        debug_assert_eq!(confidence.len(), config.total_cells);
        progress.emit(
            85,
            Severity::Info,
            format!("[VERIFY] Verifying confidence map over {} cells...", confidence.len()),
        );
        progress.emit(
            90,
            Severity::Process,
            format!("[FILTER] Filtering {patterns_avoided} repeated patterns..."),
        );
        progress.emit(95, Severity::Process, "[ANALYZE] Analyzing probability density...");

        let (safe_cells, used_fallback) = select_safe_cells(&confidence, threshold);
        if used_fallback {
            progress.emit(
                100,
                Severity::Warning,
                format!(
                    "[FALLBACK] No cell reached {:.1}%, returning top {} candidates",
                    threshold * 100.0,
                    safe_cells.len()
                ),
            );
        } else {
            progress.emit(
                100,
                Severity::Success,
                format!("[SUCCESS] {} high-confidence cells found!", safe_cells.len()),
            );
        }

        info!(
            safe = safe_cells.len(),
            used_fallback,
            patterns_avoided,
            threshold,
            "simulation complete"
        );

        Ok(SimulationResult {
            iterations: config.iterations,
            threshold,
            confidence,
            safe_cells,
            used_fallback,
            adaptive: AdaptiveInfo {
                patterns_avoided,
                training_bonus_pct: bonus * 100.0,
            },
        })
    }

    /// Non-adaptive run: no history, no training bonus.
    pub fn run_plain<R, S>(&self, rng: &mut R, sink: &mut S) -> Result<SimulationResult>
    where
        R: Rng + ?Sized,
        S: ProgressSink + ?Sized,
    {
        self.run(&[], 0, rng, sink)
    }
}
