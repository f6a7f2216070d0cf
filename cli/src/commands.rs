//! Subcommand implementations

use anyhow::{Context, Result};
use tracing::warn;

use sentinel_engine::{
    base_probability, entropy, normalized_entropy, posterior as compute_posterior, rng_from_seed,
    run_ensemble, Estimator, Layout, Stage,
};
use sentinel_history::{JsonFileProvider, LoadOutcome, PersistentHistory};

use crate::config::SentinelConfig;
use crate::render::{cell_label, confidence_grid, progress_line};

fn open_history(config: &SentinelConfig) -> PersistentHistory<JsonFileProvider> {
    let provider = JsonFileProvider::new(&config.history_path);
    let (history, outcome) = PersistentHistory::open(provider, config.history_capacity);
    if let LoadOutcome::Recovered(reason) = outcome {
        eprintln!("warning: history unreadable ({reason}); continuing with empty history");
    }
    history
}

pub fn estimate(config: &SentinelConfig, seed: Option<u64>) -> Result<()> {
    let estimator = Estimator::new(config.estimator.clone())?;
    let history = open_history(config);
    // Snapshot taken once; the run never sees later history changes.
    let recent = history.recent_patterns(config.recent_patterns);
    let level = history.training_level();
    let mut rng = rng_from_seed(seed);

    let mut sink = |percent: u8, stage: &Stage| println!("{}", progress_line(percent, stage));
    let result = estimator.run(&recent, level, &mut rng, &mut sink)?;

    let stars = result.top(config.stars);
    println!();
    println!(
        "Threshold {:.1}% over {} iterations{}",
        result.threshold * 100.0,
        result.iterations,
        if result.used_fallback { " (fallback: best candidates)" } else { "" }
    );
    for &cell in stars {
        let p = result.confidence_of(cell).unwrap_or_default();
        println!("  {}  {:.2}%", cell_label(cell), p * 100.0);
    }
    println!();
    print!("{}", confidence_grid(&result.confidence, stars));

    if result.adaptive.patterns_avoided > 0 {
        println!("[ADAPT] {} repeated patterns avoided", result.adaptive.patterns_avoided);
    }
    if result.adaptive.training_bonus_pct > 0.0 {
        println!("[BONUS] +{:.1}% threshold relief applied", result.adaptive.training_bonus_pct);
    }

    let prior = compute_posterior(config.estimator.mines, &[], &[], config.estimator.total_cells);
    println!(
        "Prior mine probability {:.2}%, grid entropy {:.2} bits",
        base_probability(config.estimator.mines, config.estimator.total_cells) * 100.0,
        entropy(&prior.probabilities)
    );
    Ok(())
}

pub fn record(config: &SentinelConfig, cells: Vec<usize>, mines: usize) -> Result<()> {
    let layout = Layout::new(cells, mines, config.estimator.total_cells)?;
    let mut history = open_history(config);
    let entry = history
        .record(layout, mines)
        .context("failed to save training history")?;
    println!(
        "[TRAIN] Pattern saved: {:?} ({} patterns stored)",
        entry.layout().cells(),
        history.total_entries()
    );
    Ok(())
}

pub fn clear(config: &SentinelConfig) -> Result<()> {
    let mut history = open_history(config);
    history.clear().context("failed to remove training history")?;
    println!("[CLEAR] Training history cleared");
    Ok(())
}

pub fn status(config: &SentinelConfig) -> Result<()> {
    let history = open_history(config);
    println!(
        "Patterns stored:   {}/{}",
        history.total_entries(),
        history.store().capacity()
    );
    println!("Training level:    {}/10", history.training_level());
    println!("Training progress: {:.0}%", history.training_progress());
    for entry in history.store().entries().take(config.recent_patterns) {
        println!(
            "  {}  {:?}  ({} mines)",
            entry.timestamp().format("%Y-%m-%d %H:%M:%S"),
            entry.layout().cells(),
            entry.mine_count()
        );
    }
    Ok(())
}

pub fn posterior(
    config: &SentinelConfig,
    mines: usize,
    safe: &[usize],
    revealed_mines: &[usize],
) -> Result<()> {
    let post = compute_posterior(mines, safe, revealed_mines, config.estimator.total_cells);
    if post.degenerate {
        warn!(
            remaining_mines = post.remaining_mines,
            remaining_cells = post.remaining_cells,
            "inconsistent reveal counts"
        );
        println!("warning: degenerate input, probabilities clamped");
    }
    print!("{}", confidence_grid(&post.probabilities, &[]));
    println!(
        "Entropy {:.3} bits ({:.3} per cell)",
        entropy(&post.probabilities),
        normalized_entropy(&post.probabilities)
    );
    Ok(())
}

pub fn ensemble(config: &SentinelConfig, replicates: usize, seed: u64) -> Result<()> {
    let estimator = Estimator::new(config.estimator.clone())?;
    let history = open_history(config);
    let recent = history.recent_patterns(config.recent_patterns);
    let summary = run_ensemble(&estimator, &recent, history.training_level(), seed, replicates)?;

    println!(
        "{} replicates, {} used the fallback set",
        summary.replicates, summary.fallback_runs
    );
    for (cell, (mean, sd)) in summary.mean.iter().zip(&summary.std_dev).enumerate() {
        println!("  {}  {:>6.2}% ± {:.2}", cell_label(cell), mean * 100.0, sd * 100.0);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_history::HistoryProvider;
    use tempfile::tempdir;

    fn config_in(dir: &std::path::Path) -> SentinelConfig {
        SentinelConfig {
            history_path: dir.join("history.json"),
            ..SentinelConfig::default()
        }
    }

    #[test]
    fn test_record_then_clear() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());

        record(&config, vec![4, 11, 19], 3).unwrap();
        record(&config, vec![0, 1, 2], 3).unwrap();
        let saved = JsonFileProvider::new(&config.history_path).load().unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].layout().cells(), &[0, 1, 2]);

        clear(&config).unwrap();
        assert!(!config.history_path.exists());
    }

    #[test]
    fn test_record_rejects_bad_layout() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        assert!(record(&config, vec![4, 4, 19], 3).is_err());
        assert!(record(&config, vec![4, 30, 19], 3).is_err());
        assert!(!config.history_path.exists());
    }

    #[test]
    fn test_estimate_with_corrupt_history() {
        let dir = tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.estimator.iterations = 100;
        std::fs::write(&config.history_path, "garbage").unwrap();
        assert!(estimate(&config, Some(1)).is_ok());
    }

    #[test]
    fn test_estimate_rejects_invalid_config() {
        let dir = tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.estimator.mines = 25;
        assert!(estimate(&config, Some(1)).is_err());
    }
}
