//! Sentinel CLI - command-line harness for the estimation engine
//!
//! Loads the confirmed-layout history, runs estimations against it, and lets
//! an operator record or clear confirmed layouts.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

mod commands;
mod config;
mod render;

use crate::config::{load_config, LoadedConfig};

#[derive(Debug, Parser)]
#[command(name = "sentinel", version, about = "Adaptive safe-cell estimation")]
struct Cli {
    /// Path to sentinel.toml
    #[arg(long, global = true, env = "SENTINEL_CONFIG")]
    config: Option<PathBuf>,

    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// History file location
    #[arg(long, global = true)]
    history: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run an estimation against the recorded history
    Estimate {
        #[arg(long)]
        mines: Option<usize>,
        #[arg(long)]
        iterations: Option<usize>,
        #[arg(long)]
        threshold: Option<f64>,
        /// Safe cells to highlight
        #[arg(long)]
        stars: Option<usize>,
        /// Recent layouts to steer away from
        #[arg(long)]
        recent: Option<usize>,
        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Record a confirmed mine layout
    Record {
        /// Mine cell indices (0-based)
        #[arg(required = true)]
        cells: Vec<usize>,
        #[arg(long)]
        mines: Option<usize>,
    },
    /// Clear the recorded history
    Clear,
    /// Show history size and training signals
    Status,
    /// Closed-form posterior given revealed cells
    Posterior {
        #[arg(long)]
        mines: Option<usize>,
        /// Cells revealed safe
        #[arg(long, value_delimiter = ',')]
        safe: Vec<usize>,
        /// Cells revealed as mines
        #[arg(long = "mine", value_delimiter = ',')]
        revealed_mines: Vec<usize>,
    },
    /// Replicate runs in parallel and report per-cell spread
    Ensemble {
        #[arg(long, default_value_t = 8)]
        replicates: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

/// Apply global flags on top of file and environment configuration.
fn resolve_config(cli: &Cli) -> LoadedConfig {
    let mut loaded = load_config(cli.config.as_deref(), |key| std::env::var(key).ok());
    if let Some(level) = &cli.log_level {
        loaded.config.log_level = level.clone();
    }
    if let Some(path) = &cli.history {
        loaded.config.history_path = path.clone();
    }
    loaded
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let LoadedConfig {
        mut config,
        source,
        warnings,
    } = resolve_config(&cli);

    init_tracing(&config.log_level)?;
    for warning in &warnings {
        warn!("{warning}");
    }
    match &source {
        Some(path) => info!(config = %path.display(), "loaded configuration"),
        None => info!("no sentinel.toml found, using built-in defaults"),
    }
    info!(history = %config.history_path.display(), "sentinel starting");

    match cli.command {
        Command::Estimate {
            mines,
            iterations,
            threshold,
            stars,
            recent,
            seed,
        } => {
            if let Some(m) = mines {
                config.estimator.mines = m;
            }
            if let Some(i) = iterations {
                config.estimator.iterations = i;
            }
            if let Some(t) = threshold {
                config.estimator.base_threshold = t;
            }
            if let Some(s) = stars {
                config.stars = s;
            }
            if let Some(r) = recent {
                config.recent_patterns = r;
            }
            commands::estimate(&config, seed)
        }
        Command::Record { cells, mines } => {
            let mines = mines.unwrap_or(cells.len());
            commands::record(&config, cells, mines)
        }
        Command::Clear => commands::clear(&config),
        Command::Status => commands::status(&config),
        Command::Posterior {
            mines,
            safe,
            revealed_mines,
        } => {
            let mines = mines.unwrap_or(config.estimator.mines);
            commands::posterior(&config, mines, &safe, &revealed_mines)
        }
        Command::Ensemble { replicates, seed } => commands::ensemble(&config, replicates, seed),
    }
}
