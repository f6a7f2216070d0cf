//! Configuration loading for the CLI
//!
//! Priority, lowest to highest: built-in defaults, `sentinel.toml`,
//! `SENTINEL_*` environment variables, command-line flags (applied in main).
//!
//! Loading runs before the tracing subscriber exists, so problems are
//! collected in [`LoadedConfig::warnings`] and logged by the caller.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use sentinel_engine::EstimatorConfig;
use sentinel_history::{DEFAULT_RECENT_PATTERNS, MAX_HISTORY_SIZE};

/// Locations searched for a config file when none is given
pub const CONFIG_SEARCH_PATHS: &[&str] = &["sentinel.toml", "../sentinel.toml"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentinelConfig {
    pub log_level: String,
    pub history_path: PathBuf,
    pub history_capacity: usize,
    /// Recent layouts handed to the estimator
    pub recent_patterns: usize,
    /// Safe cells to highlight after a run
    pub stars: usize,
    pub estimator: EstimatorConfig,
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            history_path: PathBuf::from("data/history.json"),
            history_capacity: MAX_HISTORY_SIZE,
            recent_patterns: DEFAULT_RECENT_PATTERNS,
            stars: 5,
            estimator: EstimatorConfig::default(),
        }
    }
}

/// Result of [`load_config`]
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub config: SentinelConfig,
    /// File the settings came from, `None` for built-in defaults
    pub source: Option<PathBuf>,
    /// Read or parse failures that forced a fallback to defaults
    pub warnings: Vec<String>,
}

/// Load configuration from `explicit` or the search paths, then apply
/// environment overrides read through `lookup`.
pub fn load_config<F>(explicit: Option<&Path>, lookup: F) -> LoadedConfig
where
    F: Fn(&str) -> Option<String>,
{
    let source = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => CONFIG_SEARCH_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists()),
    };

    let mut warnings = Vec::new();
    let config = match &source {
        Some(path) => load_from_path(path).unwrap_or_else(|e| {
            warnings.push(format!("{e}, using defaults"));
            SentinelConfig::default()
        }),
        None => SentinelConfig::default(),
    };

    LoadedConfig {
        config: apply_env_overrides(config, lookup),
        source,
        warnings,
    }
}

/// Parse a config file.
pub fn load_from_path(path: &Path) -> Result<SentinelConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    toml::from_str(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

macro_rules! env_override {
    // String-like field
    ($lookup:expr, $target:expr, $key:expr) => {
        if let Some(v) = $lookup($key) {
            $target = v.into();
        }
    };
    // Parseable field; unparsable values are ignored
    ($lookup:expr, $target:expr, $key:expr, parse) => {
        if let Some(v) = $lookup($key).and_then(|s| s.parse().ok()) {
            $target = v;
        }
    };
}

/// Apply `SENTINEL_<KEY>` overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(mut config: SentinelConfig, lookup: F) -> SentinelConfig
where
    F: Fn(&str) -> Option<String>,
{
    env_override!(lookup, config.log_level, "SENTINEL_LOG_LEVEL");
    env_override!(lookup, config.history_path, "SENTINEL_HISTORY_PATH");
    env_override!(lookup, config.history_capacity, "SENTINEL_HISTORY_CAPACITY", parse);
    env_override!(lookup, config.recent_patterns, "SENTINEL_RECENT_PATTERNS", parse);
    env_override!(lookup, config.stars, "SENTINEL_STARS", parse);
    env_override!(lookup, config.estimator.mines, "SENTINEL_MINES", parse);
    env_override!(lookup, config.estimator.iterations, "SENTINEL_ITERATIONS", parse);
    env_override!(lookup, config.estimator.base_threshold, "SENTINEL_THRESHOLD", parse);
    config
}
