//! TOML configuration — service settings and strategy files.
//!
//! Every section of a service config is optional:
//!
//! ```toml
//! [history]
//! capacity = 100
//! default_limit = 10
//!
//! [rng]
//! seed = 42          # omit for non-reproducible runs
//!
//! [optimizer]
//! min_success_rate = 60.0
//! max_drawdown = 10.0
//! ```
//!
//! A strategy file is a `[[strategy]]` array of tables, one `StrategyConfig` each.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use stratlab_core::StrategyConfig;

use crate::ledger::DEFAULT_CAPACITY;
use crate::optimizer::OptimizerThresholds;

/// Default number of entries returned by a history query.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySection {
    pub capacity: usize,
    pub default_limit: usize,
}

impl Default for HistorySection {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            default_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RngSection {
    pub seed: Option<u64>,
}

/// Service settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub history: HistorySection,
    pub rng: RngSection,
    pub optimizer: OptimizerThresholds,
}

impl ServiceConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history.capacity == 0 {
            return Err(ConfigError::Invalid("history.capacity must be at least 1".into()));
        }

        let t = &self.optimizer;
        let all_finite = [
            t.min_success_rate,
            t.min_target_reach_rate,
            t.max_drawdown,
            t.target_return_step,
            t.target_return_floor,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !all_finite {
            return Err(ConfigError::Invalid("optimizer thresholds must be finite".into()));
        }
        if t.target_return_step < 0.0 {
            return Err(ConfigError::Invalid(
                "optimizer.target_return_step must not be negative".into(),
            ));
        }
        if t.target_return_floor <= 0.0 {
            return Err(ConfigError::Invalid(
                "optimizer.target_return_floor must be positive".into(),
            ));
        }

        Ok(())
    }
}

/// A list of strategies to run as a batch.
///
/// Entries are not validated here; the service checks each one as it runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyFile {
    #[serde(rename = "strategy", default)]
    pub strategies: Vec<StrategyConfig>,
}

impl StrategyFile {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}
