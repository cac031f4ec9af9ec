//! Strategy optimizer — one round of rule-based config adjustment.
//!
//! Evaluates the config, applies up to three heuristic rules to a copy, and
//! evaluates the copy again. Both evaluations draw fresh randomness, so the
//! optimized result is not guaranteed to beat the original; the report says
//! what changed, not whether it helped. Neither result is recorded anywhere.
//!
//! Rules, checked against the original result:
//! - success rate below `min_success_rate` and no MA-bullish filter → add it
//! - target reach below `min_target_reach_rate` → lower the target return
//! - drawdown above `max_drawdown` on a short timeframe → move to medium

use std::fmt;

use chrono::{NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use stratlab_core::{calculator, BacktestResult, Indicator, StrategyConfig, Timeframe};

/// Rule thresholds. Defaults match the production heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerThresholds {
    pub min_success_rate: f64,
    pub min_target_reach_rate: f64,
    pub max_drawdown: f64,
    /// Points subtracted from the target return.
    pub target_return_step: f64,
    /// The lowered target return never goes below this.
    pub target_return_floor: f64,
}

impl Default for OptimizerThresholds {
    fn default() -> Self {
        Self {
            min_success_rate: 60.0,
            min_target_reach_rate: 50.0,
            max_drawdown: 10.0,
            target_return_step: 2.0,
            target_return_floor: 5.0,
        }
    }
}

/// One adjustment applied by the optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Improvement {
    AddedTrendFilter,
    LoweredTargetReturn,
    ExtendedHorizon,
}

impl Improvement {
    pub fn note(self) -> &'static str {
        match self {
            Self::AddedTrendFilter => {
                "added moving-average bullish filter to raise signal quality"
            }
            Self::LoweredTargetReturn => {
                "lowered target return to raise attainment probability"
            }
            Self::ExtendedHorizon => "extended holding horizon to dampen short-term volatility",
        }
    }
}

impl fmt::Display for Improvement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.note())
    }
}

/// Outcome of one optimization round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub original_result: BacktestResult,
    pub optimized_config: StrategyConfig,
    pub optimized_result: BacktestResult,
    /// Rules that fired, in rule order.
    pub improvements: Vec<Improvement>,
}

impl OptimizationReport {
    /// Optimized minus original success rate. Reporting only.
    pub fn success_rate_delta(&self) -> f64 {
        self.optimized_result.success_rate - self.original_result.success_rate
    }

    pub fn notes(&self) -> Vec<&'static str> {
        self.improvements.iter().map(|i| i.note()).collect()
    }
}

/// Apply the rules to a copy of `config`, judged by `original`.
pub fn propose(
    config: &StrategyConfig,
    original: &BacktestResult,
    thresholds: &OptimizerThresholds,
) -> (StrategyConfig, Vec<Improvement>) {
    let mut optimized = config.clone();
    let mut improvements = Vec::new();

    if original.success_rate < thresholds.min_success_rate
        && !optimized.contains(&Indicator::MaBullish)
    {
        optimized.indicators.push(Indicator::MaBullish);
        improvements.push(Improvement::AddedTrendFilter);
        tracing::debug!(success_rate = original.success_rate, "optimizer: adding ma_bullish");
    }

    if original.target_reach_rate < thresholds.min_target_reach_rate {
        optimized.target_return = (config.target_return - thresholds.target_return_step)
            .max(thresholds.target_return_floor);
        improvements.push(Improvement::LoweredTargetReturn);
        tracing::debug!(
            from = config.target_return,
            to = optimized.target_return,
            "optimizer: lowering target return"
        );
    }

    if original.max_drawdown > thresholds.max_drawdown && config.timeframe == Timeframe::Short {
        optimized.timeframe = Timeframe::Medium;
        improvements.push(Improvement::ExtendedHorizon);
        tracing::debug!(max_drawdown = original.max_drawdown, "optimizer: extending horizon");
    }

    (optimized, improvements)
}

/// Run one optimization round with an explicit end date.
pub fn optimize_at<R: Rng + ?Sized>(
    config: &StrategyConfig,
    rng: &mut R,
    thresholds: &OptimizerThresholds,
    end_date: NaiveDate,
) -> OptimizationReport {
    let original_result = calculator::compute_at(config, rng, end_date);
    let (optimized_config, improvements) = propose(config, &original_result, thresholds);
    let optimized_result = calculator::compute_at(&optimized_config, rng, end_date);

    OptimizationReport {
        original_result,
        optimized_config,
        optimized_result,
        improvements,
    }
}

/// Run one optimization round, ending the history window today (UTC).
pub fn optimize<R: Rng + ?Sized>(
    config: &StrategyConfig,
    rng: &mut R,
    thresholds: &OptimizerThresholds,
) -> OptimizationReport {
    optimize_at(config, rng, thresholds, Utc::now().date_naive())
}
