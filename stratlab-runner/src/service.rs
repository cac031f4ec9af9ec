//! Strategy service — the entry points collaborators call.
//!
//! Wraps the calculator, optimizer, presets and history ledger behind one
//! `Send + Sync` value. Each entry point validates its config first; the
//! engine below never re-validates.
//!
//! - `run_backtest()`: compute and record into the ledger.
//! - `run_batch()`: the same for many configs, in parallel via rayon.
//! - `optimize()`: one optimizer round; nothing is recorded.
//! - `history()` / `recommended()`: read-only lookups.

use std::sync::Arc;

use rayon::prelude::*;
use thiserror::Error;

use stratlab_core::{
    calculator, presets_for, BacktestResult, RiskTolerance, StrategyConfig, ValidationError,
};

use crate::config::ServiceConfig;
use crate::ledger::HistoryLedger;
use crate::optimizer::{self, OptimizationReport, OptimizerThresholds};
use crate::rng_source::RngSource;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    #[error("invalid strategy config: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug)]
pub struct StrategyService {
    ledger: Arc<HistoryLedger>,
    rng: RngSource,
    thresholds: OptimizerThresholds,
    default_limit: usize,
}

impl Default for StrategyService {
    fn default() -> Self {
        Self::from_config(&ServiceConfig::default())
    }
}

impl StrategyService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        let ledger = Arc::new(HistoryLedger::with_capacity(config.history.capacity));
        Self::with_ledger(ledger, config)
    }

    /// Service writing into an existing (possibly shared) ledger.
    pub fn with_ledger(ledger: Arc<HistoryLedger>, config: &ServiceConfig) -> Self {
        Self {
            ledger,
            rng: RngSource::from_seed(config.rng.seed),
            thresholds: config.optimizer,
            default_limit: config.history.default_limit,
        }
    }

    pub fn ledger(&self) -> &Arc<HistoryLedger> {
        &self.ledger
    }

    pub fn thresholds(&self) -> &OptimizerThresholds {
        &self.thresholds
    }

    /// Validate, compute and record one backtest.
    pub fn run_backtest(&self, config: &StrategyConfig) -> Result<BacktestResult, ServiceError> {
        let iteration = self.rng.reserve(1);
        self.run_at(config, iteration)
    }

    /// Run many backtests in parallel.
    ///
    /// Output order matches input order. Ledger order follows completion
    /// order. With a seeded source each item gets a fixed iteration index, so
    /// results do not depend on the thread count.
    pub fn run_batch(&self, configs: &[StrategyConfig]) -> Vec<Result<BacktestResult, ServiceError>> {
        let base = self.rng.reserve(configs.len() as u64);
        configs
            .par_iter()
            .enumerate()
            .map(|(i, config)| {
                let outcome = self.run_at(config, base + i as u64);
                if let Err(err) = &outcome {
                    tracing::warn!(index = i, %err, "batch entry rejected");
                }
                outcome
            })
            .collect()
    }

    fn run_at(&self, config: &StrategyConfig, iteration: u64) -> Result<BacktestResult, ServiceError> {
        config.validate()?;

        let hash = config.config_hash();
        let mut rng = self.rng.rng_at(&hash, iteration);
        let result = calculator::compute(config, &mut rng);

        tracing::info!(
            config = hash.short(),
            strategy = %result.strategy_label,
            success_rate = result.success_rate,
            total_trades = result.total_trades,
            "backtest completed"
        );

        self.ledger.record(result.clone());
        Ok(result)
    }

    /// Validate and run one optimizer round. Neither evaluation is recorded.
    pub fn optimize(&self, config: &StrategyConfig) -> Result<OptimizationReport, ServiceError> {
        config.validate()?;

        let hash = config.config_hash();
        let mut rng = self.rng.next_rng(&hash);
        let report = optimizer::optimize(config, &mut rng, &self.thresholds);

        tracing::info!(
            config = hash.short(),
            improvements = report.improvements.len(),
            original = report.original_result.success_rate,
            optimized = report.optimized_result.success_rate,
            "optimization completed"
        );

        Ok(report)
    }

    /// Up to `limit` most recent results, newest first.
    pub fn history(&self, limit: usize) -> Vec<BacktestResult> {
        self.ledger.list(limit)
    }

    /// History with the configured default limit.
    pub fn history_default(&self) -> Vec<BacktestResult> {
        self.history(self.default_limit)
    }

    pub fn recommended(&self, risk: RiskTolerance) -> Vec<StrategyConfig> {
        presets_for(risk)
    }
}
