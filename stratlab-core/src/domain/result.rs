//! Backtest result — an immutable performance snapshot.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::config::Timeframe;

/// Synthesized performance statistics for one strategy evaluation.
///
/// Created fresh by every calculator call and never mutated afterwards.
/// Invariant: `total_trades == success_trades + fail_trades`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub strategy_label: String,
    pub total_trades: u32,
    pub success_trades: u32,
    pub fail_trades: u32,
    /// Percent, in `[30, 95]`, one decimal.
    pub success_rate: f64,
    /// Percent, one decimal, at most `success_rate * 0.9`.
    pub target_reach_rate: f64,
    pub avg_profit: f64,
    pub avg_loss: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub timeframe: Timeframe,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl BacktestResult {
    /// Ratio of average profit to average loss (0.0 when there is no loss).
    pub fn profit_loss_ratio(&self) -> f64 {
        if self.avg_loss > 0.0 {
            self.avg_profit / self.avg_loss
        } else {
            0.0
        }
    }
}
