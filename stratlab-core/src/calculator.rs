//! Backtest calculator — `StrategyConfig → BacktestResult`.
//!
//! The success rate is a deterministic score of the config:
//!
//! 1. `base = 50 + Σ weight(indicator)`
//! 2. combo bonus: with 3+ indicators, `base += min(n * 2, 10)`
//! 3. target damping: `base -= 2 * max(0, target_return - 5)`
//! 4. `raw = base * timeframe multiplier` (1.1 / 0.95 / 0.85)
//! 5. `success_rate = clamp(raw, 30, 95)`, one decimal
//!
//! Everything after that (trade count, target reach, profit/loss, drawdown,
//! Sharpe) is drawn from the injected random source. Two calls with the same
//! config and an unseeded source give different results; tests assert ranges
//! and invariants, or pin a seed.

use chrono::{Months, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::{BacktestResult, StrategyConfig};

pub const BASE_SCORE: f64 = 50.0;
pub const MIN_SUCCESS_RATE: f64 = 30.0;
pub const MAX_SUCCESS_RATE: f64 = 95.0;
/// Combo bonus applies from this many indicators on.
pub const COMBO_MIN_INDICATORS: usize = 3;
pub const COMBO_BONUS_CAP: f64 = 10.0;
/// Target returns above this level reduce the score.
pub const TARGET_RETURN_PIVOT: f64 = 5.0;
pub const TARGET_RETURN_PENALTY: f64 = 2.0;
/// Total trades are drawn from `MIN_TRADES..MAX_TRADES`.
pub const MIN_TRADES: u32 = 80;
pub const MAX_TRADES: u32 = 230;
/// Upper bound of the target-reach multiplier.
pub const TARGET_REACH_CEILING: f64 = 0.9;
/// Length of the synthesized history window.
pub const HISTORY_MONTHS: u32 = 24;

// ─── Deterministic scoring ──────────────────────────────────────────

/// Steps 1–3: indicator weights, combo bonus and target-return damping.
pub fn base_score(config: &StrategyConfig) -> f64 {
    let weights: u32 = config.indicators.iter().map(|i| i.weight()).sum();
    let mut base = BASE_SCORE + f64::from(weights);

    let n = config.indicators.len();
    if n >= COMBO_MIN_INDICATORS {
        base += (n as f64 * 2.0).min(COMBO_BONUS_CAP);
    }

    base += target_impact(config.target_return);
    base
}

/// Score adjustment for the target return: zero up to 5%, then −2 per point.
pub fn target_impact(target_return: f64) -> f64 {
    -TARGET_RETURN_PENALTY * (target_return - TARGET_RETURN_PIVOT).max(0.0)
}

/// Step 4: base score scaled by the timeframe multiplier, before clamping.
pub fn raw_success_rate(config: &StrategyConfig) -> f64 {
    base_score(config) * f64::from(config.timeframe.multiplier_pct()) / 100.0
}

/// Step 5 without rounding.
fn clamped_success_rate(config: &StrategyConfig) -> f64 {
    raw_success_rate(config).clamp(MIN_SUCCESS_RATE, MAX_SUCCESS_RATE)
}

/// Step 5: the reported success rate.
pub fn success_rate(config: &StrategyConfig) -> f64 {
    round_dp(clamped_success_rate(config), 1)
}

// ─── Full evaluation ────────────────────────────────────────────────

/// Evaluate a config with an explicit random source and end date.
///
/// Never fails for a structurally valid config. Validation is the caller's job.
pub fn compute_at<R: Rng + ?Sized>(
    config: &StrategyConfig,
    rng: &mut R,
    end_date: NaiveDate,
) -> BacktestResult {
    let rate = clamped_success_rate(config);
    let success_rate = round_dp(rate, 1);

    let total_trades = rng.gen_range(MIN_TRADES..MAX_TRADES);
    let success_trades = (f64::from(total_trades) * rate / 100.0).floor() as u32;
    let fail_trades = total_trades - success_trades;

    let reach_cap = floor_dp(success_rate * TARGET_REACH_CEILING, 1);
    let target_reach_rate =
        round_dp(rate * rng.gen_range(0.6..TARGET_REACH_CEILING), 1).min(reach_cap);

    let avg_profit = config.target_return * rng.gen_range(0.8..1.2);
    let avg_loss = avg_profit * rng.gen_range(0.2..0.5);
    let max_drawdown = avg_loss * rng.gen_range(1.5..3.5);

    let profit_loss = if avg_loss == 0.0 {
        0.0
    } else {
        avg_profit / avg_loss
    };
    let sharpe_ratio = profit_loss * (rate / 100.0) * rng.gen_range(0.8..1.3);

    let start_date = end_date
        .checked_sub_months(Months::new(HISTORY_MONTHS))
        .unwrap_or(end_date);

    tracing::trace!(
        indicators = config.indicators.len(),
        success_rate,
        total_trades,
        "computed backtest"
    );

    BacktestResult {
        strategy_label: config.strategy_label(),
        total_trades,
        success_trades,
        fail_trades,
        success_rate,
        target_reach_rate,
        avg_profit: round_dp(avg_profit, 2),
        avg_loss: round_positive(avg_loss, 2),
        max_drawdown: round_positive(max_drawdown, 2),
        sharpe_ratio: round_dp(sharpe_ratio, 3),
        timeframe: config.timeframe,
        start_date,
        end_date,
    }
}

/// Evaluate a config, ending the history window today (UTC).
pub fn compute<R: Rng + ?Sized>(config: &StrategyConfig, rng: &mut R) -> BacktestResult {
    compute_at(config, rng, Utc::now().date_naive())
}

/// Calculator that owns its random source.
///
/// `BacktestCalculator::seeded(42)` replays the same sequence of results for the
/// same sequence of configs; `from_entropy()` does not.
#[derive(Debug, Clone)]
pub struct BacktestCalculator<R> {
    rng: R,
}

impl<R: Rng> BacktestCalculator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn compute(&mut self, config: &StrategyConfig) -> BacktestResult {
        compute(config, &mut self.rng)
    }

    pub fn compute_at(&mut self, config: &StrategyConfig, end_date: NaiveDate) -> BacktestResult {
        compute_at(config, &mut self.rng, end_date)
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

impl BacktestCalculator<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

// ─── Rounding helpers ───────────────────────────────────────────────

/// Round half away from zero to `dp` decimals.
pub fn round_dp(value: f64, dp: i32) -> f64 {
    let factor = 10f64.powi(dp);
    (value * factor).round() / factor
}

fn floor_dp(value: f64, dp: i32) -> f64 {
    let factor = 10f64.powi(dp);
    (value * factor).floor() / factor
}

/// Like `round_dp`, but a positive value never rounds down to zero.
fn round_positive(value: f64, dp: i32) -> f64 {
    let rounded = round_dp(value, dp);
    if value > 0.0 && rounded <= 0.0 {
        10f64.powi(-dp)
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RiskTolerance, Timeframe};

    fn config(ids: &[&str], target: f64, timeframe: Timeframe) -> StrategyConfig {
        StrategyConfig::new(ids.iter().copied(), target, timeframe, RiskTolerance::Medium)
    }

    #[test]
    fn target_impact_is_zero_up_to_pivot() {
        assert_eq!(target_impact(3.0), 0.0);
        assert_eq!(target_impact(5.0), 0.0);
        assert_eq!(target_impact(10.0), -10.0);
        assert_eq!(target_impact(7.5), -5.0);
    }

    #[test]
    fn combo_bonus_needs_three_indicators() {
        let two = config(&["obv_rising", "adx_above_25"], 5.0, Timeframe::Medium);
        assert_eq!(base_score(&two), 50.0 + 8.0 + 11.0);

        let three = config(&["obv_rising", "adx_above_25", "rsi_above_50"], 5.0, Timeframe::Medium);
        assert_eq!(base_score(&three), 50.0 + 8.0 + 11.0 + 10.0 + 6.0);
    }

    #[test]
    fn combo_bonus_caps_at_ten() {
        let six = config(
            &["a", "b", "c", "d", "e", "f"],
            5.0,
            Timeframe::Medium,
        );
        assert_eq!(base_score(&six), 50.0 + 6.0 * 5.0 + 10.0);
    }

    #[test]
    fn success_rate_clamps_low() {
        let weak = config(&["unknown"], 40.0, Timeframe::Long);
        assert_eq!(success_rate(&weak), MIN_SUCCESS_RATE);
    }

    #[test]
    fn trades_add_up() {
        let mut calc = BacktestCalculator::seeded(1);
        let c = config(&["ma_bullish", "volume_increase"], 8.0, Timeframe::Short);
        for _ in 0..50 {
            let r = calc.compute(&c);
            assert_eq!(r.total_trades, r.success_trades + r.fail_trades);
            assert!((MIN_TRADES..MAX_TRADES).contains(&r.total_trades));
        }
    }

    #[test]
    fn seeded_calculators_agree() {
        let end = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let c = config(&["kdj_golden_cross"], 12.0, Timeframe::Medium);
        let a = BacktestCalculator::seeded(9).compute_at(&c, end);
        let b = BacktestCalculator::seeded(9).compute_at(&c, end);
        assert_eq!(a, b);
    }

    #[test]
    fn start_date_is_two_calendar_years_back() {
        let mut calc = BacktestCalculator::seeded(3);
        let c = config(&["ma_bullish"], 6.0, Timeframe::Long);

        let r = calc.compute_at(&c, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(r.start_date, NaiveDate::from_ymd_opt(2024, 10, 19).unwrap());

        let leap = calc.compute_at(&c, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(leap.start_date, NaiveDate::from_ymd_opt(2022, 2, 28).unwrap());
    }

    #[test]
    fn tiny_target_keeps_losses_positive() {
        let mut calc = BacktestCalculator::seeded(5);
        let c = config(&["rsi_above_50"], 0.001, Timeframe::Short);
        for _ in 0..20 {
            let r = calc.compute(&c);
            assert!(r.avg_loss > 0.0);
            assert!(r.max_drawdown > 0.0);
        }
    }

    #[test]
    fn rounding_helpers() {
        assert_eq!(round_dp(75.65, 1), 75.7);
        assert_eq!(round_dp(52.25, 1), 52.3);
        assert_eq!(round_dp(1.23456, 3), 1.235);
        assert_eq!(round_positive(0.001, 2), 0.01);
        assert_eq!(round_positive(0.0, 2), 0.0);
        assert_eq!(floor_dp(85.59, 1), 85.5);
    }
}
