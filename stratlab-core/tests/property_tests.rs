//! Property tests for calculator invariants.
//!
//! Uses proptest to verify, over arbitrary valid configs and seeds:
//! 1. Success rate stays within [30, 95]
//! 2. Trade counts add up and stay within [80, 230)
//! 3. Target reach never exceeds 90% of the success rate
//! 4. Losses and drawdown are positive whenever profit is

use proptest::prelude::*;
use stratlab_core::{BacktestCalculator, Indicator, RiskTolerance, StrategyConfig, Timeframe};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_indicator() -> impl Strategy<Value = Indicator> {
    prop_oneof![
        4 => prop::sample::select(Indicator::catalog().to_vec()),
        1 => "[a-z_]{3,12}".prop_map(Indicator::from),
    ]
}

fn arb_indicators() -> impl Strategy<Value = Vec<Indicator>> {
    prop::collection::vec(arb_indicator(), 1..7).prop_map(|mut v| {
        let mut seen = std::collections::HashSet::new();
        v.retain(|i| seen.insert(i.id().to_string()));
        v
    })
}

fn arb_timeframe() -> impl Strategy<Value = Timeframe> {
    prop_oneof![
        Just(Timeframe::Short),
        Just(Timeframe::Medium),
        Just(Timeframe::Long)
    ]
}

fn arb_config() -> impl Strategy<Value = StrategyConfig> {
    (arb_indicators(), 0.5..60.0_f64, arb_timeframe()).prop_map(|(ind, target, tf)| {
        StrategyConfig::new(ind, (target * 100.0).round() / 100.0, tf, RiskTolerance::Medium)
    })
}

proptest! {
    #[test]
    fn success_rate_is_clamped(config in arb_config(), seed in any::<u64>()) {
        let r = BacktestCalculator::seeded(seed).compute(&config);
        prop_assert!(r.success_rate >= 30.0 && r.success_rate <= 95.0);
    }

    #[test]
    fn trade_counts_are_consistent(config in arb_config(), seed in any::<u64>()) {
        let r = BacktestCalculator::seeded(seed).compute(&config);
        prop_assert!(r.total_trades >= 80 && r.total_trades <= 230);
        prop_assert_eq!(r.success_trades + r.fail_trades, r.total_trades);
    }

    #[test]
    fn target_reach_below_ceiling(config in arb_config(), seed in any::<u64>()) {
        let r = BacktestCalculator::seeded(seed).compute(&config);
        prop_assert!(r.target_reach_rate <= r.success_rate * 0.9 + 1e-9);
    }

    #[test]
    fn losses_positive_with_profit(config in arb_config(), seed in any::<u64>()) {
        let r = BacktestCalculator::seeded(seed).compute(&config);
        prop_assert!(r.avg_profit > 0.0);
        prop_assert!(r.avg_loss > 0.0);
        prop_assert!(r.max_drawdown > 0.0);
    }

    #[test]
    fn label_has_one_part_per_indicator(config in arb_config(), seed in any::<u64>()) {
        let r = BacktestCalculator::seeded(seed).compute(&config);
        prop_assert_eq!(r.strategy_label.split(" + ").count(), config.indicators.len());
    }
}
