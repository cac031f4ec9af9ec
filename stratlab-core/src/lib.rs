//! StratLab Core — domain types, indicator catalog, backtest calculator, presets.
//!
//! This crate holds the pure side of the strategy engine:
//! - Domain types (strategy config, backtest result, config hash)
//! - Indicator catalog with curated weights and a default fallback
//! - Backtest calculator driven by an injected random source
//! - Seed hierarchy for reproducible, order-independent randomness
//! - Preset catalog keyed by risk tolerance
//!
//! Shared state (the history ledger) and the optimizer live in `stratlab-runner`.

pub mod calculator;
pub mod domain;
pub mod indicator;
pub mod presets;
pub mod rng;

pub use calculator::{compute, compute_at, BacktestCalculator};
pub use domain::{
    BacktestResult, ConfigHash, RiskTolerance, StrategyConfig, Timeframe, TurnoverRange,
    ValidationError,
};
pub use indicator::{display_name_of, weight_of, Indicator, DEFAULT_WEIGHT};
pub use presets::{presets_for, StrategyPreset};
pub use rng::SeedHierarchy;
