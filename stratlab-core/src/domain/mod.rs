//! Domain types for the strategy backtest engine.

pub mod config;
pub mod ids;
pub mod result;

pub use config::{RiskTolerance, StrategyConfig, Timeframe, TurnoverRange, ValidationError};
pub use ids::ConfigHash;
pub use result::BacktestResult;
