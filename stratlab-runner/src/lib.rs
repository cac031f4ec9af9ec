//! StratLab Runner — history ledger, optimizer, service facade, configuration.
//!
//! This crate builds on `stratlab-core` to provide:
//! - A bounded, thread-safe history ledger of backtest results
//! - A rule-based strategy optimizer
//! - `StrategyService`, the validated entry point used by the CLI
//! - TOML service configuration and strategy files
//! - CSV / JSONL export of ledger snapshots

pub mod config;
pub mod export;
pub mod ledger;
pub mod optimizer;
pub mod rng_source;
pub mod service;

pub use config::{ConfigError, ServiceConfig, StrategyFile, DEFAULT_HISTORY_LIMIT};
pub use export::{export_history_csv, export_history_jsonl, save_history, HISTORY_CSV_COLUMNS};
pub use ledger::{HistoryLedger, DEFAULT_CAPACITY};
pub use optimizer::{optimize, propose, Improvement, OptimizationReport, OptimizerThresholds};
pub use rng_source::RngSource;
pub use service::{ServiceError, StrategyService};
