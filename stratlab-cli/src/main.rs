//! StratLab CLI — run, optimize, presets and batch commands.
//!
//! Commands:
//! - `run` — score one strategy (from flags or a named preset) and print the result
//! - `optimize` — one optimizer round with the list of applied improvements
//! - `presets` — recommended strategies for a risk tier
//! - `batch` — run every strategy in a TOML file, then print the history ledger
//!
//! Logging goes to stderr, filtered by `STRATLAB_LOG` (default `warn`).

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use stratlab_core::{
    BacktestResult, Indicator, RiskTolerance, StrategyConfig, StrategyPreset, Timeframe,
};
use stratlab_runner::{save_history, OptimizationReport, ServiceConfig, StrategyFile, StrategyService};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "stratlab",
    about = "StratLab CLI — strategy backtest scoring and optimization"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one strategy and print the synthesized backtest result.
    Run {
        #[command(flatten)]
        strategy: StrategyArgs,

        #[command(flatten)]
        service: ServiceArgs,

        /// Print a JSON envelope instead of the text summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Run one optimizer round and report the applied adjustments.
    Optimize {
        #[command(flatten)]
        strategy: StrategyArgs,

        #[command(flatten)]
        service: ServiceArgs,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List the recommended strategies for a risk tier.
    Presets {
        /// Risk tier: low, medium or high.
        #[arg(long, default_value = "medium")]
        risk: RiskTolerance,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Run every strategy in a TOML file, then print the history ledger.
    Batch {
        /// TOML file with a [[strategy]] array.
        #[arg(long)]
        strategies: PathBuf,

        #[command(flatten)]
        service: ServiceArgs,

        /// Number of history entries to print. Defaults to the configured limit.
        #[arg(long)]
        limit: Option<usize>,

        /// Write the printed history to this path (.csv or JSONL).
        #[arg(long)]
        export: Option<PathBuf>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Args)]
struct StrategyArgs {
    /// Named preset: steady_trend, band_breakout, momentum_confirm,
    /// oscillator_trend, aggressive_breakout, fast_swing.
    #[arg(long)]
    preset: Option<String>,

    /// Comma-separated indicator ids (e.g. macd_golden_cross,rsi_above_50).
    #[arg(long, value_delimiter = ',')]
    indicators: Vec<Indicator>,

    /// Target return per trade, in percent. Overrides a preset's target.
    #[arg(long)]
    target_return: Option<f64>,

    /// Holding horizon: short, medium or long. Defaults to medium;
    /// overrides a preset's horizon.
    #[arg(long)]
    timeframe: Option<Timeframe>,

    /// Risk tier: low, medium or high. Defaults to medium;
    /// overrides a preset's tier.
    #[arg(long)]
    risk: Option<RiskTolerance>,

    /// Advisory turnover band as LOW,HIGH.
    #[arg(long, value_delimiter = ',')]
    turnover: Vec<f64>,
}

#[derive(Args)]
struct ServiceArgs {
    /// Service config TOML ([history], [rng], [optimizer]).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Master seed; overrides [rng].seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
}

/// Response envelope for `--json` output.
#[derive(Serialize)]
struct Envelope<T: Serialize> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    timestamp: String,
}

impl<T: Serialize> Envelope<T> {
    fn ok(data: T, message: Option<String>) -> Self {
        Self {
            success: true,
            data,
            message,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn print(&self) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(self)?);
        Ok(())
    }
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            strategy,
            service,
            json,
        } => run_backtest_cmd(&strategy, &service, json),
        Commands::Optimize {
            strategy,
            service,
            json,
        } => run_optimize_cmd(&strategy, &service, json),
        Commands::Presets { risk, json } => run_presets_cmd(risk, json),
        Commands::Batch {
            strategies,
            service,
            limit,
            export,
            json,
        } => run_batch_cmd(&strategies, &service, limit, export.as_deref(), json),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("STRATLAB_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_service(args: &ServiceArgs) -> Result<StrategyService> {
    let mut config = match &args.config {
        Some(path) => ServiceConfig::from_file(path)
            .with_context(|| format!("loading service config {}", path.display()))?,
        None => ServiceConfig::default(),
    };
    if args.seed.is_some() {
        config.rng.seed = args.seed;
    }
    tracing::debug!(
        seeded = config.rng.seed.is_some(),
        capacity = config.history.capacity,
        "service configured"
    );
    Ok(StrategyService::from_config(&config))
}

fn build_strategy(args: &StrategyArgs) -> Result<StrategyConfig> {
    // Validate mutually exclusive options
    if args.preset.is_some() && !args.indicators.is_empty() {
        bail!("--preset and --indicators are mutually exclusive");
    }

    let mut config = if let Some(name) = &args.preset {
        match StrategyPreset::from_name(name) {
            Some(preset) => preset.to_config(),
            None => {
                let valid: Vec<&str> = StrategyPreset::all().iter().map(|p| p.name()).collect();
                bail!("unknown preset '{name}'. Valid: {}", valid.join(", "));
            }
        }
    } else {
        if args.indicators.is_empty() {
            bail!("one of --preset or --indicators is required");
        }
        let Some(target_return) = args.target_return else {
            bail!("--target-return is required with --indicators");
        };
        StrategyConfig::new(
            args.indicators.clone(),
            target_return,
            Timeframe::Medium,
            RiskTolerance::default(),
        )
    };

    // Explicit flags win over preset values.
    if let Some(target_return) = args.target_return {
        config.target_return = target_return;
    }
    if let Some(timeframe) = args.timeframe {
        config.timeframe = timeframe;
    }
    if let Some(risk) = args.risk {
        config.risk_tolerance = risk;
    }

    match args.turnover.as_slice() {
        [] => {}
        [low, high] => config.turnover_rate = Some((*low, *high).into()),
        _ => bail!("--turnover takes exactly two values: LOW,HIGH"),
    }

    Ok(config)
}

fn run_backtest_cmd(strategy: &StrategyArgs, service: &ServiceArgs, json: bool) -> Result<()> {
    let config = build_strategy(strategy)?;
    let service = build_service(service)?;
    let result = service.run_backtest(&config)?;

    if json {
        return Envelope::ok(&result, Some("Backtest completed successfully".into())).print();
    }
    println!("Config hash:    {}", config.config_hash().short());
    print_summary(&result);
    Ok(())
}

fn run_optimize_cmd(strategy: &StrategyArgs, service: &ServiceArgs, json: bool) -> Result<()> {
    let config = build_strategy(strategy)?;
    let service = build_service(service)?;
    let report = service.optimize(&config)?;

    if json {
        let message = (!report.improvements.is_empty()).then(|| report.notes().join("; "));
        return Envelope::ok(&report, message).print();
    }
    print_optimization(&report);
    Ok(())
}

fn run_presets_cmd(risk: RiskTolerance, json: bool) -> Result<()> {
    let presets = StrategyPreset::for_risk(risk);

    if json {
        let configs: Vec<StrategyConfig> = presets.iter().map(|p| p.to_config()).collect();
        return Envelope::ok(configs, None).print();
    }

    println!("Recommended strategies ({risk} risk):");
    for preset in presets {
        print_config(preset.name(), &preset.to_config());
    }
    Ok(())
}

fn run_batch_cmd(
    strategies_path: &Path,
    service: &ServiceArgs,
    limit: Option<usize>,
    export: Option<&Path>,
    json: bool,
) -> Result<()> {
    let file = StrategyFile::from_file(strategies_path)
        .with_context(|| format!("loading strategies {}", strategies_path.display()))?;
    if file.strategies.is_empty() {
        bail!("no [[strategy]] entries in {}", strategies_path.display());
    }

    let service = build_service(service)?;
    let outcomes = service.run_batch(&file.strategies);

    let failed: Vec<String> = outcomes
        .iter()
        .enumerate()
        .filter_map(|(i, o)| o.as_ref().err().map(|e| format!("strategy #{}: {e}", i + 1)))
        .collect();

    let history = match limit {
        Some(n) => service.history(n),
        None => service.history_default(),
    };

    if let Some(path) = export {
        save_history(&history, path)?;
    }

    if json {
        let message = (!failed.is_empty()).then(|| failed.join("; "));
        return Envelope::ok(&history, message).print();
    }

    println!(
        "Ran {} strateg{} ({} failed).",
        outcomes.len(),
        if outcomes.len() == 1 { "y" } else { "ies" },
        failed.len()
    );
    for line in &failed {
        eprintln!("Error for {line}");
    }
    print_history(&history);
    if let Some(path) = export {
        println!("History saved to: {}", path.display());
    }
    Ok(())
}

fn print_summary(result: &BacktestResult) {
    println!();
    println!("=== Backtest Result ===");
    println!("Strategy:       {}", result.strategy_label);
    println!("Timeframe:      {}", result.timeframe);
    println!("Period:         {} to {}", result.start_date, result.end_date);
    println!(
        "Trades:         {} ({} won, {} lost)",
        result.total_trades, result.success_trades, result.fail_trades
    );
    println!();
    println!("--- Performance ---");
    println!("Success Rate:   {:.1}%", result.success_rate);
    println!("Target Reach:   {:.1}%", result.target_reach_rate);
    println!("Avg Profit:     {:.2}%", result.avg_profit);
    println!("Avg Loss:       {:.2}%", result.avg_loss);
    println!("Max Drawdown:   {:.2}%", result.max_drawdown);
    println!("Sharpe:         {:.3}", result.sharpe_ratio);
    println!();
}

fn print_optimization(report: &OptimizationReport) {
    println!();
    println!("=== Original ===");
    print_summary(&report.original_result);

    if report.improvements.is_empty() {
        println!("No adjustments: the strategy already meets every threshold.");
        return;
    }

    println!("=== Adjustments ===");
    for improvement in &report.improvements {
        println!("  - {improvement}");
    }
    print_config("optimized", &report.optimized_config);

    println!("=== Optimized ===");
    print_summary(&report.optimized_result);
    println!("Success rate change: {:+.1} pts", report.success_rate_delta());
}

fn print_config(name: &str, config: &StrategyConfig) {
    println!();
    println!("[{name}]");
    println!("  Indicators:     {}", config.strategy_label());
    println!("  Target Return:  {:.1}%", config.target_return);
    println!("  Timeframe:      {}", config.timeframe);
    println!("  Risk:           {}", config.risk_tolerance);
    if let Some(range) = config.turnover_rate {
        println!("  Turnover:       {:.1} to {:.1}", range.low, range.high);
    }
}

fn print_history(history: &[BacktestResult]) {
    if history.is_empty() {
        println!("History is empty.");
        return;
    }

    println!();
    println!(
        "{:<4} {:<44} {:<7} {:>7} {:>8} {:>8} {:>8}",
        "#", "Strategy", "Frame", "Trades", "Success", "Reach", "Sharpe"
    );
    println!("{}", "-".repeat(90));
    for (i, r) in history.iter().enumerate() {
        println!(
            "{:<4} {:<44} {:<7} {:>7} {:>7.1}% {:>7.1}% {:>8.3}",
            i + 1,
            truncate(&r.strategy_label, 44),
            r.timeframe.as_str(),
            r.total_trades,
            r.success_rate,
            r.target_reach_rate,
            r.sharpe_ratio
        );
    }
    println!();
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy_from(args: &[&str]) -> Result<StrategyConfig> {
        let cli = Cli::try_parse_from(["stratlab", "run"].iter().chain(args))?;
        match cli.command {
            Commands::Run { strategy, .. } => build_strategy(&strategy),
            _ => bail!("expected run"),
        }
    }

    #[test]
    fn preset_takes_timeframe_and_risk_overrides() {
        let config =
            strategy_from(&["--preset", "fast_swing", "--timeframe", "long", "--risk", "low"]).unwrap();
        let preset = StrategyPreset::FastSwing.to_config();
        assert_eq!(config.indicators, preset.indicators);
        assert_eq!(config.target_return, preset.target_return);
        assert_eq!(config.timeframe, Timeframe::Long);
        assert_eq!(config.risk_tolerance, RiskTolerance::Low);
    }

    #[test]
    fn preset_without_overrides_is_unchanged() {
        let config = strategy_from(&["--preset", "fast_swing"]).unwrap();
        assert_eq!(config, StrategyPreset::FastSwing.to_config());
    }

    #[test]
    fn indicators_default_to_medium() {
        let config = strategy_from(&[
            "--indicators",
            "macd_golden_cross,rsi_above_50",
            "--target-return",
            "10",
            "--turnover",
            "1,5",
        ])
        .unwrap();
        assert_eq!(config.indicators, vec![Indicator::MacdGoldenCross, Indicator::RsiAbove50]);
        assert_eq!(config.timeframe, Timeframe::Medium);
        assert_eq!(config.risk_tolerance, RiskTolerance::Medium);
        assert_eq!(config.turnover_rate.map(|r| (r.low, r.high)), Some((1.0, 5.0)));
    }

    #[test]
    fn preset_and_indicators_conflict() {
        assert!(strategy_from(&["--preset", "fast_swing", "--indicators", "ma_bullish"]).is_err());
        assert!(strategy_from(&["--indicators", "ma_bullish"]).is_err());
    }
}
