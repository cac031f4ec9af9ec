//! History export — CSV and JSONL snapshots of ledger contents.
//!
//! The ledger itself never touches disk. Callers that want a copy take a
//! `list()` snapshot and hand it here.

use std::path::Path;

use anyhow::{Context, Result};
use stratlab_core::BacktestResult;

/// CSV columns, in `BacktestResult` field order.
pub const HISTORY_CSV_COLUMNS: [&str; 13] = [
    "strategy_label",
    "total_trades",
    "success_trades",
    "fail_trades",
    "success_rate",
    "target_reach_rate",
    "avg_profit",
    "avg_loss",
    "max_drawdown",
    "sharpe_ratio",
    "timeframe",
    "start_date",
    "end_date",
];

/// CSV with a header row and one row per result, newest first.
///
/// The header is written even when `results` is empty.
pub fn export_history_csv(results: &[BacktestResult]) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);
    wtr.write_record(HISTORY_CSV_COLUMNS)?;
    for result in results {
        wtr.serialize(result)?;
    }
    let bytes = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// One JSON object per line.
pub fn export_history_jsonl(results: &[BacktestResult]) -> Result<String> {
    let mut out = String::new();
    for result in results {
        let line = serde_json::to_string(result).context("failed to serialize BacktestResult")?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

/// Write results to `path`: CSV for a `.csv` extension, JSONL otherwise.
pub fn save_history(results: &[BacktestResult], path: &Path) -> Result<()> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let content = if is_csv {
        export_history_csv(results)?
    } else {
        export_history_jsonl(results)?
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;

    tracing::info!(path = %path.display(), rows = results.len(), "history exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use stratlab_core::Timeframe;

    fn sample(label: &str) -> BacktestResult {
        BacktestResult {
            strategy_label: label.into(),
            total_trades: 120,
            success_trades: 80,
            fail_trades: 40,
            success_rate: 66.7,
            target_reach_rate: 50.1,
            avg_profit: 9.5,
            avg_loss: 2.75,
            max_drawdown: 6.1,
            sharpe_ratio: 2.304,
            timeframe: Timeframe::Long,
            start_date: NaiveDate::from_ymd_opt(2023, 5, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
        }
    }

    #[test]
    fn csv_has_header_and_rows() {
        let csv = export_history_csv(&[sample("A + B"), sample("C")]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("strategy_label,total_trades,success_trades"));
        assert!(lines[1].starts_with("A + B,120,80,40,66.7"));
        assert!(lines[1].contains(",long,2023-05-01,2025-05-01"));
    }

    #[test]
    fn empty_history_still_has_header() {
        let csv = export_history_csv(&[]).unwrap();
        assert_eq!(csv, format!("{}\n", HISTORY_CSV_COLUMNS.join(",")));

        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("empty.csv");
        save_history(&[], &path).unwrap();
        assert!(std::fs::read_to_string(path).unwrap().starts_with("strategy_label,"));
    }

    #[test]
    fn header_matches_serialized_field_names() {
        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.serialize(sample("A")).unwrap();
        let derived = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        assert_eq!(derived.lines().next(), Some(HISTORY_CSV_COLUMNS.join(",").as_str()));
    }

    #[test]
    fn jsonl_parses_back_line_by_line() {
        let jsonl = export_history_jsonl(&[sample("A"), sample("B")]).unwrap();
        let parsed: Vec<BacktestResult> = jsonl
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(parsed, vec![sample("A"), sample("B")]);
    }

    #[test]
    fn save_picks_format_by_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let csv_path = tmp.path().join("out/history.csv");
        let jsonl_path = tmp.path().join("history.jsonl");

        save_history(&[sample("A")], &csv_path).unwrap();
        save_history(&[sample("A")], &jsonl_path).unwrap();

        let csv = std::fs::read_to_string(csv_path).unwrap();
        assert!(csv.starts_with("strategy_label"));
        let jsonl = std::fs::read_to_string(jsonl_path).unwrap();
        assert!(jsonl.starts_with('{'));
    }
}
