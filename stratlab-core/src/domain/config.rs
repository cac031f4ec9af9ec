//! Strategy configuration — the input to the calculator and optimizer.
//!
//! `StrategyConfig` is plain data. `validate()` is the gate callers run at
//! their boundary; the calculator itself assumes a well-formed config and
//! never re-checks it.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ids::ConfigHash;
use crate::indicator::Indicator;

/// Reasons a config is rejected before it reaches the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("indicators are required and must be a non-empty list")]
    EmptyIndicators,
    #[error("target return must be a positive number, got {0}")]
    NonPositiveTargetReturn(f64),
    #[error("indicator '{0}' listed more than once")]
    DuplicateIndicator(String),
    #[error("invalid turnover range [{low}, {high}]")]
    InvalidTurnoverRange { low: f64, high: f64 },
    #[error("unknown timeframe '{0}' (expected short, medium or long)")]
    UnknownTimeframe(String),
    #[error("unknown risk tolerance '{0}' (expected low, medium or high)")]
    UnknownRiskTolerance(String),
}

// ─── Timeframe ──────────────────────────────────────────────────────

/// Holding horizon tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Short,
    Medium,
    Long,
}

impl Timeframe {
    /// Success-score multiplier as an integer percentage (110 / 95 / 85).
    ///
    /// Kept integral so `base * pct / 100` lands on the nearest decimal value
    /// before rounding (89 × 85 / 100 = 75.65 exactly as displayed).
    pub fn multiplier_pct(self) -> u32 {
        match self {
            Self::Short => 110,
            Self::Medium => 95,
            Self::Long => 85,
        }
    }

    pub fn multiplier(self) -> f64 {
        f64::from(self.multiplier_pct()) / 100.0
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }
}

impl FromStr for Timeframe {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "medium" => Ok(Self::Medium),
            "long" => Ok(Self::Long),
            _ => Err(ValidationError::UnknownTimeframe(s.to_string())),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── RiskTolerance ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskTolerance {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn all() -> [RiskTolerance; 3] {
        [Self::Low, Self::Medium, Self::High]
    }
}

impl FromStr for RiskTolerance {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ValidationError::UnknownRiskTolerance(s.to_string())),
        }
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── TurnoverRange ──────────────────────────────────────────────────

/// Inclusive turnover-rate band `[low, high]`. Advisory only.
///
/// Serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct TurnoverRange {
    pub low: f64,
    pub high: f64,
}

impl TurnoverRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn is_valid(&self) -> bool {
        self.low.is_finite() && self.high.is_finite() && 0.0 <= self.low && self.low <= self.high
    }
}

impl From<(f64, f64)> for TurnoverRange {
    fn from((low, high): (f64, f64)) -> Self {
        Self { low, high }
    }
}

impl From<TurnoverRange> for (f64, f64) {
    fn from(range: TurnoverRange) -> Self {
        (range.low, range.high)
    }
}

// ─── StrategyConfig ─────────────────────────────────────────────────

/// Candidate strategy: indicators + target return + timeframe + risk tolerance.
///
/// `indicators` keeps insertion order; it is displayed in that order and the
/// label of the resulting `BacktestResult` follows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub indicators: Vec<Indicator>,
    /// Target return per trade, in percent.
    pub target_return: f64,
    pub timeframe: Timeframe,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turnover_rate: Option<TurnoverRange>,
    #[serde(default)]
    pub risk_tolerance: RiskTolerance,
}

impl StrategyConfig {
    pub fn new<I, T>(
        indicators: I,
        target_return: f64,
        timeframe: Timeframe,
        risk_tolerance: RiskTolerance,
    ) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Indicator>,
    {
        Self {
            indicators: indicators.into_iter().map(Into::into).collect(),
            target_return,
            timeframe,
            turnover_rate: None,
            risk_tolerance,
        }
    }

    pub fn with_turnover(mut self, low: f64, high: f64) -> Self {
        self.turnover_rate = Some(TurnoverRange::new(low, high));
        self
    }

    pub fn contains(&self, indicator: &Indicator) -> bool {
        self.indicators.contains(indicator)
    }

    /// Display names joined with `" + "`, in input order.
    pub fn strategy_label(&self) -> String {
        self.indicators
            .iter()
            .map(Indicator::display_name)
            .collect::<Vec<_>>()
            .join(" + ")
    }

    /// Content hash over the canonical JSON form.
    ///
    /// Field order is fixed by the struct definition, so equal configs hash equally.
    pub fn config_hash(&self) -> ConfigHash {
        let json = serde_json::to_vec(self).unwrap_or_default();
        ConfigHash::from_bytes(&json)
    }

    /// Boundary check run by callers before handing the config to the engine.
    ///
    /// Rules are checked in order; the first failure is returned.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.indicators.is_empty() {
            return Err(ValidationError::EmptyIndicators);
        }

        let mut seen = HashSet::with_capacity(self.indicators.len());
        for indicator in &self.indicators {
            if !seen.insert(indicator.id()) {
                return Err(ValidationError::DuplicateIndicator(indicator.id().to_string()));
            }
        }

        if !self.target_return.is_finite() || self.target_return <= 0.0 {
            return Err(ValidationError::NonPositiveTargetReturn(self.target_return));
        }

        if let Some(range) = self.turnover_rate {
            if !range.is_valid() {
                return Err(ValidationError::InvalidTurnoverRange {
                    low: range.low,
                    high: range.high,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StrategyConfig {
        StrategyConfig::new(
            ["macd_golden_cross", "rsi_above_50"],
            10.0,
            Timeframe::Short,
            RiskTolerance::Medium,
        )
    }

    #[test]
    fn valid_config_passes() {
        assert_eq!(sample().validate(), Ok(()));
    }

    #[test]
    fn empty_indicators_rejected() {
        let mut config = sample();
        config.indicators.clear();
        assert_eq!(config.validate(), Err(ValidationError::EmptyIndicators));
    }

    #[test]
    fn non_positive_target_rejected() {
        let mut config = sample();
        config.target_return = 0.0;
        assert_eq!(
            config.validate(),
            Err(ValidationError::NonPositiveTargetReturn(0.0))
        );

        config.target_return = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::NonPositiveTargetReturn(_))
        ));
    }

    #[test]
    fn duplicate_indicator_rejected() {
        let mut config = sample();
        config.indicators.push(Indicator::RsiAbove50);
        assert_eq!(
            config.validate(),
            Err(ValidationError::DuplicateIndicator("rsi_above_50".into()))
        );
    }

    #[test]
    fn inverted_turnover_range_rejected() {
        let config = sample().with_turnover(5.0, 2.0);
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidTurnoverRange { .. })
        ));
        assert_eq!(sample().with_turnover(2.0, 5.0).validate(), Ok(()));
    }

    #[test]
    fn spelled_out_known_id_scores_and_dedups_as_catalog_entry() {
        let config = StrategyConfig::new(
            [Indicator::Other("ma_bullish".into())],
            5.0,
            Timeframe::Medium,
            RiskTolerance::Low,
        );
        assert!(config.contains(&Indicator::MaBullish));
        assert_eq!(config.strategy_label(), "MA Bullish Alignment");
        assert_eq!(crate::calculator::base_score(&config), 50.0 + 16.0);

        let mut doubled = config.clone();
        doubled.indicators.push(Indicator::MaBullish);
        assert_eq!(
            doubled.validate(),
            Err(ValidationError::DuplicateIndicator("ma_bullish".into()))
        );
    }

    #[test]
    fn unknown_indicator_is_legal() {
        let config = StrategyConfig::new(["unknown_xyz"], 3.0, Timeframe::Medium, RiskTolerance::Low);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn timeframe_parsing() {
        assert_eq!("Short".parse::<Timeframe>(), Ok(Timeframe::Short));
        assert_eq!(" long ".parse::<Timeframe>(), Ok(Timeframe::Long));
        assert_eq!(
            "weekly".parse::<Timeframe>(),
            Err(ValidationError::UnknownTimeframe("weekly".into()))
        );
    }

    #[test]
    fn risk_tolerance_parsing_and_default() {
        assert_eq!("HIGH".parse::<RiskTolerance>(), Ok(RiskTolerance::High));
        assert!("extreme".parse::<RiskTolerance>().is_err());
        assert_eq!(RiskTolerance::default(), RiskTolerance::Medium);
    }

    #[test]
    fn label_joins_display_names_in_order() {
        let config = StrategyConfig::new(
            ["rsi_above_50", "custom", "macd_golden_cross"],
            8.0,
            Timeframe::Long,
            RiskTolerance::Low,
        );
        assert_eq!(config.strategy_label(), "RSI>50 + custom + MACD Golden Cross");
    }

    #[test]
    fn config_hash_tracks_content() {
        let a = sample();
        let mut b = sample();
        assert_eq!(a.config_hash(), b.config_hash());
        b.target_return = 12.0;
        assert_ne!(a.config_hash(), b.config_hash());
    }

    #[test]
    fn json_shape() {
        let config = sample().with_turnover(1.0, 3.5);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["indicators"][0], "macd_golden_cross");
        assert_eq!(json["timeframe"], "short");
        assert_eq!(json["risk_tolerance"], "medium");
        assert_eq!(json["turnover_rate"], serde_json::json!([1.0, 3.5]));

        let back: StrategyConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn toml_table_defaults_risk_and_turnover() {
        let config: StrategyConfig = toml::from_str(
            "indicators = [\"ma_bullish\", \"my_signal\"]\ntarget_return = 7.5\ntimeframe = \"long\"",
        )
        .unwrap();
        assert_eq!(config.indicators[1], Indicator::Other("my_signal".into()));
        assert_eq!(config.risk_tolerance, RiskTolerance::Medium);
        assert!(config.turnover_rate.is_none());
    }
}
