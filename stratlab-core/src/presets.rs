//! Preset catalog — canned strategy configs, two per risk tier.
//!
//! Fixed content, no computation. Repeated lookups return equal configs.

use crate::domain::{RiskTolerance, StrategyConfig, Timeframe};
use crate::indicator::Indicator;

/// Named strategy presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyPreset {
    /// Trend alignment confirmed by volume and RSI, medium horizon.
    SteadyTrend,
    /// Band breakout gated by trend strength, long horizon.
    BandBreakout,
    /// MACD cross with RSI and volume confirmation, short horizon.
    MomentumConfirm,
    /// KDJ cross with OBV and MA alignment, medium horizon.
    OscillatorTrend,
    /// Four-signal breakout stack chasing a high target.
    AggressiveBreakout,
    /// Fast oscillator combo on a short horizon.
    FastSwing,
}

impl StrategyPreset {
    pub fn name(self) -> &'static str {
        match self {
            Self::SteadyTrend => "steady_trend",
            Self::BandBreakout => "band_breakout",
            Self::MomentumConfirm => "momentum_confirm",
            Self::OscillatorTrend => "oscillator_trend",
            Self::AggressiveBreakout => "aggressive_breakout",
            Self::FastSwing => "fast_swing",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|p| p.name() == name)
    }

    pub fn risk_tolerance(self) -> RiskTolerance {
        match self {
            Self::SteadyTrend | Self::BandBreakout => RiskTolerance::Low,
            Self::MomentumConfirm | Self::OscillatorTrend => RiskTolerance::Medium,
            Self::AggressiveBreakout | Self::FastSwing => RiskTolerance::High,
        }
    }

    pub fn to_config(self) -> StrategyConfig {
        use Indicator::*;

        let (indicators, target_return, timeframe) = match self {
            Self::SteadyTrend => (vec![MaBullish, VolumeIncrease, RsiAbove50], 8.0, Timeframe::Medium),
            Self::BandBreakout => (vec![BollingerBreakout, AdxAbove25], 6.0, Timeframe::Long),
            Self::MomentumConfirm => (
                vec![MacdGoldenCross, RsiAbove50, VolumeIncrease],
                12.0,
                Timeframe::Short,
            ),
            Self::OscillatorTrend => (vec![KdjGoldenCross, ObvRising, MaBullish], 10.0, Timeframe::Medium),
            Self::AggressiveBreakout => (
                vec![MacdGoldenCross, BollingerBreakout, VolumeIncrease, AdxAbove25],
                18.0,
                Timeframe::Short,
            ),
            Self::FastSwing => (vec![KdjGoldenCross, RsiAbove50, ObvRising], 15.0, Timeframe::Short),
        };

        StrategyConfig::new(indicators, target_return, timeframe, self.risk_tolerance())
    }

    /// The two presets for a risk tier, in catalog order.
    pub fn for_risk(risk: RiskTolerance) -> [StrategyPreset; 2] {
        match risk {
            RiskTolerance::Low => [Self::SteadyTrend, Self::BandBreakout],
            RiskTolerance::Medium => [Self::MomentumConfirm, Self::OscillatorTrend],
            RiskTolerance::High => [Self::AggressiveBreakout, Self::FastSwing],
        }
    }

    pub fn all() -> &'static [StrategyPreset] {
        &[
            Self::SteadyTrend,
            Self::BandBreakout,
            Self::MomentumConfirm,
            Self::OscillatorTrend,
            Self::AggressiveBreakout,
            Self::FastSwing,
        ]
    }
}

/// Recommended configs for a risk tier.
pub fn presets_for(risk: RiskTolerance) -> Vec<StrategyConfig> {
    StrategyPreset::for_risk(risk)
        .iter()
        .map(|p| p.to_config())
        .collect()
}
