//! Indicator catalog — identifiers, display names and scoring weights.
//!
//! Known identifiers map to a curated weight (8–18) and display name.
//! Anything else is carried as `Indicator::Other` and scores the default
//! weight of 5 with its raw identifier as display name. Unknown identifiers
//! are never an error.

use std::borrow::Cow;
use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Weight assigned to identifiers outside the catalog.
pub const DEFAULT_WEIGHT: u32 = 5;

/// A technical-analysis signal identifier.
///
/// Serialized as its string identifier (`"macd_golden_cross"`, ...), so
/// configs round-trip with whatever identifiers the caller supplied.
///
/// Equality, hashing, weight and display name all go through the identifier:
/// `Other("ma_bullish")` behaves exactly like `MaBullish`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Indicator {
    MacdGoldenCross,
    RsiAbove50,
    VolumeIncrease,
    BollingerBreakout,
    KdjGoldenCross,
    MaBullish,
    ObvRising,
    AdxAbove25,
    /// Identifier not in the catalog.
    Other(String),
}

impl Indicator {
    /// Parse an identifier. Never fails: unknown ids become `Other`.
    pub fn from_id(id: &str) -> Self {
        match id {
            "macd_golden_cross" => Self::MacdGoldenCross,
            "rsi_above_50" => Self::RsiAbove50,
            "volume_increase" => Self::VolumeIncrease,
            "bollinger_breakout" => Self::BollingerBreakout,
            "kdj_golden_cross" => Self::KdjGoldenCross,
            "ma_bullish" => Self::MaBullish,
            "obv_rising" => Self::ObvRising,
            "adx_above_25" => Self::AdxAbove25,
            other => Self::Other(other.to_string()),
        }
    }

    /// Canonical string identifier.
    pub fn id(&self) -> &str {
        match self {
            Self::MacdGoldenCross => "macd_golden_cross",
            Self::RsiAbove50 => "rsi_above_50",
            Self::VolumeIncrease => "volume_increase",
            Self::BollingerBreakout => "bollinger_breakout",
            Self::KdjGoldenCross => "kdj_golden_cross",
            Self::MaBullish => "ma_bullish",
            Self::ObvRising => "obv_rising",
            Self::AdxAbove25 => "adx_above_25",
            Self::Other(id) => id,
        }
    }

    /// Catalogued variant for an `Other` that carries a known identifier.
    fn canonical(&self) -> Cow<'_, Indicator> {
        match self {
            Self::Other(id) => Cow::Owned(Self::from_id(id)),
            known => Cow::Borrowed(known),
        }
    }

    /// Scoring weight added to the base success score.
    pub fn weight(&self) -> u32 {
        match self.canonical().as_ref() {
            Self::MacdGoldenCross => 15,
            Self::RsiAbove50 => 10,
            Self::VolumeIncrease => 12,
            Self::BollingerBreakout => 18,
            Self::KdjGoldenCross => 14,
            Self::MaBullish => 16,
            Self::ObvRising => 8,
            Self::AdxAbove25 => 11,
            Self::Other(_) => DEFAULT_WEIGHT,
        }
    }

    /// Human-readable name used in strategy labels.
    pub fn display_name(&self) -> &str {
        match self.canonical().as_ref() {
            Self::MacdGoldenCross => "MACD Golden Cross",
            Self::RsiAbove50 => "RSI>50",
            Self::VolumeIncrease => "Volume Surge",
            Self::BollingerBreakout => "Bollinger Breakout",
            Self::KdjGoldenCross => "KDJ Golden Cross",
            Self::MaBullish => "MA Bullish Alignment",
            Self::ObvRising => "OBV Rising",
            Self::AdxAbove25 => "ADX>25",
            Self::Other(_) => self.id(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self.canonical().as_ref(), Self::Other(_))
    }

    /// Every catalogued indicator, in catalog order.
    pub fn catalog() -> [Indicator; 8] {
        [
            Self::MacdGoldenCross,
            Self::RsiAbove50,
            Self::VolumeIncrease,
            Self::BollingerBreakout,
            Self::KdjGoldenCross,
            Self::MaBullish,
            Self::ObvRising,
            Self::AdxAbove25,
        ]
    }
}

/// Weight for a raw identifier.
pub fn weight_of(id: &str) -> u32 {
    Indicator::from_id(id).weight()
}

/// Display name for a raw identifier (the identifier itself when unknown).
pub fn display_name_of(id: &str) -> String {
    Indicator::from_id(id).display_name().to_string()
}

impl From<String> for Indicator {
    fn from(id: String) -> Self {
        match Self::from_id(&id) {
            Self::Other(_) => Self::Other(id),
            known => known,
        }
    }
}

impl From<&str> for Indicator {
    fn from(id: &str) -> Self {
        Self::from_id(id)
    }
}

impl From<Indicator> for String {
    fn from(indicator: Indicator) -> Self {
        match indicator {
            Indicator::Other(id) => id,
            known => known.id().to_string(),
        }
    }
}

impl PartialEq for Indicator {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Indicator {}

impl Hash for Indicator {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl FromStr for Indicator {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_id(s.trim()))
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
