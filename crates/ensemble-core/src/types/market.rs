//! Market condition snapshot and external analysis scores.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Price trend classification from moving-average comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
    #[default]
    Sideways,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Bullish => write!(f, "bullish"),
            Trend::Bearish => write!(f, "bearish"),
            Trend::Sideways => write!(f, "sideways"),
        }
    }
}

/// Volume relative to its recent average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VolumeProfile {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for VolumeProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumeProfile::Low => write!(f, "low"),
            VolumeProfile::Medium => write!(f, "medium"),
            VolumeProfile::High => write!(f, "high"),
        }
    }
}

/// Broad macro-economic regime supplied by an external collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MacroRegime {
    Bull,
    Bear,
    #[default]
    Neutral,
}

impl fmt::Display for MacroRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacroRegime::Bull => write!(f, "bull"),
            MacroRegime::Bear => write!(f, "bear"),
            MacroRegime::Neutral => write!(f, "neutral"),
        }
    }
}

/// Externally supplied sentiment analysis for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    /// 0 = maximally bearish, 1 = maximally bullish
    pub score: f64,
    /// Confidence of the upstream model in [0, 1]
    pub confidence: f64,
}

impl SentimentScore {
    /// Neutral score used when the upstream analyzer is unavailable.
    pub fn neutral() -> Self {
        Self {
            score: 0.5,
            confidence: 0.5,
        }
    }
}

/// Externally supplied macro-economic outlook.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroOutlook {
    pub regime: MacroRegime,
    /// Confidence of the upstream model in [0, 1]
    pub confidence: f64,
}

impl MacroOutlook {
    /// Neutral outlook used when the upstream analyzer is unavailable.
    pub fn neutral() -> Self {
        Self {
            regime: MacroRegime::Neutral,
            confidence: 0.5,
        }
    }
}

/// Derived snapshot of current market conditions for one symbol.
///
/// Recomputed on every evaluation, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketCondition {
    pub trend: Trend,
    /// Annualized standard deviation of returns
    pub volatility: f64,
    pub volume_profile: VolumeProfile,
    /// Sentiment score in [0, 1]
    pub sentiment: f64,
    pub macro_regime: MacroRegime,
}

impl MarketCondition {
    /// Conservative snapshot used when analysis inputs are unavailable.
    pub fn neutral() -> Self {
        Self {
            trend: Trend::Sideways,
            volatility: 0.02,
            volume_profile: VolumeProfile::Medium,
            sentiment: 0.5,
            macro_regime: MacroRegime::Neutral,
        }
    }
}
