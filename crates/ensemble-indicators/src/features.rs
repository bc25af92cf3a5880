//! Snapshot layer: latest indicator values with neutral defaults.
//!
//! The signal generators need a single current value per indicator, not the
//! full history. `FeatureSet::extract` pulls the latest value of each batch
//! indicator and substitutes the documented neutral default when the series
//! is too short. Extraction never fails; degraded inputs are logged at
//! debug level and lean the downstream decision toward HOLD.

use ensemble_core::traits::{Indicator, MultiOutputIndicator};
use ensemble_core::types::{PriceSeries, Trend, VolumeProfile};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::momentum::{Macd, Rsi};
use crate::volatility::{annualized_volatility, BollingerBands};

/// RSI lookback.
pub const RSI_PERIOD: usize = 14;
/// Bollinger Band lookback.
pub const BOLLINGER_PERIOD: usize = 20;
/// Short moving average for trend classification.
pub const TREND_FAST_PERIOD: usize = 20;
/// Long moving average for trend classification.
pub const TREND_SLOW_PERIOD: usize = 50;
/// Lookback for the average-volume baseline.
pub const VOLUME_PERIOD: usize = 20;

/// Neutral RSI when history is insufficient.
pub const NEUTRAL_RSI: f64 = 50.0;
/// Neutral Bollinger position when bands are degenerate or history is short.
pub const NEUTRAL_BOLLINGER_POSITION: f64 = 0.5;
/// Conservative volatility floor when returns cannot be computed.
pub const NEUTRAL_VOLATILITY: f64 = 0.02;

/// Latest indicator values for one evaluation of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// RSI(14) in [0, 100]; 50 when history is insufficient
    pub rsi: f64,
    /// MACD line (EMA12 - EMA26); 0 when history is insufficient
    pub macd: f64,
    /// Position within the Bollinger Bands in [0, 1]; 0.5 fallback
    pub bollinger_position: f64,
    /// Annualized realized volatility; 0.02 floor
    pub volatility: f64,
}

impl FeatureSet {
    /// Extract the current feature snapshot from a price series.
    pub fn extract(series: &PriceSeries) -> Self {
        let closes = series.closes();

        let rsi = Rsi::new(RSI_PERIOD)
            .calculate(&closes)
            .last()
            .copied()
            .unwrap_or_else(|| {
                debug!(
                    symbol = %series.symbol,
                    bars = closes.len(),
                    "insufficient history for RSI, using neutral 50"
                );
                NEUTRAL_RSI
            });

        let macd = Macd::new()
            .calculate(&closes)
            .last()
            .copied()
            .unwrap_or_else(|| {
                debug!(
                    symbol = %series.symbol,
                    bars = closes.len(),
                    "insufficient history for MACD, using 0"
                );
                0.0
            });

        let bollinger_position = BollingerBands::new()
            .calculate(&closes)
            .last()
            .map(|out| out.percent_b)
            .unwrap_or_else(|| {
                debug!(
                    symbol = %series.symbol,
                    bars = closes.len(),
                    "insufficient history for Bollinger Bands, using midpoint"
                );
                NEUTRAL_BOLLINGER_POSITION
            });

        let volatility = annualized_volatility(&closes).unwrap_or_else(|| {
            debug!(
                symbol = %series.symbol,
                bars = closes.len(),
                "insufficient history for volatility, using floor"
            );
            NEUTRAL_VOLATILITY
        });

        Self {
            rsi,
            macd,
            bollinger_position,
            volatility,
        }
    }
}

/// Classify the price trend from a 20- vs 50-period moving average.
///
/// With fewer than 50 points the long average uses whatever window is
/// available; with fewer than 20 the trend defaults to sideways.
pub fn classify_trend(closes: &[f64]) -> Trend {
    if closes.len() < TREND_FAST_PERIOD {
        return Trend::Sideways;
    }

    let fast = mean(&closes[closes.len() - TREND_FAST_PERIOD..]);
    let slow_window = closes.len().min(TREND_SLOW_PERIOD);
    let slow = mean(&closes[closes.len() - slow_window..]);

    if fast > slow {
        Trend::Bullish
    } else if fast < slow {
        Trend::Bearish
    } else {
        Trend::Sideways
    }
}

/// Classify current volume against its 20-bar average.
pub fn classify_volume(volumes: &[f64]) -> VolumeProfile {
    if volumes.len() < VOLUME_PERIOD {
        return VolumeProfile::Medium;
    }

    let current = volumes[volumes.len() - 1];
    let average = mean(&volumes[volumes.len() - VOLUME_PERIOD..]);
    if average <= 0.0 {
        return VolumeProfile::Medium;
    }

    if current > average * 1.5 {
        VolumeProfile::High
    } else if current < average * 0.5 {
        VolumeProfile::Low
    } else {
        VolumeProfile::Medium
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
