//! Volume-activity microstructure signal.

use ensemble_core::types::{PriceSeries, SignalAction, TradingSignal};

/// Bars in the recent-activity window.
const RECENT_WINDOW: usize = 10;
/// Recent volume above this multiple of the full-window mean reads as
/// accumulation.
const HIGH_ACTIVITY_RATIO: f64 = 1.2;
/// Recent volume below this multiple reads as fading interest.
const LOW_ACTIVITY_RATIO: f64 = 0.8;
/// Confidence of a directional volume read.
const ACTIVITY_CONFIDENCE: f64 = 0.6;

/// Generate a signal from recent volume activity.
///
/// Compares the mean volume of the last ten bars against the mean over the
/// whole window. A proper order-book feed would do better; the rolling
/// window is all this pipeline receives.
pub fn evaluate(series: &PriceSeries) -> TradingSignal {
    if series.len() <= RECENT_WINDOW {
        return TradingSignal::hold("insufficient history for microstructure analysis");
    }

    let volumes = series.volumes();
    let full_mean = volumes.iter().sum::<f64>() / volumes.len() as f64;
    if full_mean <= 0.0 {
        return TradingSignal::hold("no volume recorded in window");
    }

    let recent = &volumes[volumes.len() - RECENT_WINDOW..];
    let recent_mean = recent.iter().sum::<f64>() / recent.len() as f64;

    if recent_mean > full_mean * HIGH_ACTIVITY_RATIO {
        TradingSignal::new(
            SignalAction::Buy,
            ACTIVITY_CONFIDENCE,
            "high volume activity detected",
        )
    } else if recent_mean < full_mean * LOW_ACTIVITY_RATIO {
        TradingSignal::new(
            SignalAction::Sell,
            ACTIVITY_CONFIDENCE,
            "low volume activity detected",
        )
    } else {
        TradingSignal::hold("normal microstructure conditions")
    }
}
