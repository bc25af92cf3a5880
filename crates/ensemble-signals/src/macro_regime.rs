//! Macro-regime signal generation.

use ensemble_core::types::{MacroOutlook, MacroRegime, SignalAction, TradingSignal};

/// Minimum upstream confidence before the regime may take a direction.
const MIN_CONFIDENCE: f64 = 0.7;

/// Generate a signal from the externally supplied macro outlook.
///
/// The regime maps directly to a direction, gated by upstream confidence;
/// the confidence is passed through unchanged.
pub fn evaluate(outlook: &MacroOutlook) -> TradingSignal {
    let action = match outlook.regime {
        MacroRegime::Bull if outlook.confidence > MIN_CONFIDENCE => SignalAction::Buy,
        MacroRegime::Bear if outlook.confidence > MIN_CONFIDENCE => SignalAction::Sell,
        _ => SignalAction::Hold,
    };

    TradingSignal::new(
        action,
        outlook.confidence,
        format!(
            "macro regime {} (confidence {:.2})",
            outlook.regime, outlook.confidence
        ),
    )
}
