//! Weighted ensemble combination of the four elementary signals.

use ensemble_core::error::SettingsError;
use ensemble_core::types::{SignalAction, SignalSource, TradingSignal};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tolerance for the weights-sum-to-one check.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Per-source ensemble weights. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnsembleWeights {
    pub sentiment: f64,
    pub technical: f64,
    pub microstructure: f64,
    #[serde(rename = "macro")]
    pub macro_: f64,
}

impl Default for EnsembleWeights {
    fn default() -> Self {
        Self {
            sentiment: 0.25,
            technical: 0.35,
            microstructure: 0.20,
            macro_: 0.20,
        }
    }
}

impl EnsembleWeights {
    /// Weight of one source. Exhaustive over the closed source set.
    pub fn weight(&self, source: SignalSource) -> f64 {
        match source {
            SignalSource::Sentiment => self.sentiment,
            SignalSource::Technical => self.technical,
            SignalSource::Microstructure => self.microstructure,
            SignalSource::Macro => self.macro_,
        }
    }

    /// Validate that every weight is a fraction and the set is normalized.
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (name, value) in [
            ("ensemble_weights.sentiment", self.sentiment),
            ("ensemble_weights.technical", self.technical),
            ("ensemble_weights.microstructure", self.microstructure),
            ("ensemble_weights.macro", self.macro_),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SettingsError::OutOfRange {
                    name,
                    value,
                    min: 0.0,
                    max: 1.0,
                });
            }
        }

        let sum = self.sentiment + self.technical + self.microstructure + self.macro_;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(SettingsError::WeightsNotNormalized { sum });
        }

        Ok(())
    }
}

/// The four elementary signals of one evaluation, in ensemble order.
#[derive(Debug, Clone)]
pub struct ElementarySignals {
    pub sentiment: TradingSignal,
    pub technical: TradingSignal,
    pub microstructure: TradingSignal,
    pub macro_: TradingSignal,
}

impl ElementarySignals {
    /// Iterate the signals paired with their source, order-preserving.
    pub fn iter(&self) -> [(SignalSource, &TradingSignal); 4] {
        [
            (SignalSource::Sentiment, &self.sentiment),
            (SignalSource::Technical, &self.technical),
            (SignalSource::Microstructure, &self.microstructure),
            (SignalSource::Macro, &self.macro_),
        ]
    }
}

/// Merge the four elementary signals into the final decision.
///
/// Each signal contributes `weight × confidence` to the bucket of its
/// direction; HOLD feeds neither bucket but still counts toward total
/// confidence. A direction wins only by beating the other bucket *and*
/// clearing `min_confidence`; otherwise the result is a HOLD whose
/// confidence is the damped total.
pub fn combine(
    signals: &ElementarySignals,
    weights: &EnsembleWeights,
    min_confidence: f64,
) -> TradingSignal {
    let mut buy_weight = 0.0;
    let mut sell_weight = 0.0;
    let mut total_confidence = 0.0;
    let mut reasoning_parts = Vec::with_capacity(4);

    for (source, signal) in signals.iter() {
        let contribution = weights.weight(source) * signal.confidence;

        match signal.action {
            SignalAction::Buy => buy_weight += contribution,
            SignalAction::Sell => sell_weight += contribution,
            SignalAction::Hold => {}
        }

        total_confidence += contribution;
        reasoning_parts.push(format!("{}: {}", source, signal.reasoning));
    }

    debug!(
        buy_weight,
        sell_weight, total_confidence, "combined ensemble signals"
    );

    let reasoning = reasoning_parts.join(" | ");

    if buy_weight > sell_weight && buy_weight > min_confidence {
        TradingSignal::new(SignalAction::Buy, buy_weight, reasoning)
    } else if sell_weight > buy_weight && sell_weight > min_confidence {
        TradingSignal::new(SignalAction::Sell, sell_weight, reasoning)
    } else {
        // No direction clears the bar: damp the conviction
        TradingSignal::new(SignalAction::Hold, total_confidence * 0.5, reasoning)
    }
}
