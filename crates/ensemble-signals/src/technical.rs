//! Technical-indicator voting signal.

use ensemble_core::types::{SignalAction, TradingSignal};
use ensemble_indicators::FeatureSet;

/// Confidence weight of an RSI vote.
const RSI_WEIGHT: f64 = 0.8;
/// Confidence weight of a MACD vote.
const MACD_WEIGHT: f64 = 0.6;
/// Confidence weight of a Bollinger-position vote.
const BOLLINGER_WEIGHT: f64 = 0.7;

/// Confidence of a HOLD produced by a tied or empty vote.
const TIE_CONFIDENCE: f64 = 0.3;

/// Generate a signal from technical-indicator votes.
///
/// RSI, MACD, and Bollinger position each cast at most one directional
/// vote. The majority picks the direction; confidence is the mean weight
/// of the votes on the winning side. A tie or an empty ballot holds.
pub fn evaluate(features: &FeatureSet) -> TradingSignal {
    let mut buy_weights: Vec<f64> = Vec::new();
    let mut sell_weights: Vec<f64> = Vec::new();

    if features.rsi < 30.0 {
        buy_weights.push(RSI_WEIGHT);
    } else if features.rsi > 70.0 {
        sell_weights.push(RSI_WEIGHT);
    }

    if features.macd > 0.0 {
        buy_weights.push(MACD_WEIGHT);
    } else if features.macd < 0.0 {
        sell_weights.push(MACD_WEIGHT);
    }

    if features.bollinger_position < 0.2 {
        buy_weights.push(BOLLINGER_WEIGHT);
    } else if features.bollinger_position > 0.8 {
        sell_weights.push(BOLLINGER_WEIGHT);
    }

    let reasoning = format!(
        "technical votes: {} buy, {} sell (rsi {:.1}, macd {:.4}, %b {:.2})",
        buy_weights.len(),
        sell_weights.len(),
        features.rsi,
        features.macd,
        features.bollinger_position
    );

    if buy_weights.len() > sell_weights.len() {
        TradingSignal::new(SignalAction::Buy, mean(&buy_weights), reasoning)
    } else if sell_weights.len() > buy_weights.len() {
        TradingSignal::new(SignalAction::Sell, mean(&sell_weights), reasoning)
    } else {
        TradingSignal::new(SignalAction::Hold, TIE_CONFIDENCE, reasoning)
    }
}

fn mean(weights: &[f64]) -> f64 {
    weights.iter().sum::<f64>() / weights.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(rsi: f64, macd: f64, bollinger: f64) -> FeatureSet {
        FeatureSet {
            rsi,
            macd,
            bollinger_position: bollinger,
            volatility: 0.02,
        }
    }

    #[test]
    fn test_oversold_votes_buy() {
        // RSI and Bollinger vote buy, MACD votes sell
        let signal = evaluate(&features(25.0, -1.0, 0.1));
        assert_eq!(signal.action, SignalAction::Buy);
        // Mean of the winning-side weights: (0.8 + 0.7) / 2
        assert!((signal.confidence - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_overbought_votes_sell() {
        let signal = evaluate(&features(75.0, -1.0, 0.9));
        assert_eq!(signal.action, SignalAction::Sell);
        // All three vote sell: (0.8 + 0.6 + 0.7) / 3
        assert!((signal.confidence - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_single_macd_vote() {
        let signal = evaluate(&features(50.0, 2.0, 0.5));
        assert_eq!(signal.action, SignalAction::Buy);
        assert!((signal.confidence - MACD_WEIGHT).abs() < 1e-12);
    }

    #[test]
    fn test_tie_holds() {
        // RSI buy vs MACD sell, Bollinger abstains
        let signal = evaluate(&features(25.0, -1.0, 0.5));
        assert_eq!(signal.action, SignalAction::Hold);
        assert!((signal.confidence - TIE_CONFIDENCE).abs() < 1e-12);
    }

    #[test]
    fn test_empty_ballot_holds() {
        let signal = evaluate(&features(50.0, 0.0, 0.5));
        assert_eq!(signal.action, SignalAction::Hold);
        assert!((signal.confidence - TIE_CONFIDENCE).abs() < 1e-12);
    }
}
