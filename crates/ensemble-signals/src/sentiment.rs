//! Sentiment-based signal generation.

use ensemble_core::types::{SentimentScore, SignalAction, TradingSignal};

/// Score above which sentiment argues for buying.
const BULLISH_SCORE: f64 = 0.6;
/// Score below which sentiment argues for selling.
const BEARISH_SCORE: f64 = 0.4;
/// Minimum upstream confidence before sentiment may take a direction.
const MIN_CONFIDENCE: f64 = 0.7;

/// Generate a signal from an externally supplied sentiment score.
///
/// Direction requires both a decisive score and a confident upstream model;
/// the upstream confidence is passed through unchanged.
pub fn evaluate(sentiment: &SentimentScore) -> TradingSignal {
    let action = if sentiment.score > BULLISH_SCORE && sentiment.confidence > MIN_CONFIDENCE {
        SignalAction::Buy
    } else if sentiment.score < BEARISH_SCORE && sentiment.confidence > MIN_CONFIDENCE {
        SignalAction::Sell
    } else {
        SignalAction::Hold
    };

    TradingSignal::new(
        action,
        sentiment.confidence,
        format!(
            "sentiment score {:.2} (confidence {:.2})",
            sentiment.score, sentiment.confidence
        ),
    )
}
