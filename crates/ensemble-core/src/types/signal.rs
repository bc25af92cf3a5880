//! Trading signal types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalAction {
    Buy,
    Sell,
    Hold,
}

impl SignalAction {
    /// Check if the signal calls for opening a position.
    pub fn is_directional(&self) -> bool {
        !matches!(self, SignalAction::Hold)
    }
}

impl fmt::Display for SignalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalAction::Buy => write!(f, "BUY"),
            SignalAction::Sell => write!(f, "SELL"),
            SignalAction::Hold => write!(f, "HOLD"),
        }
    }
}

/// The four elementary signal sources feeding the ensemble.
///
/// Closed set: the ensemble weight lookup matches exhaustively over it, so a
/// new source cannot be added without deciding its weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalSource {
    Sentiment,
    Technical,
    Microstructure,
    Macro,
}

impl SignalSource {
    /// All sources in ensemble order.
    pub fn all() -> [SignalSource; 4] {
        [
            SignalSource::Sentiment,
            SignalSource::Technical,
            SignalSource::Microstructure,
            SignalSource::Macro,
        ]
    }
}

impl fmt::Display for SignalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalSource::Sentiment => write!(f, "sentiment"),
            SignalSource::Technical => write!(f, "technical"),
            SignalSource::Microstructure => write!(f, "microstructure"),
            SignalSource::Macro => write!(f, "macro"),
        }
    }
}

/// A trade decision with its conviction and risk parameters.
///
/// Confidence is always within [0, 1]; constructors clamp it. The risk
/// fields are populated only for directional signals that passed through
/// position sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingSignal {
    /// Signal direction
    pub action: SignalAction,
    /// Conviction in [0, 1]
    pub confidence: f64,
    /// Human-readable explanation of the decision
    pub reasoning: String,
    /// Protective stop price
    pub stop_loss: Option<f64>,
    /// Profit target price
    pub take_profit: Option<f64>,
    /// Position size as a fraction of portfolio capital
    pub position_size: Option<f64>,
}

impl TradingSignal {
    /// Create a signal with no risk parameters attached.
    pub fn new(action: SignalAction, confidence: f64, reasoning: impl Into<String>) -> Self {
        Self {
            action,
            confidence: confidence.clamp(0.0, 1.0),
            reasoning: reasoning.into(),
            stop_loss: None,
            take_profit: None,
            position_size: None,
        }
    }

    /// Create a neutral HOLD signal explaining why no action is taken.
    pub fn hold(reasoning: impl Into<String>) -> Self {
        Self::new(SignalAction::Hold, 0.5, reasoning)
    }

    /// Attach risk parameters from position sizing.
    pub fn with_risk_params(mut self, stop_loss: f64, take_profit: f64, size: f64) -> Self {
        self.stop_loss = Some(stop_loss);
        self.take_profit = Some(take_profit);
        self.position_size = Some(size);
        self
    }
}
