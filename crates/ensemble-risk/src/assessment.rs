//! Per-position risk assessment.

use ensemble_core::types::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a position's downside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Extreme,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
            RiskLevel::Extreme => write!(f, "extreme"),
        }
    }
}

/// Risk assessment of a single position at a given price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRisk {
    pub symbol: String,
    pub risk_level: RiskLevel,
    /// Portfolio fraction lost if the stop triggers
    pub max_loss: f64,
    /// Potential gain over potential loss
    pub risk_reward_ratio: f64,
}

/// Assess a position's downside at the current price.
pub fn assess_position(position: &Position, current_price: f64) -> PositionRisk {
    let (max_loss, max_gain) = if current_price > 0.0 {
        (
            ((current_price - position.stop_loss) / current_price).abs() * position.size,
            ((position.take_profit - current_price) / current_price).abs() * position.size,
        )
    } else {
        (position.size, 0.0)
    };

    let risk_reward_ratio = if max_loss > 0.0 {
        max_gain / max_loss
    } else {
        0.0
    };

    let loss_fraction = if position.size > 0.0 {
        max_loss / position.size
    } else {
        1.0
    };
    let risk_level = if loss_fraction <= 0.02 {
        RiskLevel::Low
    } else if loss_fraction <= 0.05 {
        RiskLevel::Medium
    } else if loss_fraction <= 0.10 {
        RiskLevel::High
    } else {
        RiskLevel::Extreme
    };

    PositionRisk {
        symbol: position.symbol.clone(),
        risk_level,
        max_loss,
        risk_reward_ratio,
    }
}
