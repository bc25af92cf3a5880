//! Position ledger entries, risk metrics, and risk alerts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An open position tracked by the risk manager.
///
/// Sizes are fractions of portfolio capital, not share counts; the ledger
/// inside the risk manager is the sole owner of these entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Symbol, e.g. "BTC/USDT"
    pub symbol: String,
    /// Fraction of portfolio capital allocated
    pub size: f64,
    /// Fraction of the position value at risk before the stop triggers
    pub risk_percent: f64,
    /// Protective stop price
    pub stop_loss: f64,
    /// Profit target price
    pub take_profit: f64,
    /// When the position was admitted
    pub opened_at: DateTime<Utc>,
}

impl Position {
    /// Create a position opened now.
    pub fn new(
        symbol: impl Into<String>,
        size: f64,
        risk_percent: f64,
        stop_loss: f64,
        take_profit: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            size,
            risk_percent,
            stop_loss,
            take_profit,
            opened_at: Utc::now(),
        }
    }

    /// Contribution of this position to aggregate portfolio risk.
    #[inline]
    pub fn risk_contribution(&self) -> f64 {
        self.size * self.risk_percent
    }
}

/// Snapshot of portfolio-level risk metrics.
///
/// Recomputed over the current open positions; never diffed against
/// history inside this core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Value at Risk at 95% confidence
    pub var_95: f64,
    /// Peak-to-trough decline (requires a return history; 0 until one exists)
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    /// Size-weighted portfolio volatility
    pub volatility: f64,
    pub beta: f64,
    /// Average pairwise correlation across open symbols
    pub correlation: f64,
}

impl Default for RiskMetrics {
    fn default() -> Self {
        Self {
            var_95: 0.0,
            max_drawdown: 0.0,
            sharpe_ratio: 0.0,
            volatility: 0.0,
            beta: 0.0,
            correlation: 0.0,
        }
    }
}

/// Category of a risk alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    PortfolioRiskExceeded,
    PositionRiskExceeded,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertKind::PortfolioRiskExceeded => write!(f, "portfolio_risk_exceeded"),
            AlertKind::PositionRiskExceeded => write!(f, "position_risk_exceeded"),
        }
    }
}

/// Observational risk alert raised by the monitor.
///
/// Alerts never close positions; acting on them is an external decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAlert {
    pub kind: AlertKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl RiskAlert {
    /// Create an alert stamped now.
    pub fn new(kind: AlertKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}
