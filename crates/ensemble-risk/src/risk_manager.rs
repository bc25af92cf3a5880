//! The position ledger and its admission transaction.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use ensemble_core::error::{RiskError, SettingsError};
use ensemble_core::types::{AlertKind, Position, RiskAlert, RiskMetrics};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::{debug, info, warn};

use crate::assets::{asset_volatility, average_correlation};
use crate::limits::{check_candidate, LimitCheck};
use crate::position_sizer::PositionSizer;
use crate::settings::RiskSettings;

/// Fallback 95% normal quantile if the distribution cannot be built.
const VAR_95_Z: f64 = 1.645;

/// Everything the ledger lock protects: open positions, the alert log, and
/// the latest metrics snapshot.
struct LedgerState {
    positions: HashMap<String, Position>,
    alerts: Vec<RiskAlert>,
    metrics: RiskMetrics,
}

/// Owner of the position ledger.
///
/// Sizing reads, limit checks, admissions, and the monitor's sweeps all go
/// through one mutex, held for the full check-then-write sequence of an
/// admission. Two sizing calls racing on the same ledger therefore cannot
/// jointly exceed the portfolio risk budget.
pub struct RiskManager {
    settings: RiskSettings,
    sizer: PositionSizer,
    ledger: Mutex<LedgerState>,
}

impl RiskManager {
    /// Create a risk manager, validating the settings.
    pub fn new(settings: RiskSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            settings,
            sizer: PositionSizer::new(settings),
            ledger: Mutex::new(LedgerState {
                positions: HashMap::new(),
                alerts: Vec::new(),
                metrics: RiskMetrics::default(),
            }),
        })
    }

    fn ledger(&self) -> MutexGuard<'_, LedgerState> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Settings this manager enforces.
    pub fn settings(&self) -> &RiskSettings {
        &self.settings
    }

    /// Size a candidate entry against the current ledger snapshot.
    pub fn size_position(&self, symbol: &str, confidence: f64) -> f64 {
        let state = self.ledger();
        let size = self.sizer.size(symbol, confidence, &state.positions);
        debug!(symbol, confidence, size, "sized candidate position");
        size
    }

    /// Check a candidate against the risk limits without admitting it.
    pub fn check_risk_limits(&self, candidate: &Position) -> LimitCheck {
        let state = self.ledger();
        check_candidate(&self.settings, candidate, &state.positions)
    }

    /// Admit a position: check limits and insert under one lock.
    ///
    /// Re-admitting a symbol replaces its ledger entry.
    pub fn admit(&self, position: Position) -> Result<(), RiskError> {
        let mut state = self.ledger();

        match check_candidate(&self.settings, &position, &state.positions) {
            LimitCheck::Blocked { reason } => {
                warn!(symbol = %position.symbol, %reason, "position rejected");
                Err(RiskError::LimitBreached { reason })
            }
            LimitCheck::Allowed => {
                info!(
                    symbol = %position.symbol,
                    size = position.size,
                    "position admitted to ledger"
                );
                state.positions.insert(position.symbol.clone(), position);
                Ok(())
            }
        }
    }

    /// Remove a closed position from the ledger.
    pub fn remove_position(&self, symbol: &str) -> Option<Position> {
        let removed = self.ledger().positions.remove(symbol);
        if removed.is_some() {
            info!(symbol, "position removed from ledger");
        }
        removed
    }

    /// Snapshot of the open positions.
    pub fn positions(&self) -> Vec<Position> {
        self.ledger().positions.values().cloned().collect()
    }

    /// Aggregate risk committed across the ledger.
    pub fn portfolio_risk(&self) -> f64 {
        self.ledger()
            .positions
            .values()
            .map(|p| p.risk_contribution())
            .sum()
    }

    /// Fresh risk-metrics snapshot over the open positions.
    pub fn get_risk_metrics(&self) -> RiskMetrics {
        let mut state = self.ledger();
        state.metrics = compute_metrics(&state.positions);
        state.metrics
    }

    /// All alerts raised so far, oldest first.
    pub fn get_risk_alerts(&self) -> Vec<RiskAlert> {
        self.ledger().alerts.clone()
    }

    /// Operator action: drop the accumulated alerts.
    pub fn clear_risk_alerts(&self) {
        self.ledger().alerts.clear();
    }

    /// One monitoring sweep: raise limit-violation alerts and refresh the
    /// metrics snapshot. Runs entirely under the ledger lock.
    pub fn run_risk_cycle(&self) {
        let mut state = self.ledger();
        let mut new_alerts = Vec::new();

        let total_risk: f64 = state
            .positions
            .values()
            .map(|p| p.risk_contribution())
            .sum();
        if total_risk > self.settings.max_portfolio_risk {
            new_alerts.push(RiskAlert::new(
                AlertKind::PortfolioRiskExceeded,
                format!(
                    "portfolio risk {:.2}% exceeds limit {:.2}%",
                    total_risk * 100.0,
                    self.settings.max_portfolio_risk * 100.0
                ),
            ));
        }

        for position in state.positions.values() {
            let position_risk = position.risk_contribution();
            if position_risk > self.settings.max_position_risk {
                new_alerts.push(RiskAlert::new(
                    AlertKind::PositionRiskExceeded,
                    format!(
                        "position {} risk {:.2}% exceeds limit {:.2}%",
                        position.symbol,
                        position_risk * 100.0,
                        self.settings.max_position_risk * 100.0
                    ),
                ));
            }
        }

        for alert in &new_alerts {
            warn!(kind = %alert.kind, message = %alert.message, "risk alert");
        }
        state.alerts.extend(new_alerts);

        state.metrics = compute_metrics(&state.positions);
        debug!(
            total_risk,
            volatility = state.metrics.volatility,
            var_95 = state.metrics.var_95,
            "risk cycle complete"
        );
    }

    /// Test hook: place a position without limit checks, to exercise the
    /// monitor on states admission would normally prevent.
    #[cfg(test)]
    pub(crate) fn insert_unchecked(&self, position: Position) {
        self.ledger()
            .positions
            .insert(position.symbol.clone(), position);
    }
}

/// 95% quantile of the standard normal.
fn var_z_score() -> f64 {
    Normal::new(0.0, 1.0)
        .map(|n| n.inverse_cdf(0.95))
        .unwrap_or(VAR_95_Z)
}

/// Recompute portfolio metrics from the open positions.
fn compute_metrics(positions: &HashMap<String, Position>) -> RiskMetrics {
    if positions.is_empty() {
        return RiskMetrics::default();
    }

    let total_size: f64 = positions.values().map(|p| p.size).sum();
    let volatility = if total_size > 0.0 {
        positions
            .values()
            .map(|p| asset_volatility(&p.symbol) * p.size / total_size)
            .sum()
    } else {
        0.0
    };

    let symbols: Vec<&str> = positions.keys().map(String::as_str).collect();

    RiskMetrics {
        var_95: var_z_score() * volatility,
        // Drawdown and the return-based ratios need an equity history the
        // ledger does not keep
        max_drawdown: 0.0,
        sharpe_ratio: 1.0,
        volatility,
        beta: 1.0,
        correlation: average_correlation(&symbols),
    }
}
