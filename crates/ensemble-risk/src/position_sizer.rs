//! Kelly-criterion position sizing with risk caps.

use std::collections::HashMap;

use ensemble_core::types::Position;
use tracing::debug;

use crate::assets::pair_correlation;
use crate::settings::RiskSettings;

/// Stateless position sizer.
///
/// Every call computes from the settings, the signal confidence, and a
/// snapshot of the ledger; calling twice against an unchanged snapshot
/// yields the same size.
#[derive(Debug, Clone)]
pub struct PositionSizer {
    settings: RiskSettings,
}

impl PositionSizer {
    /// Create a new sizer.
    pub fn new(settings: RiskSettings) -> Self {
        Self { settings }
    }

    /// Kelly fraction for a given win probability.
    ///
    /// `f = (b·p − q) / b` with `b = avg_win / avg_loss`, clamped to
    /// `[0, kelly_fraction]`. A non-positive average loss disables sizing.
    pub fn kelly_fraction(&self, win_rate: f64) -> f64 {
        if self.settings.avg_loss <= 0.0 {
            return 0.0;
        }

        let b = self.settings.avg_win / self.settings.avg_loss;
        let p = win_rate;
        let q = 1.0 - p;

        ((b * p - q) / b).clamp(0.0, self.settings.kelly_fraction)
    }

    /// Compute the admissible position size for a candidate entry.
    ///
    /// Applies, in order: the Kelly fraction, the per-position size cap, the
    /// stop-loss affordability cap, the correlated-exposure scaling, and the
    /// portfolio risk budget. A positive result below the minimum size is
    /// raised to the minimum only when every cap still admits it.
    pub fn size(
        &self,
        symbol: &str,
        confidence: f64,
        positions: &HashMap<String, Position>,
    ) -> f64 {
        let kelly = self.kelly_fraction(confidence);

        // The position-risk budget implies a stop percentage of
        // max_position_risk; twice that is the largest size whose stop
        // remains affordable.
        let hard_cap = self
            .settings
            .max_position_size
            .min(2.0 * self.settings.max_position_risk);

        let mut size = kelly.min(hard_cap);
        size = self.adjust_for_correlation(symbol, size, positions);

        let budget_cap = self.portfolio_budget_cap(positions);
        size = size.min(budget_cap);

        if size <= 0.0 {
            return 0.0;
        }

        if size >= self.settings.min_position_size {
            size
        } else if self.settings.min_position_size <= hard_cap
            && self.settings.min_position_size <= budget_cap
        {
            // Worth opening at the floor; the caps still admit it
            self.settings.min_position_size
        } else {
            0.0
        }
    }

    /// Scale the candidate down when correlated exposure is concentrated.
    fn adjust_for_correlation(
        &self,
        symbol: &str,
        size: f64,
        positions: &HashMap<String, Position>,
    ) -> f64 {
        let mut correlated_exposure = 0.0;

        for (existing_symbol, position) in positions {
            if existing_symbol == symbol {
                continue;
            }
            let correlation = pair_correlation(symbol, existing_symbol);
            if correlation > self.settings.max_correlation {
                correlated_exposure += position.size * correlation;
            }
        }

        if correlated_exposure > self.settings.max_position_size {
            let factor = self.settings.max_position_size / correlated_exposure;
            debug!(
                symbol,
                correlated_exposure, factor, "scaling candidate for correlated exposure"
            );
            size * factor
        } else {
            size
        }
    }

    /// Largest size the remaining portfolio risk budget admits.
    fn portfolio_budget_cap(&self, positions: &HashMap<String, Position>) -> f64 {
        let committed: f64 = positions.values().map(|p| p.risk_contribution()).sum();
        let available = self.settings.max_portfolio_risk - committed;

        if available <= 0.0 {
            0.0
        } else {
            available / self.settings.max_position_risk
        }
    }
}
