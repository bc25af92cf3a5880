//! Admission checks against the configured risk limits.

use std::collections::HashMap;

use ensemble_core::types::Position;

use crate::assets::pair_correlation;
use crate::settings::RiskSettings;

/// Result of a limit check.
#[derive(Debug, Clone, PartialEq)]
pub enum LimitCheck {
    /// Candidate admissible as-is
    Allowed,
    /// Candidate blocked with reason
    Blocked { reason: String },
}

impl LimitCheck {
    pub fn is_allowed(&self) -> bool {
        matches!(self, LimitCheck::Allowed)
    }

    /// Reason for a blocked candidate.
    pub fn reason(&self) -> Option<&str> {
        match self {
            LimitCheck::Allowed => None,
            LimitCheck::Blocked { reason } => Some(reason),
        }
    }
}

/// Check a candidate position against every limit.
///
/// Callers must hold the ledger lock across this check and the subsequent
/// insert so concurrent admissions cannot jointly breach the budget.
pub(crate) fn check_candidate(
    settings: &RiskSettings,
    candidate: &Position,
    positions: &HashMap<String, Position>,
) -> LimitCheck {
    if candidate.size > settings.max_position_size {
        return LimitCheck::Blocked {
            reason: format!(
                "position size {:.2}% exceeds maximum {:.2}%",
                candidate.size * 100.0,
                settings.max_position_size * 100.0
            ),
        };
    }

    if candidate.size < settings.min_position_size {
        return LimitCheck::Blocked {
            reason: format!(
                "position size {:.2}% below minimum {:.2}%",
                candidate.size * 100.0,
                settings.min_position_size * 100.0
            ),
        };
    }

    // Re-admitting a symbol replaces its entry, so exclude it from the
    // aggregate checks.
    let others = positions
        .iter()
        .filter(|(symbol, _)| **symbol != candidate.symbol);

    let mut total_risk = candidate.risk_contribution();
    let mut correlated_exposure = 0.0;

    for (symbol, position) in others {
        total_risk += position.risk_contribution();

        let correlation = pair_correlation(&candidate.symbol, symbol);
        if correlation > settings.max_correlation {
            correlated_exposure += position.size * correlation;
        }
    }

    if total_risk > settings.max_portfolio_risk {
        return LimitCheck::Blocked {
            reason: format!(
                "total portfolio risk {:.2}% would exceed maximum {:.2}%",
                total_risk * 100.0,
                settings.max_portfolio_risk * 100.0
            ),
        };
    }

    if correlated_exposure > settings.max_position_size {
        return LimitCheck::Blocked {
            reason: format!(
                "correlated exposure {:.2}% exceeds maximum position size {:.2}%",
                correlated_exposure * 100.0,
                settings.max_position_size * 100.0
            ),
        };
    }

    LimitCheck::Allowed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(symbol: &str, size: f64, risk_percent: f64) -> Position {
        Position::new(symbol, size, risk_percent, 95.0, 115.0)
    }

    fn ledger(entries: &[(&str, f64, f64)]) -> HashMap<String, Position> {
        entries
            .iter()
            .map(|(s, size, risk)| (s.to_string(), candidate(s, *size, *risk)))
            .collect()
    }

    #[test]
    fn test_size_above_maximum_blocked() {
        let settings = RiskSettings::default();
        let check = check_candidate(&settings, &candidate("BTC/USDT", 0.2, 0.005), &ledger(&[]));

        assert!(!check.is_allowed());
        assert!(check.reason().unwrap().contains("exceeds maximum"));
    }

    #[test]
    fn test_size_below_minimum_blocked() {
        let settings = RiskSettings::default();
        let check =
            check_candidate(&settings, &candidate("BTC/USDT", 0.005, 0.005), &ledger(&[]));

        assert!(!check.is_allowed());
        assert!(check.reason().unwrap().contains("below minimum"));
    }

    #[test]
    fn test_within_bounds_allowed() {
        let settings = RiskSettings::default();
        let check = check_candidate(&settings, &candidate("BTC/USDT", 0.05, 0.005), &ledger(&[]));

        assert!(check.is_allowed());
    }

    #[test]
    fn test_portfolio_risk_overflow_blocked() {
        let settings = RiskSettings::default();
        // Existing risk 0.1 * 0.15 = 0.015; candidate adds 0.1 * 0.1 = 0.01
        let positions = ledger(&[("DOGE/USDT", 0.1, 0.15)]);
        let check = check_candidate(&settings, &candidate("XRP/USDT", 0.1, 0.1), &positions);

        assert!(!check.is_allowed());
        assert!(check.reason().unwrap().contains("portfolio risk"));
    }

    #[test]
    fn test_correlated_exposure_blocked() {
        let settings = RiskSettings::default();
        // BTC-ETH correlation 0.8 > 0.7; exposure 0.15 * 0.8 = 0.12 > 0.1
        let positions = ledger(&[("BTC/USDT", 0.15, 0.001)]);
        let check = check_candidate(&settings, &candidate("ETH/USDT", 0.05, 0.001), &positions);

        assert!(!check.is_allowed());
        assert!(check.reason().unwrap().contains("correlated exposure"));
    }

    #[test]
    fn test_readmission_excludes_own_entry() {
        let settings = RiskSettings::default();
        // Same symbol's old entry would otherwise count as correlated exposure
        let positions = ledger(&[("BTC/USDT", 0.09, 0.2)]);
        let check = check_candidate(&settings, &candidate("BTC/USDT", 0.05, 0.005), &positions);

        assert!(check.is_allowed());
    }
}
