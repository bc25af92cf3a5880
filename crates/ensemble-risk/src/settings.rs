//! Risk management settings.

use ensemble_core::error::SettingsError;
use serde::{Deserialize, Serialize};

/// Risk parameters governing position sizing and portfolio limits.
///
/// All sizes and risk budgets are fractions of portfolio capital.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskSettings {
    /// Cap on the Kelly fraction
    pub kelly_fraction: f64,
    /// Assumed average win used in the Kelly odds
    pub avg_win: f64,
    /// Assumed average loss used in the Kelly odds
    pub avg_loss: f64,
    /// Largest admissible position
    pub max_position_size: f64,
    /// Smallest position worth opening
    pub min_position_size: f64,
    /// Risk budget of a single position
    pub max_position_risk: f64,
    /// Aggregate risk budget across the ledger
    pub max_portfolio_risk: f64,
    /// Pairwise correlation above which exposure counts as concentrated
    pub max_correlation: f64,
    /// Cadence of the background risk monitor
    pub monitor_interval_secs: u64,
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self {
            kelly_fraction: 0.25,
            avg_win: 0.15,
            avg_loss: 0.05,
            max_position_size: 0.1,
            min_position_size: 0.01,
            max_position_risk: 0.005,
            max_portfolio_risk: 0.02,
            max_correlation: 0.7,
            monitor_interval_secs: 60,
        }
    }
}

impl RiskSettings {
    /// Validate every parameter to its sane range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (name, value) in [
            ("kelly_fraction", self.kelly_fraction),
            ("avg_win", self.avg_win),
            ("avg_loss", self.avg_loss),
            ("max_position_size", self.max_position_size),
            ("min_position_size", self.min_position_size),
            ("max_position_risk", self.max_position_risk),
            ("max_portfolio_risk", self.max_portfolio_risk),
            ("max_correlation", self.max_correlation),
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

        if self.avg_loss <= 0.0 {
            return Err(SettingsError::Invalid(
                "avg_loss must be positive".to_string(),
            ));
        }
        if self.min_position_size >= self.max_position_size {
            return Err(SettingsError::Invalid(format!(
                "min_position_size {} must be below max_position_size {}",
                self.min_position_size, self.max_position_size
            )));
        }
        if self.monitor_interval_secs == 0 {
            return Err(SettingsError::Invalid(
                "monitor_interval_secs must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
