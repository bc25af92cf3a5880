//! Configuration structures.

use ensemble_core::error::SettingsError;
use ensemble_risk::RiskSettings;
use ensemble_signals::EnsembleWeights;
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub strategy: StrategySettings,
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "ensemble-trader".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Strategy parameters for the decision pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategySettings {
    /// Weighted conviction a direction must clear in the ensemble
    pub min_confidence: f64,
    /// Protective stop distance from the entry price
    pub stop_loss_pct: f64,
    /// Profit target distance from the entry price
    pub take_profit_pct: f64,
    /// Per-source ensemble weights
    #[serde(default)]
    pub ensemble_weights: EnsembleWeights,
    /// Position sizing and portfolio limits
    #[serde(default)]
    pub risk: RiskSettings,
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self {
            min_confidence: 0.6,
            stop_loss_pct: 0.05,
            take_profit_pct: 0.15,
            ensemble_weights: EnsembleWeights::default(),
            risk: RiskSettings::default(),
        }
    }
}

impl StrategySettings {
    /// Validate every parameter to its sane range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (name, value) in [
            ("min_confidence", self.min_confidence),
            ("stop_loss_pct", self.stop_loss_pct),
            ("take_profit_pct", self.take_profit_pct),
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

        self.ensemble_weights.validate()?;
        self.risk.validate()?;
        Ok(())
    }
}
