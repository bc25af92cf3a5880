//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings, LoggingConfig, StrategySettings};

use config::{Config, Environment, File};
use ensemble_core::error::SettingsError;
use std::path::Path;
use thiserror::Error;

/// Errors from loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] SettingsError),
}

/// Load configuration from a file and `ENSEMBLE__`-prefixed environment
/// variables, then validate it.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("ENSEMBLE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app: AppConfig = config.try_deserialize()?;
    app.strategy.validate()?;
    Ok(app)
}
