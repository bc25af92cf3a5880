//! Error types for the decision pipeline.
//!
//! The pipeline distinguishes three failure classes internally: insufficient
//! data (resolved to documented neutral defaults), invalid configuration
//! (rejected at construction), and upstream collaborator failures (degraded
//! to HOLD at the API boundary). None of them escape `generate_signal`.

use thiserror::Error;

/// Top-level pipeline error.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Risk error: {0}")]
    Risk(#[from] RiskError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Upstream data collaborator errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("No data available for {0}")]
    NoData(String),

    #[error("Out-of-order bar for {symbol}: {timestamp} does not advance past {last}")]
    OutOfOrderBar {
        symbol: String,
        timestamp: i64,
        last: i64,
    },

    #[error("Data source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Data source error: {0}")]
    Internal(String),
}

/// Indicator calculation errors.
#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Risk management errors.
#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Risk limits blocked position: {reason}")]
    LimitBreached { reason: String },

    #[error("Position not found: {0}")]
    PositionNotFound(String),
}

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("{name} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Ensemble weights must sum to 1.0, got {sum}")]
    WeightsNotNormalized { sum: f64 },

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Result type alias for pipeline operations.
pub type EngineResult<T> = Result<T, EngineError>;
