//! Ensemble trading decision engine.
//!
//! Turns a rolling window of price/volume observations plus externally
//! supplied sentiment and macro scores into a bounded-risk trade decision:
//! a direction, a confidence, and a position size consistent with
//! portfolio-level risk limits.
//!
//! The [`EnsembleStrategy`] is the public entry point; it wires the external
//! data providers through indicator extraction, the four signal generators,
//! the weighted ensemble, and Kelly-based position sizing, and owns the
//! background risk monitor.

pub mod logging;
pub mod strategy;

pub use ensemble_config::{load_config, AppConfig, StrategySettings};
pub use ensemble_core::error::{EngineError, EngineResult};
pub use ensemble_core::traits::{MacroSource, MarketDataSource, SentimentSource};
pub use ensemble_core::types::{
    Bar, MarketCondition, Position, PriceSeries, RiskAlert, RiskMetrics, SignalAction,
    Timeframe, TradingSignal,
};
pub use ensemble_risk::{LimitCheck, RiskManager, RiskMonitor};
pub use strategy::EnsembleStrategy;
