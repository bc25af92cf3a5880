//! Core data types for the decision pipeline.

mod market;
mod ohlcv;
mod position;
mod signal;
mod timeframe;

pub use market::{MacroOutlook, MacroRegime, MarketCondition, SentimentScore, Trend, VolumeProfile};
pub use ohlcv::{Bar, PriceSeries};
pub use position::{AlertKind, Position, RiskAlert, RiskMetrics};
pub use signal::{SignalAction, SignalSource, TradingSignal};
pub use timeframe::Timeframe;
