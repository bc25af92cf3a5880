//! Elementary signal generators and the ensemble combiner.
//!
//! Four independent generators each turn a slice of market state into one
//! [`TradingSignal`](ensemble_core::types::TradingSignal):
//! - sentiment: externally supplied sentiment score
//! - technical: RSI / MACD / Bollinger indicator votes
//! - microstructure: recent vs. historical volume activity
//! - macro: externally supplied macro regime
//!
//! The [`ensemble`] module merges the four into a final decision using
//! configurable weights and a confidence threshold.

pub mod ensemble;
pub mod macro_regime;
pub mod microstructure;
pub mod sentiment;
pub mod technical;

pub use ensemble::{combine, ElementarySignals, EnsembleWeights};
