//! Technical indicators and market feature extraction.
//!
//! This crate provides batch implementations of the indicators used by the
//! signal generators:
//! - Moving averages (SMA, EMA)
//! - Momentum indicators (RSI, MACD)
//! - Volatility indicators (Bollinger Bands, realized volatility)
//!
//! On top of the batch indicators sits the [`FeatureSet`] snapshot layer,
//! which extracts the latest value of each indicator from a price series and
//! substitutes a documented neutral default whenever there is not enough
//! history. Snapshot extraction is total: insufficient data is policy, not
//! an error.

pub mod features;
pub mod momentum;
pub mod moving_average;
pub mod volatility;

pub use features::{classify_trend, classify_volume, FeatureSet};
pub use momentum::{Macd, Rsi};
pub use moving_average::{Ema, Sma};
pub use volatility::{annualized_volatility, BollingerBands, BollingerOutput};
