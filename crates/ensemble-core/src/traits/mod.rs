//! Core traits for the decision pipeline.

mod indicator;
mod providers;

pub use indicator::{Indicator, MultiOutputIndicator};
pub use providers::{MacroSource, MarketDataSource, SentimentSource};
